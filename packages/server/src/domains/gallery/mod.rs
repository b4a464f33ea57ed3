//! Gallery domain - the public face of approved submissions.
//!
//! Approval publishes a read-only projection of the submission; browsing
//! reads the database and free-text search goes through the search index.

pub mod activities;
pub mod models;

pub use activities::{list_gallery, publish_gallery_entry, search_gallery};
pub use models::GalleryEntry;
