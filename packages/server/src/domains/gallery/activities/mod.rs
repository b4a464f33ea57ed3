//! Gallery actions

mod publish_entry;
mod search_gallery;

pub use publish_entry::publish_gallery_entry;
pub use search_gallery::{list_gallery, search_gallery};
