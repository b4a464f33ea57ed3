//! Submissions domain - photo intake and moderation
//!
//! A submission is created `pending`, receives exactly one terminal decision
//! (`approved` or `rejected`), and is never deleted. The decision fans out to
//! the notifications and gallery domains after commit.

pub mod activities;
pub mod models;

// Re-export commonly used types
pub use activities::Decision;
pub use models::{Submission, SubmissionStatus};
