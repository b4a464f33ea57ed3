//! Submissions domain actions - business logic functions
//!
//! Route handlers call these directly; authorization happens here, not in the
//! HTTP layer.

mod list_submissions;
mod moderate_submission;
mod submit_photo;

pub use list_submissions::{list_moderation_queue, list_own_submissions};
pub use moderate_submission::{decide_submission, Decision};
pub use submit_photo::submit_photo;
