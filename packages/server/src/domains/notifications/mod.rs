//! Notifications domain - durable owner emails for moderation decisions.
//!
//! A decision enqueues exactly one job per (submission, outcome, recipient);
//! the background worker delivers it with exponential backoff and records
//! the result in the audit trail. Delivery never holds up a request.

pub mod activities;
pub mod models;
pub mod worker;

pub use activities::{dispatch_notification, DispatchOutcome};
pub use models::{NotificationJob, NotificationKind, NotificationStatus};
pub use worker::{NotificationWorker, NotificationWorkerConfig};
