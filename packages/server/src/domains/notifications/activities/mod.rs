//! Notification actions
//!
//! The background worker calls these; nothing here is reachable from a
//! request handler.

mod dispatch_notification;

pub use dispatch_notification::{dispatch_notification, DispatchOutcome};
