//! Audit domain - append-only record of moderation and delivery events
//!
//! Everything the pipeline does that an operator might need to reconstruct
//! lands here: moderation decisions, successful email deliveries, and
//! deliveries given up on.

pub mod activities;
pub mod models;

pub use models::{AuditKind, AuditRecord};
