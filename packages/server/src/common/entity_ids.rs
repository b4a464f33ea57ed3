//! Typed ID definitions for all domain entities.
//!
//! This module defines type aliases for each domain entity, providing
//! compile-time type safety for ID usage throughout the application.
//!
//! # Example
//!
//! ```rust
//! use portal_core::common::{ResidentId, SubmissionId};
//!
//! // These are incompatible types - compiler prevents mixing them up
//! let resident_id: ResidentId = ResidentId::new();
//! let submission_id: SubmissionId = SubmissionId::new();
//!
//! // This would be a compile error:
//! // let wrong: SubmissionId = resident_id;
//! ```

// Re-export the core Id type and version markers
pub use super::id::{Id, V4, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Resident entities (portal users).
pub struct Resident;

/// Marker type for Submission entities (photo submissions).
pub struct Submission;

/// Marker type for NotificationJob entities (queued owner emails).
pub struct NotificationJob;

/// Marker type for AuditRecord entities (pipeline audit trail).
pub struct AuditRecord;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Resident entities.
pub type ResidentId = Id<Resident>;

/// Typed ID for Submission entities.
pub type SubmissionId = Id<Submission>;

/// Typed ID for NotificationJob entities.
pub type NotificationJobId = Id<NotificationJob>;

/// Typed ID for AuditRecord entities.
pub type AuditRecordId = Id<AuditRecord>;
