// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "decide a submission") should be domain functions that
// use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseMailer, BaseSearchIndex)

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::domains::gallery::models::GalleryEntry;

// =============================================================================
// Mailer Trait (Infrastructure - transactional email)
// =============================================================================

/// A rendered email, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Acknowledgement of a delivered email.
#[derive(Debug, Clone)]
pub struct EmailReceipt {
    pub provider_message_id: String,
}

/// How a delivery attempt failed, as the dispatcher sees it.
///
/// Implementations classify at the transport boundary: the retry loop only
/// ever branches on these two variants, never on provider-specific errors.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// A later retry of the same send could succeed: timeouts, connection
    /// failures, provider 5xx.
    #[error("transient delivery failure: {0}")]
    Transient(String),
    /// Retrying cannot help: bad recipient, rejected content, provider 4xx.
    #[error("permanent delivery failure: {0}")]
    Permanent(String),
}

#[async_trait]
pub trait BaseMailer: Send + Sync {
    /// Send one email
    async fn send(&self, message: &EmailMessage) -> Result<EmailReceipt, DeliveryError>;
}

// =============================================================================
// Search Index Trait (Infrastructure - gallery documents)
// =============================================================================

#[async_trait]
pub trait BaseSearchIndex: Send + Sync {
    /// Add or replace one gallery document
    async fn publish(&self, entry: &GalleryEntry) -> Result<()>;

    /// Free-text search over published documents
    async fn search(&self, query: &str) -> Result<Vec<GalleryEntry>>;
}
