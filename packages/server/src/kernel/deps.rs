//! Server dependencies for activities (using traits for testability)
//!
//! This module provides the central dependency container used by all domain
//! activities. All external services use trait abstractions to enable testing.

use std::sync::Arc;

use async_trait::async_trait;
use postmark::models::OutboundEmail;
use postmark::PostmarkService;
use sqlx::PgPool;

use crate::common::auth::HasAuthContext;
use crate::domains::auth::JwtService;
use crate::kernel::{BaseMailer, BaseSearchIndex, DeliveryError, EmailMessage, EmailReceipt};

// =============================================================================
// PostmarkService Adapter (implements BaseMailer trait)
// =============================================================================

/// Wrapper around PostmarkService that implements the BaseMailer trait
pub struct PostmarkMailer {
    service: Arc<PostmarkService>,
    from_address: String,
}

impl PostmarkMailer {
    pub fn new(service: Arc<PostmarkService>, from_address: impl Into<String>) -> Self {
        Self {
            service,
            from_address: from_address.into(),
        }
    }
}

#[async_trait]
impl BaseMailer for PostmarkMailer {
    async fn send(&self, message: &EmailMessage) -> Result<EmailReceipt, DeliveryError> {
        let email = OutboundEmail {
            from: self.from_address.clone(),
            to: message.to.clone(),
            subject: message.subject.clone(),
            html_body: message.html_body.clone(),
            text_body: None,
            message_stream: None,
        };

        match self.service.send_email(&email).await {
            Ok(response) => Ok(EmailReceipt {
                provider_message_id: response.message_id,
            }),
            Err(e) if e.is_retryable() => Err(DeliveryError::Transient(e.to_string())),
            Err(e) => Err(DeliveryError::Permanent(e.to_string())),
        }
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to activities (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Email transport for owner notifications
    pub mailer: Arc<dyn BaseMailer>,
    /// Search index behind the public gallery (noop when unconfigured)
    pub search_index: Arc<dyn BaseSearchIndex>,
    /// JWT service for verifying session tokens
    pub jwt_service: Arc<JwtService>,
    /// Emails allowed to moderate, from configuration
    pub admin_identifiers: Vec<String>,
    /// Categories a photo may be filed under
    pub submission_categories: Vec<String>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        db_pool: PgPool,
        mailer: Arc<dyn BaseMailer>,
        search_index: Arc<dyn BaseSearchIndex>,
        jwt_service: Arc<JwtService>,
        admin_identifiers: Vec<String>,
        submission_categories: Vec<String>,
    ) -> Self {
        Self {
            db_pool,
            mailer,
            search_index,
            jwt_service,
            admin_identifiers,
            submission_categories,
        }
    }
}

/// Implement HasAuthContext for ServerDeps to enable authorization checks
impl HasAuthContext for ServerDeps {
    fn admin_identifiers(&self) -> &[String] {
        &self.admin_identifiers
    }
}
