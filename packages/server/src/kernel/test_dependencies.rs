// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use super::{
    BaseMailer, BaseSearchIndex, DeliveryError, EmailMessage, EmailReceipt, ServerDeps,
};
use crate::common::SubmissionId;
use crate::domains::auth::JwtService;
use crate::domains::gallery::models::GalleryEntry;

/// Admin identity that moderation tests act as.
pub const TEST_ADMIN_EMAIL: &str = "warden@meekerlakes.org";

// =============================================================================
// Mock Mailer
// =============================================================================

pub struct MockMailer {
    outcomes: Arc<Mutex<Vec<Result<EmailReceipt, DeliveryError>>>>,
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(Vec::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful delivery with a specific provider message id
    pub fn with_receipt(self, provider_message_id: &str) -> Self {
        self.outcomes.lock().unwrap().push(Ok(EmailReceipt {
            provider_message_id: provider_message_id.to_string(),
        }));
        self
    }

    /// Queue a failed delivery
    pub fn with_failure(self, error: DeliveryError) -> Self {
        self.outcomes.lock().unwrap().push(Err(error));
        self
    }

    /// Get all messages handed to the transport
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Get the number of transport calls
    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Check if a send to the given recipient was attempted
    pub fn was_sent_to(&self, recipient: &str) -> bool {
        self.sent.lock().unwrap().iter().any(|m| m.to == recipient)
    }
}

#[async_trait]
impl BaseMailer for MockMailer {
    async fn send(&self, message: &EmailMessage) -> Result<EmailReceipt, DeliveryError> {
        // Record the call
        let send_number = {
            let mut sent = self.sent.lock().unwrap();
            sent.push(message.clone());
            sent.len()
        };

        let mut outcomes = self.outcomes.lock().unwrap();
        if !outcomes.is_empty() {
            outcomes.remove(0)
        } else {
            // Deliver successfully by default
            Ok(EmailReceipt {
                provider_message_id: format!("mock-message-{}", send_number),
            })
        }
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Mock Search Index
// =============================================================================

pub struct MockSearchIndex {
    failing: bool,
    published: Arc<Mutex<Vec<GalleryEntry>>>,
    searches: Arc<Mutex<Vec<String>>>,
    results: Arc<Mutex<Vec<Vec<GalleryEntry>>>>,
}

impl MockSearchIndex {
    pub fn new() -> Self {
        Self {
            failing: false,
            published: Arc::new(Mutex::new(Vec::new())),
            searches: Arc::new(Mutex::new(Vec::new())),
            results: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A search index whose every call fails, for outage tests
    pub fn failing() -> Self {
        Self {
            failing: true,
            published: Arc::new(Mutex::new(Vec::new())),
            searches: Arc::new(Mutex::new(Vec::new())),
            results: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue results for the next search call
    pub fn with_results(self, results: Vec<GalleryEntry>) -> Self {
        self.results.lock().unwrap().push(results);
        self
    }

    /// Get all documents that were published
    pub fn published(&self) -> Vec<GalleryEntry> {
        self.published.lock().unwrap().clone()
    }

    /// Get the number of publish calls
    pub fn publish_count(&self) -> usize {
        self.published.lock().unwrap().len()
    }

    /// Check if a document for the given submission was published
    pub fn was_published(&self, id: SubmissionId) -> bool {
        self.published.lock().unwrap().iter().any(|e| e.id == id)
    }

    /// Get the number of search calls that reached the index
    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseSearchIndex for MockSearchIndex {
    async fn publish(&self, entry: &GalleryEntry) -> Result<()> {
        if self.failing {
            anyhow::bail!("search index unavailable");
        }
        self.published.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<GalleryEntry>> {
        self.searches.lock().unwrap().push(query.to_string());

        if self.failing {
            anyhow::bail!("search index unavailable");
        }

        let mut results = self.results.lock().unwrap();
        if !results.is_empty() {
            Ok(results.remove(0))
        } else {
            // Fall back to everything published so far
            Ok(self.published.lock().unwrap().clone())
        }
    }
}

impl Default for MockSearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub mailer: Arc<MockMailer>,
    pub search_index: Arc<MockSearchIndex>,
    pub admin_identifiers: Vec<String>,
    pub submission_categories: Vec<String>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            mailer: Arc::new(MockMailer::new()),
            search_index: Arc::new(MockSearchIndex::new()),
            admin_identifiers: vec![TEST_ADMIN_EMAIL.to_string()],
            submission_categories: ["Litchfield", "Darwin", "Dassel", "Lake Ripley", "Wildlife", "Events"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// Set a mock mailer
    pub fn mock_mailer(mut self, mailer: MockMailer) -> Self {
        self.mailer = Arc::new(mailer);
        self
    }

    /// Set a mock search index
    pub fn mock_search(mut self, index: MockSearchIndex) -> Self {
        self.search_index = Arc::new(index);
        self
    }

    /// Convert into ServerDeps for testing
    pub fn into_deps(self, db_pool: PgPool) -> ServerDeps {
        ServerDeps::new(
            db_pool,
            self.mailer,
            self.search_index,
            Arc::new(JwtService::new(
                "test-jwt-secret",
                "meeker-lakes-portal".to_string(),
            )),
            self.admin_identifiers,
            self.submission_categories,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
