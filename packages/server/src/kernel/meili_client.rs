// https://www.meilisearch.com/docs/reference/api/overview

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::BaseSearchIndex;
use crate::domains::gallery::models::GalleryEntry;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const INDEX_NAME: &str = "gallery";
const SEARCH_LIMIT: usize = 50;

/// Meilisearch client for the public gallery index
pub struct MeiliSearchIndex {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

/// Search response envelope
#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<GalleryEntry>,
}

impl MeiliSearchIndex {
    /// Create a new client against a Meilisearch instance
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl BaseSearchIndex for MeiliSearchIndex {
    async fn publish(&self, entry: &GalleryEntry) -> Result<()> {
        let url = format!("{}/indexes/{}/documents", self.base_url, INDEX_NAME);

        let response = self
            .authorize(self.client.put(&url))
            .json(&json!([entry]))
            .send()
            .await
            .context("Failed to send document to search index")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Search index error {}: {}", status, body);
        }

        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<GalleryEntry>> {
        let url = format!("{}/indexes/{}/search", self.base_url, INDEX_NAME);

        let response = self
            .authorize(self.client.post(&url))
            .json(&json!({ "q": query, "limit": SEARCH_LIMIT }))
            .send()
            .await
            .context("Failed to send search request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Search index error {}: {}", status, body);
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .context("Failed to parse search response")?;

        Ok(search_response.hits)
    }
}

/// No-op search index for when no instance is configured
///
/// Publishing drops the document and searching finds nothing; the gallery
/// listing still works because it reads from the database.
pub struct NoopSearchIndex;

#[async_trait]
impl BaseSearchIndex for NoopSearchIndex {
    async fn publish(&self, _entry: &GalleryEntry) -> Result<()> {
        tracing::debug!("NoopSearchIndex: no search index configured, dropping document");
        Ok(())
    }

    async fn search(&self, _query: &str) -> Result<Vec<GalleryEntry>> {
        tracing::warn!("NoopSearchIndex: search called but no search index configured");
        Ok(vec![])
    }
}
