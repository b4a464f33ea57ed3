use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Categories accepted when SUBMISSION_CATEGORIES is not configured.
const DEFAULT_CATEGORIES: &str = "Litchfield,Darwin,Dassel,Lake Ripley,Wildlife,Events";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub postmark_server_token: String,
    pub email_sender: String,
    pub search_index_url: Option<String>,
    pub search_index_api_key: Option<String>,
    pub admin_identifiers: Vec<String>,
    pub submission_categories: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET")
                .context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER")
                .unwrap_or_else(|_| "meeker-lakes-portal".to_string()),
            postmark_server_token: env::var("POSTMARK_SERVER_TOKEN")
                .context("POSTMARK_SERVER_TOKEN must be set")?,
            email_sender: env::var("EMAIL_SENDER")
                .context("EMAIL_SENDER must be set")?,
            search_index_url: env::var("SEARCH_INDEX_URL").ok(),
            search_index_api_key: env::var("SEARCH_INDEX_API_KEY").ok(),
            admin_identifiers: parse_list(
                &env::var("ADMIN_IDENTIFIERS").unwrap_or_default(),
            ),
            submission_categories: parse_list(
                &env::var("SUBMISSION_CATEGORIES")
                    .unwrap_or_else(|_| DEFAULT_CATEGORIES.to_string()),
            ),
        })
    }
}

/// Split a comma-separated env value, dropping empty segments.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
