// https://postmarkapp.com/developer/api/email-api

pub mod models;

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use crate::models::{ApiErrorResponse, OutboundEmail, SendEmailResponse};

const EMAIL_API_URL: &str = "https://api.postmarkapp.com/email";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum PostmarkError {
    /// The request never produced an API response (connect failure, timeout,
    /// or an unreadable body).
    #[error("postmark request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("postmark api error {status}: {message} (code {error_code})")]
    Api {
        status: u16,
        error_code: i64,
        message: String,
    },
}

impl PostmarkError {
    /// Whether a later retry of the same send could plausibly succeed.
    /// Server-side and transport problems are retryable; a 4xx means the
    /// request itself was refused and will be refused again.
    pub fn is_retryable(&self) -> bool {
        match self {
            PostmarkError::Transport(_) => true,
            PostmarkError::Api { status, .. } => *status >= 500,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostmarkOptions {
    pub server_token: String,
}

#[derive(Debug, Clone)]
pub struct PostmarkService {
    options: PostmarkOptions,
    client: Client,
}

impl PostmarkService {
    pub fn new(options: PostmarkOptions) -> Result<Self, PostmarkError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { options, client })
    }

    pub async fn send_email(
        &self,
        email: &OutboundEmail,
    ) -> Result<SendEmailResponse, PostmarkError> {
        let response = self
            .client
            .post(EMAIL_API_URL)
            .header("X-Postmark-Server-Token", &self.options.server_token)
            .header("Accept", "application/json")
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: ApiErrorResponse = response.json().await.unwrap_or_default();
            return Err(PostmarkError::Api {
                status: status.as_u16(),
                error_code: body.error_code,
                message: body.message,
            });
        }

        Ok(response.json::<SendEmailResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_retryable() {
        let err = PostmarkError::Api {
            status: 503,
            error_code: 0,
            message: "service unavailable".to_string(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        let err = PostmarkError::Api {
            status: 422,
            error_code: 300,
            message: "invalid 'To' address".to_string(),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn api_error_displays_status_and_code() {
        let err = PostmarkError::Api {
            status: 401,
            error_code: 10,
            message: "no account with this token".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("401"));
        assert!(rendered.contains("code 10"));
    }
}
