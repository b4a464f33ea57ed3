use serde::{Deserialize, Serialize};

/// A single outbound transactional email.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "To")]
    pub to: String,
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "HtmlBody")]
    pub html_body: String,
    #[serde(rename = "TextBody", skip_serializing_if = "Option::is_none")]
    pub text_body: Option<String>,
    #[serde(rename = "MessageStream", skip_serializing_if = "Option::is_none")]
    pub message_stream: Option<String>,
}

/// Successful send acknowledgement from the API.
#[derive(Debug, Clone, Deserialize)]
pub struct SendEmailResponse {
    #[serde(rename = "MessageID")]
    pub message_id: String,
    #[serde(rename = "To", default)]
    pub to: String,
    #[serde(rename = "SubmittedAt", default)]
    pub submitted_at: String,
}

/// Error body returned alongside non-2xx statuses.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiErrorResponse {
    #[serde(rename = "ErrorCode", default)]
    pub error_code: i64,
    #[serde(rename = "Message", default)]
    pub message: String,
}
