//! Caller-facing error taxonomy.
//!
//! Activities return `AppError` for everything a caller can act on; internal
//! plumbing stays on `anyhow` and surfaces here as `Internal`. The
//! `IntoResponse` impl is the single place HTTP status codes are assigned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use super::auth::AuthError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Input that fails validation before any state changes.
    #[error("{0}")]
    Validation(String),

    /// No verified identity on the request.
    #[error("authentication required")]
    Unauthorized,

    /// Verified identity without the required capability.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// A state change that is not legal from the entity's current status.
    #[error("{0}")]
    InvalidTransition(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationRequired | AuthError::InvalidToken => AppError::Unauthorized,
            AuthError::AdminRequired => {
                AppError::Forbidden("administrator access required".to_string())
            }
            AuthError::PermissionDenied(msg) => AppError::Forbidden(msg),
            AuthError::DatabaseError(e) => AppError::Database(e),
            AuthError::InternalError(e) => AppError::Internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InvalidTransition(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let response = AppError::Validation("title is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_transition_maps_to_409() {
        let response =
            AppError::InvalidTransition("submission is already approved".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_detail_is_not_leaked() {
        let response =
            AppError::Internal(anyhow::anyhow!("connection pool exhausted")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_errors_convert() {
        let err: AppError = AuthError::AdminRequired.into();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err: AppError = AuthError::AuthenticationRequired.into();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
