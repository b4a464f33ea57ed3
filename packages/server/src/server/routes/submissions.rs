use axum::extract::Extension;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::common::AppError;
use crate::domains::submissions::activities::{list_own_submissions, submit_photo};
use crate::domains::submissions::models::Submission;
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;
use crate::server::routes::require_user;

#[derive(Debug, Deserialize)]
pub struct SubmitPhotoRequest {
    pub category: String,
    pub title: String,
    pub description: Option<String>,
    pub media_ref: String,
}

/// POST /api/submissions - file a photo for review
pub async fn submit_photo_handler(
    Extension(state): Extension<AxumAppState>,
    user: Option<Extension<AuthUser>>,
    Json(request): Json<SubmitPhotoRequest>,
) -> Result<(StatusCode, Json<Submission>), AppError> {
    let user = require_user(user)?;

    let submission = submit_photo(
        user.resident_id,
        &user.email,
        &request.category,
        &request.title,
        request.description,
        &request.media_ref,
        &state.server_deps,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(submission)))
}

/// GET /api/submissions/mine - the caller's own submissions, newest first
pub async fn list_own_submissions_handler(
    Extension(state): Extension<AxumAppState>,
    user: Option<Extension<AuthUser>>,
) -> Result<Json<Vec<Submission>>, AppError> {
    let user = require_user(user)?;

    let submissions = list_own_submissions(user.resident_id, &state.server_deps).await?;
    Ok(Json(submissions))
}
