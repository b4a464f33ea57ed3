use axum::extract::{Extension, Path};
use axum::Json;
use serde::Deserialize;

use crate::common::{AppError, SubmissionId};
use crate::domains::submissions::activities::{decide_submission, list_moderation_queue};
use crate::domains::submissions::models::Submission;
use crate::domains::submissions::Decision;
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;
use crate::server::routes::require_user;

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub decision: Decision,
    pub reason: Option<String>,
}

/// GET /api/moderation/queue - pending submissions, oldest first
pub async fn moderation_queue_handler(
    Extension(state): Extension<AxumAppState>,
    user: Option<Extension<AuthUser>>,
) -> Result<Json<Vec<Submission>>, AppError> {
    let user = require_user(user)?;

    let queue = list_moderation_queue(user.resident_id, &user.email, &state.server_deps).await?;
    Ok(Json(queue))
}

/// POST /api/moderation/submissions/:id/decision - approve or reject
pub async fn decide_submission_handler(
    Extension(state): Extension<AxumAppState>,
    user: Option<Extension<AuthUser>>,
    Path(submission_id): Path<SubmissionId>,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<Submission>, AppError> {
    let user = require_user(user)?;

    let submission = decide_submission(
        submission_id,
        request.decision,
        request.reason,
        user.resident_id,
        &user.email,
        &state.server_deps,
    )
    .await?;

    Ok(Json(submission))
}
