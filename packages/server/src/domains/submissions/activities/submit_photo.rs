//! Submit photo action - resident photo intake

use tracing::info;

use crate::common::{AppError, ResidentId};
use crate::domains::submissions::models::Submission;
use crate::kernel::ServerDeps;

/// Create a new photo submission in the moderation queue.
///
/// Intake only records the submission; nothing is notified or indexed until a
/// moderator decides.
pub async fn submit_photo(
    owner_id: ResidentId,
    owner_email: &str,
    category: &str,
    title: &str,
    description: Option<String>,
    media_ref: &str,
    deps: &ServerDeps,
) -> Result<Submission, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    if media_ref.trim().is_empty() {
        return Err(AppError::Validation("media reference is required".to_string()));
    }
    if !deps
        .submission_categories
        .iter()
        .any(|c| c.eq_ignore_ascii_case(category))
    {
        return Err(AppError::Validation(format!(
            "unknown category: {}",
            category
        )));
    }

    let submission = Submission::create(
        owner_id,
        owner_email.to_string(),
        category.to_string(),
        title.to_string(),
        description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
        media_ref.trim().to_string(),
        &deps.db_pool,
    )
    .await?;

    info!(
        submission_id = %submission.id,
        owner_id = %owner_id,
        category = %submission.category,
        "photo submission received"
    );

    Ok(submission)
}
