//! Submission listing queries

use crate::common::{Actor, AdminCapability, AppError, ResidentId};
use crate::domains::submissions::models::Submission;
use crate::kernel::ServerDeps;

/// A resident's own submissions, newest first.
pub async fn list_own_submissions(
    owner_id: ResidentId,
    deps: &ServerDeps,
) -> Result<Vec<Submission>, AppError> {
    Ok(Submission::find_by_owner(owner_id, &deps.db_pool).await?)
}

/// The moderation queue: pending submissions, oldest first.
pub async fn list_moderation_queue(
    actor_id: ResidentId,
    actor_email: &str,
    deps: &ServerDeps,
) -> Result<Vec<Submission>, AppError> {
    Actor::new(actor_id, actor_email)
        .can(AdminCapability::Moderate)
        .check(deps)
        .await?;

    Ok(Submission::find_pending_review(&deps.db_pool).await?)
}
