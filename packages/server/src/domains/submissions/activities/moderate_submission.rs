//! Moderate submission action - the approve/reject state machine

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::common::{Actor, AdminCapability, AppError, ResidentId, SubmissionId};
use crate::domains::audit::models::AuditRecord;
use crate::domains::gallery::activities::publish_gallery_entry;
use crate::domains::gallery::models::GalleryEntry;
use crate::domains::notifications::models::NotificationJob;
use crate::domains::submissions::models::Submission;
use crate::kernel::ServerDeps;

/// A moderator's verdict on a pending submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

/// Apply a moderation decision to a pending submission.
///
/// The status transition and its audit record commit in one transaction;
/// everything after the commit (owner notification, gallery indexing) is
/// best-effort and can never undo the decision. A submission that is not
/// `pending` is reported as an invalid transition, never silently skipped.
pub async fn decide_submission(
    submission_id: SubmissionId,
    decision: Decision,
    reason: Option<String>,
    actor_id: ResidentId,
    actor_email: &str,
    deps: &ServerDeps,
) -> Result<Submission, AppError> {
    Actor::new(actor_id, actor_email)
        .can(AdminCapability::Moderate)
        .check(deps)
        .await?;

    let reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
    if decision == Decision::Reject && reason.is_none() {
        return Err(AppError::Validation(
            "a rejection reason is required".to_string(),
        ));
    }

    let mut tx = deps.db_pool.begin().await?;

    let updated = match decision {
        Decision::Approve => Submission::approve(submission_id, actor_id, &mut *tx).await?,
        Decision::Reject => {
            // Checked above.
            let reason = reason.clone().unwrap_or_default();
            Submission::reject(submission_id, actor_id, reason, &mut *tx).await?
        }
    };

    let Some(submission) = updated else {
        drop(tx);
        // Zero rows means either the submission does not exist or someone
        // else already decided it; tell the caller which.
        return match Submission::find_by_id(submission_id, &deps.db_pool).await? {
            Some(existing) => Err(AppError::InvalidTransition(format!(
                "submission is already {}",
                existing.status
            ))),
            None => Err(AppError::NotFound(format!(
                "submission {} not found",
                submission_id
            ))),
        };
    };

    AuditRecord::record_decision(&submission, actor_id, reason.as_deref(), &mut *tx).await?;

    tx.commit().await?;

    info!(
        submission_id = %submission.id,
        status = %submission.status,
        reviewed_by = %actor_id,
        "moderation decision recorded"
    );

    // The decision is durable from here on. Notification delivery runs in the
    // background worker; a failed enqueue only costs the owner an email.
    match NotificationJob::for_decision(&submission) {
        Ok(job) => match job.enqueue(&deps.db_pool).await {
            Ok(Some(queued)) => {
                debug!(job_id = %queued.id, submission_id = %submission.id, "notification enqueued")
            }
            Ok(None) => {
                debug!(submission_id = %submission.id, "notification already enqueued for this decision")
            }
            Err(e) => {
                warn!(submission_id = %submission.id, error = %e, "failed to enqueue owner notification")
            }
        },
        Err(e) => {
            warn!(submission_id = %submission.id, error = %e, "could not build owner notification")
        }
    }

    if let Some(entry) = GalleryEntry::from_submission(&submission) {
        let deps = deps.clone();
        tokio::spawn(async move {
            publish_gallery_entry(entry, &deps).await;
        });
    }

    Ok(submission)
}
