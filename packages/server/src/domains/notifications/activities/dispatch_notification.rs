//! Dispatch notification action - one delivery attempt for a claimed job

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::domains::audit::models::AuditRecord;
use crate::domains::notifications::models::NotificationJob;
use crate::kernel::{DeliveryError, EmailMessage, ServerDeps};

/// What a single dispatch attempt did with a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Delivered, or found already delivered.
    Sent { provider_message_id: Option<String> },
    /// Failed this attempt; the job stays pending and retries at its
    /// backoff deadline.
    TransientFailure { detail: String },
    /// Failed for good, either rejected by the provider or out of attempts.
    PermanentFailure { detail: String },
}

/// Run one delivery attempt for a claimed job.
///
/// Callers must pass a job handed out by `NotificationJob::claim_due`; its
/// attempt counter and backoff deadline are already advanced. Errors from
/// this function are bookkeeping failures (the database), never transport
/// failures; those are folded into the outcome.
pub async fn dispatch_notification(
    job: NotificationJob,
    deps: &ServerDeps,
) -> Result<DispatchOutcome> {
    // Delivery may have succeeded on an attempt that crashed before the job
    // row was updated. The audit trail is the source of truth, so consult it
    // before touching the transport.
    if let Some(receipt) = AuditRecord::find_email_sent(&job.idempotency_key, &deps.db_pool).await?
    {
        let provider_message_id = receipt.provider_message_id();
        let mut conn = deps.db_pool.acquire().await?;
        NotificationJob::mark_sent(job.id, provider_message_id.as_deref(), &mut conn).await?;

        debug!(job_id = %job.id, "delivery already recorded; skipping transport");
        return Ok(DispatchOutcome::Sent {
            provider_message_id,
        });
    }

    let message = EmailMessage {
        to: job.recipient.clone(),
        subject: job.subject.clone(),
        html_body: job.body.clone(),
    };

    match deps.mailer.send(&message).await {
        Ok(receipt) => {
            let mut tx = deps.db_pool.begin().await?;
            NotificationJob::mark_sent(job.id, Some(&receipt.provider_message_id), &mut *tx)
                .await?;
            AuditRecord::record_email_sent(&job, &receipt.provider_message_id, &mut *tx).await?;
            tx.commit().await?;

            info!(
                job_id = %job.id,
                recipient = %job.recipient,
                provider_message_id = %receipt.provider_message_id,
                "notification delivered"
            );
            Ok(DispatchOutcome::Sent {
                provider_message_id: Some(receipt.provider_message_id),
            })
        }
        Err(DeliveryError::Transient(detail)) if job.exhausted() => {
            let mut tx = deps.db_pool.begin().await?;
            NotificationJob::mark_failed(job.id, &detail, &mut *tx).await?;
            AuditRecord::record_email_error(&job, &detail, &mut *tx).await?;
            tx.commit().await?;

            warn!(
                job_id = %job.id,
                attempts = job.attempts,
                error = %detail,
                "notification retries exhausted"
            );
            Ok(DispatchOutcome::PermanentFailure { detail })
        }
        Err(DeliveryError::Transient(detail)) => {
            NotificationJob::record_transient_failure(job.id, &detail, &deps.db_pool).await?;

            warn!(
                job_id = %job.id,
                attempt = job.attempts,
                error = %detail,
                "notification attempt failed; will retry"
            );
            Ok(DispatchOutcome::TransientFailure { detail })
        }
        Err(DeliveryError::Permanent(detail)) => {
            let mut tx = deps.db_pool.begin().await?;
            NotificationJob::mark_failed(job.id, &detail, &mut *tx).await?;
            AuditRecord::record_email_error(&job, &detail, &mut *tx).await?;
            tx.commit().await?;

            warn!(job_id = %job.id, error = %detail, "notification rejected by provider");
            Ok(DispatchOutcome::PermanentFailure { detail })
        }
    }
}
