//! Test fixtures for integration tests.
//!
//! Fixtures go through the same model methods production code uses, so they
//! stay honest about schema defaults. Tests in one binary run concurrently
//! against the shared database, so every helper is scoped to rows the
//! calling test created.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use portal_core::common::{NotificationJobId, ResidentId, SubmissionId};
use portal_core::domains::notifications::models::{NotificationJob, NotificationKind};
use portal_core::domains::submissions::models::Submission;
use sqlx::PgPool;

/// Create a pending submission owned by a fresh resident.
pub async fn create_pending_submission(pool: &PgPool, title: &str) -> Result<Submission> {
    let owner_id = ResidentId::new();
    let submission = Submission::create(
        owner_id,
        format!("owner-{}@example.org", owner_id),
        "Wildlife".to_string(),
        title.to_string(),
        None,
        format!("media/{}.jpg", SubmissionId::new()),
        pool,
    )
    .await?;
    Ok(submission)
}

/// Queue an approval notification parked an hour in the future.
///
/// Parked jobs are invisible to the due-job claim, so concurrent tests
/// cannot take each other's work; the owning test claims by id with
/// [`claim_job`] or makes the job due with [`make_jobs_due`] first.
pub async fn create_parked_job(pool: &PgPool, submission: &Submission) -> Result<NotificationJob> {
    let job = NotificationJob::builder()
        .submission_id(submission.id)
        .recipient(submission.owner_email.clone())
        .kind(NotificationKind::Approval)
        .subject(format!(
            "Your photo \"{}\" is now in the community gallery",
            submission.title
        ))
        .body("<p>Good news!</p>".to_string())
        .idempotency_key(NotificationJob::idempotency_key(
            submission.id,
            "approved",
            &submission.owner_email,
        ))
        .next_attempt_at(Utc::now() + Duration::hours(1))
        .build();

    let queued = job
        .enqueue(pool)
        .await?
        .context("a job for this decision is already queued")?;
    Ok(queued)
}

/// Pull a submission's queued notifications back to due.
pub async fn make_jobs_due(pool: &PgPool, submission_id: SubmissionId) -> Result<()> {
    sqlx::query(
        "UPDATE notification_jobs SET next_attempt_at = NOW() - INTERVAL '1 second' WHERE submission_id = $1",
    )
    .bind(submission_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Claim one specific job the way the dispatch claim does: count the attempt
/// and push the next attempt out. Scoped by id instead of due time.
pub async fn claim_job(pool: &PgPool, id: NotificationJobId) -> Result<NotificationJob> {
    let job = sqlx::query_as::<_, NotificationJob>(
        r#"
        UPDATE notification_jobs
        SET attempts = attempts + 1,
            next_attempt_at = NOW() + make_interval(secs => LEAST(POWER(2, attempts + 1), 3600)),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(job)
}

/// Set the attempt counter directly, for exhaustion tests.
pub async fn set_job_attempts(pool: &PgPool, id: NotificationJobId, attempts: i32) -> Result<()> {
    sqlx::query("UPDATE notification_jobs SET attempts = $2 WHERE id = $1")
        .bind(id)
        .bind(attempts)
        .execute(pool)
        .await?;
    Ok(())
}
