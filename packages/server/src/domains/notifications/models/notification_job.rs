//! Notification job model - durable queue of owner emails.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::{FromRow, PgConnection, PgPool};
use typed_builder::TypedBuilder;

use crate::common::{NotificationJobId, SubmissionId};
use crate::domains::submissions::models::{Submission, SubmissionStatus};

/// Attempts a job gets before its failure becomes permanent.
pub const DEFAULT_MAX_ATTEMPTS: i32 = 5;

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "notification_status", rename_all = "snake_case")]
pub enum NotificationStatus {
    #[default]
    Pending,
    Sent,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
pub enum NotificationKind {
    Approval,
    Rejection,
}

// ============================================================================
// NotificationJob Model
// ============================================================================

/// One queued email to a submission owner.
///
/// Identity fields (recipient, kind, rendered content, idempotency key) are
/// written once at enqueue; dispatch only touches the bookkeeping columns.
/// The UNIQUE idempotency key means a decision can never queue two emails,
/// so retries reschedule this row instead of inserting a new one.
#[derive(FromRow, Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct NotificationJob {
    #[builder(default = NotificationJobId::new())]
    pub id: NotificationJobId,

    // Identity
    pub submission_id: SubmissionId,
    pub recipient: String,
    pub kind: NotificationKind,

    // Rendered content
    pub subject: String,
    pub body: String,
    pub idempotency_key: String,

    // Dispatch bookkeeping
    #[builder(default)]
    pub status: NotificationStatus,
    #[builder(default = 0)]
    pub attempts: i32,
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: i32,
    #[builder(default = Utc::now())]
    pub next_attempt_at: DateTime<Utc>,
    #[builder(default, setter(strip_option))]
    pub last_error: Option<String>,
    #[builder(default, setter(strip_option))]
    pub provider_message_id: Option<String>,

    // Timestamps
    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
    #[builder(default = Utc::now())]
    pub updated_at: DateTime<Utc>,
}

impl NotificationJob {
    /// Build the job for a freshly decided submission.
    ///
    /// Errors if the submission has no terminal status; intake never
    /// notifies.
    pub fn for_decision(submission: &Submission) -> Result<Self> {
        let kind = match submission.status.parse::<SubmissionStatus>()? {
            SubmissionStatus::Approved => NotificationKind::Approval,
            SubmissionStatus::Rejected => NotificationKind::Rejection,
            SubmissionStatus::Pending => {
                anyhow::bail!("no notification for a pending submission")
            }
        };

        let (subject, body) = match kind {
            NotificationKind::Approval => render_approval(&submission.title),
            NotificationKind::Rejection => render_rejection(
                &submission.title,
                submission.rejection_reason.as_deref().unwrap_or(""),
            ),
        };

        Ok(Self::builder()
            .submission_id(submission.id)
            .recipient(submission.owner_email.clone())
            .kind(kind)
            .subject(subject)
            .body(body)
            .idempotency_key(Self::idempotency_key(
                submission.id,
                &submission.status,
                &submission.owner_email,
            ))
            .build())
    }

    /// Deterministic key for one (submission, target status, recipient)
    /// notification, stable across retries and re-enqueues.
    pub fn idempotency_key(
        submission_id: SubmissionId,
        target_status: &str,
        recipient: &str,
    ) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{}:{}:{}", submission_id, target_status, recipient).as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Whether the attempt budget is spent.
    pub fn exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }
}

// ============================================================================
// Email templates
// ============================================================================

fn render_approval(title: &str) -> (String, String) {
    let subject = format!("Your photo \"{}\" is now in the community gallery", title);
    let body = format!(
        "<p>Good news! Your photo \"<strong>{}</strong>\" was approved by the \
         moderation team and is now visible in the community gallery.</p>\
         <p>Thanks for sharing,<br>The Meeker Lakes moderation team</p>",
        title
    );
    (subject, body)
}

fn render_rejection(title: &str, reason: &str) -> (String, String) {
    let subject = format!("An update on your photo \"{}\"", title);
    let body = format!(
        "<p>Your photo \"<strong>{}</strong>\" was reviewed and was not approved \
         for the community gallery.</p>\
         <p>Reviewer note: {}</p>\
         <p>You are welcome to submit again,<br>The Meeker Lakes moderation team</p>",
        title, reason
    );
    (subject, body)
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl NotificationJob {
    /// Enqueue this job
    ///
    /// Returns `None` when a job for the same idempotency key already exists;
    /// the existing job keeps its state.
    pub async fn enqueue(&self, pool: &PgPool) -> Result<Option<Self>> {
        let job = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO notification_jobs (
                id, submission_id, recipient, kind, subject, body,
                idempotency_key, status, attempts, max_attempts, next_attempt_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (idempotency_key) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(self.submission_id)
        .bind(&self.recipient)
        .bind(self.kind)
        .bind(&self.subject)
        .bind(&self.body)
        .bind(&self.idempotency_key)
        .bind(self.status)
        .bind(self.attempts)
        .bind(self.max_attempts)
        .bind(self.next_attempt_at)
        .fetch_optional(pool)
        .await?;
        Ok(job)
    }

    /// Claim jobs that are due, atomically, using FOR UPDATE SKIP LOCKED
    ///
    /// Claiming counts the attempt and pushes `next_attempt_at` forward by
    /// the exponential backoff for that attempt (capped at one hour). That
    /// future timestamp is also the crash lease: a worker that dies
    /// mid-dispatch leaves the row claimable again at the backoff deadline.
    pub async fn claim_due(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let jobs = sqlx::query_as::<_, Self>(
            r#"
            WITH due_jobs AS (
                SELECT id
                FROM notification_jobs
                WHERE status = 'pending'
                  AND next_attempt_at <= NOW()
                  AND attempts < max_attempts
                ORDER BY next_attempt_at
                LIMIT $1
                FOR UPDATE SKIP LOCKED
            )
            UPDATE notification_jobs
            SET
                attempts = attempts + 1,
                next_attempt_at = NOW() + make_interval(secs => LEAST(POWER(2, attempts + 1), 3600)),
                updated_at = NOW()
            WHERE id IN (SELECT id FROM due_jobs)
            RETURNING *
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(jobs)
    }

    /// Mark a job delivered
    ///
    /// Keeps any previously recorded provider message id when the caller has
    /// none (idempotent re-marks after a short-circuit).
    pub async fn mark_sent(
        id: NotificationJobId,
        provider_message_id: Option<&str>,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        let job = sqlx::query_as::<_, Self>(
            r#"
            UPDATE notification_jobs
            SET
                status = 'sent',
                provider_message_id = COALESCE($2, provider_message_id),
                last_error = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(provider_message_id)
        .fetch_one(conn)
        .await?;
        Ok(job)
    }

    /// Mark a job permanently failed
    pub async fn mark_failed(
        id: NotificationJobId,
        error: &str,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        let job = sqlx::query_as::<_, Self>(
            r#"
            UPDATE notification_jobs
            SET
                status = 'failed',
                last_error = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(error)
        .fetch_one(conn)
        .await?;
        Ok(job)
    }

    /// Record a transient failure; the retry is already scheduled by the
    /// claim that handed out this attempt
    pub async fn record_transient_failure(
        id: NotificationJobId,
        error: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let job = sqlx::query_as::<_, Self>(
            r#"
            UPDATE notification_jobs
            SET last_error = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(error)
        .fetch_one(pool)
        .await?;
        Ok(job)
    }

    /// Find job by ID
    pub async fn find_by_id(id: NotificationJobId, pool: &PgPool) -> Result<Option<Self>> {
        let job =
            sqlx::query_as::<_, Self>("SELECT * FROM notification_jobs WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(job)
    }

    /// All jobs for one submission, oldest first
    pub async fn find_by_submission(
        submission_id: SubmissionId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let jobs = sqlx::query_as::<_, Self>(
            "SELECT * FROM notification_jobs WHERE submission_id = $1 ORDER BY created_at",
        )
        .bind(submission_id)
        .fetch_all(pool)
        .await?;
        Ok(jobs)
    }
}
