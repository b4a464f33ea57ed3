use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{PgConnection, PgPool};

use crate::common::{AuditRecordId, NotificationJobId, ResidentId, SubmissionId};
use crate::domains::notifications::models::NotificationJob;
use crate::domains::submissions::models::Submission;

/// AuditRecord - one row per pipeline event worth keeping
///
/// The table is append-only: no update or delete path exists anywhere in the
/// codebase, and a partial unique index on the idempotency key guarantees at
/// most one `email_sent` per notification.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditRecord {
    pub id: AuditRecordId,
    pub kind: String, // 'email_sent', 'email_error', 'moderation_decision'
    pub submission_id: Option<SubmissionId>,
    pub job_id: Option<NotificationJobId>,
    pub idempotency_key: Option<String>,
    pub detail: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

/// Audit record kind enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    EmailSent,
    EmailError,
    ModerationDecision,
}

impl std::fmt::Display for AuditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditKind::EmailSent => write!(f, "email_sent"),
            AuditKind::EmailError => write!(f, "email_error"),
            AuditKind::ModerationDecision => write!(f, "moderation_decision"),
        }
    }
}

impl std::str::FromStr for AuditKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "email_sent" => Ok(AuditKind::EmailSent),
            "email_error" => Ok(AuditKind::EmailError),
            "moderation_decision" => Ok(AuditKind::ModerationDecision),
            _ => Err(anyhow::anyhow!("Invalid audit kind: {}", s)),
        }
    }
}

impl AuditRecord {
    /// Provider message id, for `email_sent` records.
    pub fn provider_message_id(&self) -> Option<String> {
        self.detail
            .get("provider_message_id")
            .and_then(|v| v.as_str())
            .map(String::from)
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl AuditRecord {
    /// Append a record to the audit trail
    ///
    /// Takes a connection so callers can commit the record together with the
    /// state change it describes. Failures propagate; audit writes are not
    /// optional.
    pub async fn append(
        kind: AuditKind,
        submission_id: Option<SubmissionId>,
        job_id: Option<NotificationJobId>,
        idempotency_key: Option<String>,
        detail: serde_json::Value,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        let record = sqlx::query_as::<_, AuditRecord>(
            r#"
            INSERT INTO audit_records (
                id,
                kind,
                submission_id,
                job_id,
                idempotency_key,
                detail
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(AuditRecordId::new())
        .bind(kind.to_string())
        .bind(submission_id)
        .bind(job_id)
        .bind(idempotency_key)
        .bind(detail)
        .fetch_one(conn)
        .await?;
        Ok(record)
    }

    /// Record a moderation decision alongside the status change
    pub async fn record_decision(
        submission: &Submission,
        reviewed_by: ResidentId,
        reason: Option<&str>,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        Self::append(
            AuditKind::ModerationDecision,
            Some(submission.id),
            None,
            None,
            json!({
                "decision": submission.status,
                "reviewed_by": reviewed_by,
                "reason": reason,
            }),
            conn,
        )
        .await
    }

    /// Record a successful email delivery
    pub async fn record_email_sent(
        job: &NotificationJob,
        provider_message_id: &str,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        Self::append(
            AuditKind::EmailSent,
            Some(job.submission_id),
            Some(job.id),
            Some(job.idempotency_key.clone()),
            json!({
                "provider_message_id": provider_message_id,
                "recipient": job.recipient,
            }),
            conn,
        )
        .await
    }

    /// Record a notification that will never be delivered
    pub async fn record_email_error(
        job: &NotificationJob,
        error: &str,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        Self::append(
            AuditKind::EmailError,
            Some(job.submission_id),
            Some(job.id),
            Some(job.idempotency_key.clone()),
            json!({
                "error": error,
                "recipient": job.recipient,
                "attempts": job.attempts,
            }),
            conn,
        )
        .await
    }

    /// Find the `email_sent` record for an idempotency key, if delivery
    /// already succeeded once
    pub async fn find_email_sent(
        idempotency_key: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let record = sqlx::query_as::<_, AuditRecord>(
            "SELECT * FROM audit_records WHERE kind = 'email_sent' AND idempotency_key = $1",
        )
        .bind(idempotency_key)
        .fetch_optional(pool)
        .await?;
        Ok(record)
    }

    /// All records touching one submission, newest first
    pub async fn find_by_submission(
        submission_id: SubmissionId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let records = sqlx::query_as::<_, AuditRecord>(
            "SELECT * FROM audit_records WHERE submission_id = $1 ORDER BY occurred_at DESC, id DESC",
        )
        .bind(submission_id)
        .fetch_all(pool)
        .await?;
        Ok(records)
    }

    /// Query the audit trail, newest first, optionally filtered by kind
    /// and/or a lower timestamp bound
    pub async fn query(
        kind: Option<AuditKind>,
        since: Option<DateTime<Utc>>,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let records = sqlx::query_as::<_, AuditRecord>(
            r#"
            SELECT * FROM audit_records
            WHERE ($1::text IS NULL OR kind = $1)
              AND ($2::timestamptz IS NULL OR occurred_at >= $2)
            ORDER BY occurred_at DESC, id DESC
            LIMIT $3
            "#,
        )
        .bind(kind.map(|k| k.to_string()))
        .bind(since)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn kind_display_roundtrip() {
        for kind in [
            AuditKind::EmailSent,
            AuditKind::EmailError,
            AuditKind::ModerationDecision,
        ] {
            let parsed = AuditKind::from_str(&kind.to_string()).unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(AuditKind::from_str("email_bounced").is_err());
    }

    #[test]
    fn provider_message_id_reads_detail() {
        let record = AuditRecord {
            id: AuditRecordId::new(),
            kind: "email_sent".to_string(),
            submission_id: None,
            job_id: None,
            idempotency_key: Some("abc".to_string()),
            detail: json!({ "provider_message_id": "msg-123" }),
            occurred_at: Utc::now(),
        };
        assert_eq!(record.provider_message_id().as_deref(), Some("msg-123"));

        let bare = AuditRecord {
            detail: json!({}),
            ..record
        };
        assert_eq!(bare.provider_message_id(), None);
    }
}
