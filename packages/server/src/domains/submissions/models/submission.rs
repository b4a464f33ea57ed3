use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{ResidentId, SubmissionId};

/// Submission - a resident photo awaiting (or past) moderation
///
/// Created in 'pending' by intake; the moderation decision is the only write
/// after that. Rows are never deleted, so the table doubles as the history of
/// everything residents ever submitted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Submission {
    pub id: SubmissionId,
    pub owner_id: ResidentId,
    // Captured from the verified session token at intake so notifications
    // never need the identity provider at decision time.
    pub owner_email: String,
    pub category: String,
    pub title: String,
    pub description: Option<String>,
    pub media_ref: String,

    // Moderation state
    pub status: String, // 'pending', 'approved', 'rejected'
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<ResidentId>,
    pub reviewed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submission status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Pending => write!(f, "pending"),
            SubmissionStatus::Approved => write!(f, "approved"),
            SubmissionStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(SubmissionStatus::Pending),
            "approved" => Ok(SubmissionStatus::Approved),
            "rejected" => Ok(SubmissionStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid submission status: {}", s)),
        }
    }
}

impl Submission {
    pub fn status(&self) -> Result<SubmissionStatus> {
        self.status.parse()
    }

    pub fn is_pending(&self) -> bool {
        self.status == "pending"
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Submission {
    /// Find submission by ID
    pub async fn find_by_id(id: SubmissionId, pool: &PgPool) -> Result<Option<Self>> {
        let submission =
            sqlx::query_as::<_, Submission>("SELECT * FROM submissions WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(submission)
    }

    /// Find a resident's own submissions, newest first
    pub async fn find_by_owner(owner_id: ResidentId, pool: &PgPool) -> Result<Vec<Self>> {
        let submissions = sqlx::query_as::<_, Submission>(
            "SELECT * FROM submissions WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;
        Ok(submissions)
    }

    /// Find submissions awaiting review, oldest first
    pub async fn find_pending_review(pool: &PgPool) -> Result<Vec<Self>> {
        let submissions = sqlx::query_as::<_, Submission>(
            "SELECT * FROM submissions WHERE status = 'pending' ORDER BY created_at",
        )
        .fetch_all(pool)
        .await?;
        Ok(submissions)
    }

    /// Create a new photo submission (starts as pending)
    pub async fn create(
        owner_id: ResidentId,
        owner_email: String,
        category: String,
        title: String,
        description: Option<String>,
        media_ref: String,
        pool: &PgPool,
    ) -> Result<Self> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (
                id,
                owner_id,
                owner_email,
                category,
                title,
                description,
                media_ref,
                status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending')
            RETURNING *
            "#,
        )
        .bind(SubmissionId::new())
        .bind(owner_id)
        .bind(owner_email)
        .bind(category)
        .bind(title)
        .bind(description)
        .bind(media_ref)
        .fetch_one(pool)
        .await?;
        Ok(submission)
    }

    /// Approve a pending submission
    ///
    /// Conditional on the current status: returns `None` if the row is
    /// missing or already decided, so concurrent reviewers cannot both win.
    /// Takes a connection so the caller can pair it with the audit insert in
    /// one transaction.
    pub async fn approve(
        id: SubmissionId,
        reviewed_by: ResidentId,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            UPDATE submissions
            SET
                status = 'approved',
                reviewed_by = $2,
                reviewed_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reviewed_by)
        .fetch_optional(conn)
        .await?;
        Ok(submission)
    }

    /// Reject a pending submission with a reason
    ///
    /// Same conditional semantics as [`Submission::approve`].
    pub async fn reject(
        id: SubmissionId,
        reviewed_by: ResidentId,
        rejection_reason: String,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            UPDATE submissions
            SET
                status = 'rejected',
                reviewed_by = $2,
                reviewed_at = NOW(),
                rejection_reason = $3,
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reviewed_by)
        .bind(rejection_reason)
        .fetch_optional(conn)
        .await?;
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_display_roundtrip() {
        for status in [
            SubmissionStatus::Pending,
            SubmissionStatus::Approved,
            SubmissionStatus::Rejected,
        ] {
            let parsed = SubmissionStatus::from_str(&status.to_string()).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(SubmissionStatus::from_str("suspended").is_err());
        assert!(SubmissionStatus::from_str("").is_err());
    }
}
