use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::SubmissionId;
use crate::domains::submissions::models::{Submission, SubmissionStatus};

/// GalleryEntry - the public projection of an approved submission
///
/// This shape is what the gallery endpoints return and what gets pushed to
/// the search index as a document. Moderation fields (owner, reviewer,
/// rejection reason) never appear here.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GalleryEntry {
    pub id: SubmissionId,
    pub title: String,
    pub category: String,
    pub description: Option<String>,
    pub media_ref: String,
    pub approved_at: Option<DateTime<Utc>>,
}

impl GalleryEntry {
    /// Build the gallery projection of a submission.
    ///
    /// Only approved submissions have one; anything else returns `None`.
    pub fn from_submission(submission: &Submission) -> Option<Self> {
        match submission.status() {
            Ok(SubmissionStatus::Approved) => Some(Self {
                id: submission.id,
                title: submission.title.clone(),
                category: submission.category.clone(),
                description: submission.description.clone(),
                media_ref: submission.media_ref.clone(),
                approved_at: submission.reviewed_at,
            }),
            _ => None,
        }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl GalleryEntry {
    /// List approved entries, most recently approved first
    ///
    /// Reads straight from the submissions table; the search index is only a
    /// secondary projection of these rows.
    pub async fn list_approved(pool: &PgPool) -> Result<Vec<Self>> {
        let entries = sqlx::query_as::<_, GalleryEntry>(
            r#"
            SELECT id, title, category, description, media_ref, reviewed_at AS approved_at
            FROM submissions
            WHERE status = 'approved'
            ORDER BY reviewed_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ResidentId;

    fn submission_with_status(status: &str) -> Submission {
        Submission {
            id: SubmissionId::new(),
            owner_id: ResidentId::new(),
            owner_email: "resident@example.org".to_string(),
            category: "Wildlife".to_string(),
            title: "Loon at dawn".to_string(),
            description: Some("Taken from the public dock".to_string()),
            media_ref: "media/loon".to_string(),
            status: status.to_string(),
            rejection_reason: None,
            reviewed_by: None,
            reviewed_at: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn approved_submission_projects_to_entry() {
        let submission = submission_with_status("approved");
        let entry = GalleryEntry::from_submission(&submission).unwrap();

        assert_eq!(entry.id, submission.id);
        assert_eq!(entry.title, "Loon at dawn");
        assert_eq!(entry.approved_at, submission.reviewed_at);
    }

    #[test]
    fn undecided_and_rejected_submissions_do_not_project() {
        assert!(GalleryEntry::from_submission(&submission_with_status("pending")).is_none());
        assert!(GalleryEntry::from_submission(&submission_with_status("rejected")).is_none());
    }
}
