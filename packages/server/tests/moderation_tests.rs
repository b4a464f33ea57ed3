//! Integration tests for the moderation decision workflow.
//!
//! Covers decide_submission and list_moderation_queue:
//! - approve/reject state transitions with reviewer attribution
//! - the decision audit record committing with the status change
//! - owner notification enqueued exactly once per decision
//! - admin gating and the one-winner guarantee under concurrency

mod common;

use crate::common::{create_pending_submission, TestHarness};
use portal_core::common::{AppError, ResidentId, SubmissionId};
use portal_core::domains::audit::models::AuditRecord;
use portal_core::domains::notifications::models::{NotificationJob, NotificationKind};
use portal_core::domains::submissions::activities::{decide_submission, list_moderation_queue};
use portal_core::domains::submissions::models::Submission;
use portal_core::domains::submissions::Decision;
use portal_core::kernel::{TestDependencies, TEST_ADMIN_EMAIL};
use test_context::test_context;

// =============================================================================
// Approval Tests
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn approval_records_reviewer_and_audit(ctx: &TestHarness) {
    let deps = TestDependencies::new().into_deps(ctx.db_pool.clone());
    let submission = create_pending_submission(&ctx.db_pool, "Ice out on Lake Ripley")
        .await
        .expect("Failed to create submission");
    let reviewer = ResidentId::new();

    let decided = decide_submission(
        submission.id,
        Decision::Approve,
        None,
        reviewer,
        TEST_ADMIN_EMAIL,
        &deps,
    )
    .await
    .expect("Failed to approve submission");

    assert_eq!(decided.status, "approved");
    assert_eq!(decided.reviewed_by, Some(reviewer));
    assert!(decided.reviewed_at.is_some());
    assert!(decided.rejection_reason.is_none());

    // The decision record committed with the status change
    let records = AuditRecord::find_by_submission(submission.id, &ctx.db_pool)
        .await
        .expect("Failed to query audit records");
    let decisions: Vec<_> = records
        .iter()
        .filter(|r| r.kind == "moderation_decision")
        .collect();
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].detail["decision"], "approved");
    assert_eq!(
        decisions[0].detail["reviewed_by"],
        reviewer.to_string().as_str()
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn approval_queues_owner_notification(ctx: &TestHarness) {
    let deps = TestDependencies::new().into_deps(ctx.db_pool.clone());
    let submission = create_pending_submission(&ctx.db_pool, "Osprey over the narrows")
        .await
        .expect("Failed to create submission");

    decide_submission(
        submission.id,
        Decision::Approve,
        None,
        ResidentId::new(),
        TEST_ADMIN_EMAIL,
        &deps,
    )
    .await
    .expect("Failed to approve submission");

    let jobs = NotificationJob::find_by_submission(submission.id, &ctx.db_pool)
        .await
        .expect("Failed to query jobs");
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].kind, NotificationKind::Approval);
    assert_eq!(jobs[0].recipient, submission.owner_email);
    assert_eq!(jobs[0].attempts, 0);
    assert!(jobs[0].subject.contains("Osprey over the narrows"));
}

// =============================================================================
// Rejection Tests
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn rejection_requires_a_reason(ctx: &TestHarness) {
    let deps = TestDependencies::new().into_deps(ctx.db_pool.clone());
    let submission = create_pending_submission(&ctx.db_pool, "Unlabeled dock photo")
        .await
        .expect("Failed to create submission");

    let err = decide_submission(
        submission.id,
        Decision::Reject,
        None,
        ResidentId::new(),
        TEST_ADMIN_EMAIL,
        &deps,
    )
    .await
    .expect_err("Rejection without a reason should fail");
    assert!(matches!(err, AppError::Validation(_)));

    // A whitespace-only reason is no reason
    let err = decide_submission(
        submission.id,
        Decision::Reject,
        Some("   ".to_string()),
        ResidentId::new(),
        TEST_ADMIN_EMAIL,
        &deps,
    )
    .await
    .expect_err("Rejection with a blank reason should fail");
    assert!(matches!(err, AppError::Validation(_)));

    // The submission is untouched and still decidable
    let stored = Submission::find_by_id(submission.id, &ctx.db_pool)
        .await
        .expect("Failed to find submission")
        .expect("Submission should exist");
    assert!(stored.is_pending());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn rejection_stores_reason_and_queues_notification(ctx: &TestHarness) {
    let deps = TestDependencies::new().into_deps(ctx.db_pool.clone());
    let submission = create_pending_submission(&ctx.db_pool, "Blurry muskrat")
        .await
        .expect("Failed to create submission");
    let reviewer = ResidentId::new();

    let decided = decide_submission(
        submission.id,
        Decision::Reject,
        Some("too dark to identify the subject".to_string()),
        reviewer,
        TEST_ADMIN_EMAIL,
        &deps,
    )
    .await
    .expect("Failed to reject submission");

    assert_eq!(decided.status, "rejected");
    assert_eq!(
        decided.rejection_reason.as_deref(),
        Some("too dark to identify the subject")
    );
    assert_eq!(decided.reviewed_by, Some(reviewer));

    // The audit record carries the reason
    let records = AuditRecord::find_by_submission(submission.id, &ctx.db_pool)
        .await
        .expect("Failed to query audit records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].detail["reason"], "too dark to identify the subject");

    // The owner is told why
    let jobs = NotificationJob::find_by_submission(submission.id, &ctx.db_pool)
        .await
        .expect("Failed to query jobs");
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].kind, NotificationKind::Rejection);
    assert!(jobs[0].body.contains("too dark to identify the subject"));
}

// =============================================================================
// Gating and Transition Tests
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn non_admin_cannot_decide(ctx: &TestHarness) {
    let deps = TestDependencies::new().into_deps(ctx.db_pool.clone());
    let submission = create_pending_submission(&ctx.db_pool, "Fishing opener crowd")
        .await
        .expect("Failed to create submission");

    let err = decide_submission(
        submission.id,
        Decision::Approve,
        None,
        ResidentId::new(),
        "neighbor@example.org",
        &deps,
    )
    .await
    .expect_err("Non-admin decision should fail");
    assert!(matches!(err, AppError::Forbidden(_)));

    // Nothing changed, nothing was recorded or queued
    let stored = Submission::find_by_id(submission.id, &ctx.db_pool)
        .await
        .expect("Failed to find submission")
        .expect("Submission should exist");
    assert!(stored.is_pending());

    let records = AuditRecord::find_by_submission(submission.id, &ctx.db_pool)
        .await
        .expect("Failed to query audit records");
    assert!(records.is_empty());

    let jobs = NotificationJob::find_by_submission(submission.id, &ctx.db_pool)
        .await
        .expect("Failed to query jobs");
    assert!(jobs.is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn deciding_missing_submission_is_not_found(ctx: &TestHarness) {
    let deps = TestDependencies::new().into_deps(ctx.db_pool.clone());

    let err = decide_submission(
        SubmissionId::new(),
        Decision::Approve,
        None,
        ResidentId::new(),
        TEST_ADMIN_EMAIL,
        &deps,
    )
    .await
    .expect_err("Deciding a missing submission should fail");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn decided_submission_cannot_be_decided_again(ctx: &TestHarness) {
    let deps = TestDependencies::new().into_deps(ctx.db_pool.clone());
    let submission = create_pending_submission(&ctx.db_pool, "Main street in the rain")
        .await
        .expect("Failed to create submission");

    decide_submission(
        submission.id,
        Decision::Approve,
        None,
        ResidentId::new(),
        TEST_ADMIN_EMAIL,
        &deps,
    )
    .await
    .expect("First decision should succeed");

    // Re-approving and flipping to rejected are both invalid transitions
    let err = decide_submission(
        submission.id,
        Decision::Approve,
        None,
        ResidentId::new(),
        TEST_ADMIN_EMAIL,
        &deps,
    )
    .await
    .expect_err("Second decision should fail");
    assert!(matches!(err, AppError::InvalidTransition(_)));

    let err = decide_submission(
        submission.id,
        Decision::Reject,
        Some("changed my mind".to_string()),
        ResidentId::new(),
        TEST_ADMIN_EMAIL,
        &deps,
    )
    .await
    .expect_err("Flipping a decision should fail");
    assert!(matches!(err, AppError::InvalidTransition(_)));

    let stored = Submission::find_by_id(submission.id, &ctx.db_pool)
        .await
        .expect("Failed to find submission")
        .expect("Submission should exist");
    assert_eq!(stored.status, "approved");

    // The failed attempts recorded nothing and queued nothing
    let records = AuditRecord::find_by_submission(submission.id, &ctx.db_pool)
        .await
        .expect("Failed to query audit records");
    assert_eq!(
        records
            .iter()
            .filter(|r| r.kind == "moderation_decision")
            .count(),
        1
    );
    let jobs = NotificationJob::find_by_submission(submission.id, &ctx.db_pool)
        .await
        .expect("Failed to query jobs");
    assert_eq!(jobs.len(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_decisions_have_exactly_one_winner(ctx: &TestHarness) {
    let deps = TestDependencies::new().into_deps(ctx.db_pool.clone());
    let submission = create_pending_submission(&ctx.db_pool, "Contested sunset")
        .await
        .expect("Failed to create submission");

    let approve = decide_submission(
        submission.id,
        Decision::Approve,
        None,
        ResidentId::new(),
        TEST_ADMIN_EMAIL,
        &deps,
    );
    let reject = decide_submission(
        submission.id,
        Decision::Reject,
        Some("duplicate of an earlier submission".to_string()),
        ResidentId::new(),
        TEST_ADMIN_EMAIL,
        &deps,
    );

    let (approve_result, reject_result) = tokio::join!(approve, reject);

    let winners = [approve_result.is_ok(), reject_result.is_ok()]
        .into_iter()
        .filter(|won| *won)
        .count();
    assert_eq!(winners, 1, "exactly one decision must win");

    // The loser sees a conflict, not a silent overwrite
    let loser = if approve_result.is_err() {
        approve_result.unwrap_err()
    } else {
        reject_result.unwrap_err()
    };
    assert!(matches!(loser, AppError::InvalidTransition(_)));

    // Stored state belongs to the winner, and the fan-out happened once
    let stored = Submission::find_by_id(submission.id, &ctx.db_pool)
        .await
        .expect("Failed to find submission")
        .expect("Submission should exist");
    assert!(stored.status == "approved" || stored.status == "rejected");

    let records = AuditRecord::find_by_submission(submission.id, &ctx.db_pool)
        .await
        .expect("Failed to query audit records");
    let decisions = records
        .iter()
        .filter(|r| r.kind == "moderation_decision")
        .count();
    assert_eq!(decisions, 1);

    let jobs = NotificationJob::find_by_submission(submission.id, &ctx.db_pool)
        .await
        .expect("Failed to query jobs");
    assert_eq!(jobs.len(), 1);
}

// =============================================================================
// Moderation Queue Tests
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn moderation_queue_is_oldest_first_and_shrinks_on_decision(ctx: &TestHarness) {
    let deps = TestDependencies::new().into_deps(ctx.db_pool.clone());
    let admin_id = ResidentId::new();

    let older = create_pending_submission(&ctx.db_pool, "Grain elevator at dusk")
        .await
        .expect("Failed to create submission");
    tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    let newer = create_pending_submission(&ctx.db_pool, "Grain elevator at dawn")
        .await
        .expect("Failed to create submission");

    // Other tests add their own pending rows concurrently, so assert on
    // relative order of this test's rows rather than on the whole queue.
    let queue = list_moderation_queue(admin_id, TEST_ADMIN_EMAIL, &deps)
        .await
        .expect("Failed to list queue");
    let older_pos = queue
        .iter()
        .position(|s| s.id == older.id)
        .expect("Older submission should be queued");
    let newer_pos = queue
        .iter()
        .position(|s| s.id == newer.id)
        .expect("Newer submission should be queued");
    assert!(older_pos < newer_pos, "queue must be oldest first");

    decide_submission(
        older.id,
        Decision::Approve,
        None,
        admin_id,
        TEST_ADMIN_EMAIL,
        &deps,
    )
    .await
    .expect("Failed to approve submission");

    let queue = list_moderation_queue(admin_id, TEST_ADMIN_EMAIL, &deps)
        .await
        .expect("Failed to list queue");
    assert!(!queue.iter().any(|s| s.id == older.id));
    assert!(queue.iter().any(|s| s.id == newer.id));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn moderation_queue_requires_admin(ctx: &TestHarness) {
    let deps = TestDependencies::new().into_deps(ctx.db_pool.clone());

    let err = list_moderation_queue(ResidentId::new(), "neighbor@example.org", &deps)
        .await
        .expect_err("Non-admin queue access should fail");
    assert!(matches!(err, AppError::Forbidden(_)));
}
