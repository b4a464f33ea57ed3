//! Audit trail queries - operator view of the pipeline

use chrono::{DateTime, Utc};

use crate::common::{Actor, AdminCapability, AppError, ResidentId};
use crate::domains::audit::models::{AuditKind, AuditRecord};
use crate::kernel::ServerDeps;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

/// Query the audit trail, newest first.
pub async fn query_audit_records(
    kind: Option<AuditKind>,
    since: Option<DateTime<Utc>>,
    limit: Option<i64>,
    actor_id: ResidentId,
    actor_email: &str,
    deps: &ServerDeps,
) -> Result<Vec<AuditRecord>, AppError> {
    Actor::new(actor_id, actor_email)
        .can(AdminCapability::Moderate)
        .check(deps)
        .await?;

    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    Ok(AuditRecord::query(kind, since, limit, &deps.db_pool).await?)
}
