use axum::extract::{Extension, Query};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::common::AppError;
use crate::domains::audit::activities::query_audit_records;
use crate::domains::audit::models::{AuditKind, AuditRecord};
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;
use crate::server::routes::require_user;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub kind: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

/// GET /api/audit - the pipeline audit trail, newest first
pub async fn query_audit_handler(
    Extension(state): Extension<AxumAppState>,
    user: Option<Extension<AuthUser>>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditRecord>>, AppError> {
    let user = require_user(user)?;

    let kind = match query.kind.as_deref() {
        Some(raw) => Some(
            raw.parse::<AuditKind>()
                .map_err(|_| AppError::Validation(format!("unknown audit kind: {}", raw)))?,
        ),
        None => None,
    };

    let records = query_audit_records(
        kind,
        query.since,
        query.limit,
        user.resident_id,
        &user.email,
        &state.server_deps,
    )
    .await?;

    Ok(Json(records))
}
