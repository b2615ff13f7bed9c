use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::middleware::permissions::AdminUser;
use crate::services::audit::{get_audit_logs, AuditLogQuery, AuditLogResponse};
use crate::state::AppState;

/// Create audit routes
pub fn audit_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/audit", get(list_audit_logs))
        .with_state(state)
}

/// List audit logs with filtering and pagination
#[utoipa::path(
    get,
    path = "/api/audit",
    params(AuditLogQuery),
    responses(
        (status = 200, description = "Audit records, newest first", body = AuditLogResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin access required"),
    ),
    tag = "audit"
)]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<AuditLogResponse>> {
    let logs = get_audit_logs(&state.db, query).await?;
    Ok(Json(logs))
}
