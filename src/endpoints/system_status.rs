use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::middleware::permissions::AdminUser;
use crate::models::audit_log::{AuditAction, TargetType};
use crate::models::service_status::{self, KnownService, ServiceState};
use crate::services::audit::RequestContext;
use crate::services::system_status::{self as store, StatusUpdate};
use crate::state::AppState;

/// Public check routes, mounted without auth
pub fn check_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/system/system-status/{slug}/check",
            get(check_service_status),
        )
        .with_state(state)
}

/// Admin routes, mounted behind `require_auth`
pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/system/system-status",
            get(list_service_statuses)
                .put(update_service_status)
                .post(update_service_status),
        )
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StatusCheckResponse {
    pub success: bool,
    pub status: ServiceState,
    pub maintenance_message: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StatusListResponse {
    pub success: bool,
    pub data: Vec<service_status::Model>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StatusUpdateResponse {
    pub success: bool,
    pub message: String,
    pub data: service_status::Model,
}

// ============================================================================
// Handlers
// ============================================================================

/// Current status of one service, read by the admin shell on mount
#[utoipa::path(
    get,
    path = "/api/system/system-status/{slug}/check",
    params(("slug" = String, Path, description = "Service slug, e.g. admin-panel")),
    responses(
        (status = 200, description = "Current status", body = StatusCheckResponse),
        (status = 404, description = "Unknown service or no status row"),
        (status = 500, description = "Database failure"),
    ),
    tag = "system"
)]
pub async fn check_service_status(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<StatusCheckResponse>> {
    let service = KnownService::from_slug(&slug)
        .ok_or_else(|| AppError::NotFound(format!("Unknown service '{}'", slug)))?;

    let check = store::check_status(&state.db, service).await?;

    Ok(Json(StatusCheckResponse {
        success: true,
        status: check.status,
        maintenance_message: check.maintenance_message,
    }))
}

/// Every service status row
#[utoipa::path(
    get,
    path = "/api/system/system-status",
    responses(
        (status = 200, description = "All service statuses", body = StatusListResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin access required"),
    ),
    tag = "system"
)]
pub async fn list_service_statuses(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<StatusListResponse>> {
    let data = store::list_statuses(&state.db).await?;
    Ok(Json(StatusListResponse { success: true, data }))
}

/// Activate or deactivate a service
///
/// The audit record is queued after the outcome is known and never alters it.
#[utoipa::path(
    method(put, post),
    path = "/api/system/system-status",
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Status updated", body = StatusUpdateResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Unknown service"),
        (status = 422, description = "Status outside the allowed values"),
    ),
    tag = "system"
)]
pub async fn update_service_status(
    State(state): State<AppState>,
    admin: AdminUser,
    ctx: RequestContext,
    payload: std::result::Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<StatusUpdateResponse>> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let change = match store::update_status(&state.db, &request, admin.user().label()).await {
        Ok(change) => change,
        Err(AppError::Validation(reason)) => {
            state.audit.log_action(
                &ctx,
                AuditAction::ServiceStatusUpdateRejected,
                TargetType::ServiceStatus,
                None,
                Some(serde_json::json!({
                    "serviceName": request.service_name,
                    "status": request.status,
                    "reason": reason,
                })),
            );
            return Err(AppError::Validation(reason));
        }
        Err(e) => return Err(e),
    };

    let current = change.current;

    state.audit.log_action(
        &ctx,
        AuditAction::ServiceStatusUpdated,
        TargetType::ServiceStatus,
        Some(current.id.to_string()),
        Some(serde_json::json!({
            "serviceName": current.service_name,
            "status": current.status,
            "previousStatus": change.previous,
            "maintenanceMessage": current.maintenance_message,
        })),
    );

    Ok(Json(StatusUpdateResponse {
        success: true,
        message: format!("{} is now {}", current.service_name, current.status),
        data: current,
    }))
}
