pub mod audit;
pub mod frontend;
pub mod system_status;

use axum::{
    extract::State,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sea_orm::Value;
use utoipa::OpenApi;

use crate::config::CONFIG;
use crate::db;
use crate::middleware::require_auth;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(title = "Habesha Expat Admin API"),
    paths(
        system_status::check_service_status,
        system_status::list_service_statuses,
        system_status::update_service_status,
        audit::list_audit_logs,
    ),
    components(schemas(
        crate::models::service_status::ServiceState,
        crate::models::service_status::Model,
        crate::models::audit_log::Model,
        crate::services::system_status::StatusUpdate,
        crate::services::audit::AuditLogResponse,
        system_status::StatusCheckResponse,
        system_status::StatusListResponse,
        system_status::StatusUpdateResponse,
    )),
    tags(
        (name = "system", description = "Service status switch"),
        (name = "audit", description = "Administrative audit trail"),
    )
)]
pub struct ApiDoc;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/system/health", get(database_health).with_state(state.clone()))
        .route("/api/system/version", get(get_version))
        .route("/api/openapi.json", get(openapi_json))
        .merge(system_status::check_routes(state.clone()));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .merge(system_status::admin_routes(state.clone()))
        .merge(audit::audit_routes(state.clone()))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    // Merge public and protected routes; anything else belongs to the admin shell
    public_routes
        .merge(protected_routes)
        .fallback_service(frontend::shell_routes(state))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Database round trip through the query adapter
async fn database_health(State(state): State<AppState>) -> Response {
    match db::query(&state.db, "SELECT 1", Vec::<Value>::new()).await {
        Ok(_) => Json(serde_json::json!({
            "success": true,
            "database": "connected"
        }))
        .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "success": false,
                    "database": "unavailable",
                    "message": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// Version info endpoint
async fn get_version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "version": CONFIG.version,
        "commit_hash": CONFIG.commit_hash,
        "build_time": CONFIG.build_time,
        "backend": "rust"
    }))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
