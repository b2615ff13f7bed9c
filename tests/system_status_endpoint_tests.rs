//! System status endpoint integration tests
//!
//! Covers:
//! - `GET /api/system/system-status/{slug}/check` (public)
//! - `GET /api/system/system-status` (admin)
//! - `PUT|POST /api/system/system-status` (admin) and the audit record it queues
//! - 401 / 403 / 404 / 422 rejections
//! - audit failures never leaking into the write's response

use axum::http::StatusCode;
use sea_orm::ConnectionTrait;

mod common;
use common::{
    build_test_app, build_test_app_state, create_test_admin, create_test_db, create_test_user,
    send, token_for, wait_for_audit_rows,
};

use habesha_admin::models::service_status::{KnownService, ServiceState};
use habesha_admin::services::system_status;

const STATUS_URI: &str = "/api/system/system-status";
const CHECK_URI: &str = "/api/system/system-status/admin-panel/check";

// ============================================================================
// Check endpoint
// ============================================================================

#[tokio::test]
async fn test_check_reports_seeded_activated_status() {
    let db = create_test_db().await;
    let (state, _worker) = build_test_app_state(db);
    let app = build_test_app(state);

    let (status, body) = send(&app, "GET", CHECK_URI, None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "activated");
    assert_eq!(body["maintenance_message"], "");
}

#[tokio::test]
async fn test_check_public_website_slug() {
    let db = create_test_db().await;
    let (state, _worker) = build_test_app_state(db);
    let app = build_test_app(state);

    let (status, body) = send(
        &app,
        "GET",
        "/api/system/system-status/public-website/check",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "activated");
}

#[tokio::test]
async fn test_check_unknown_slug_is_not_found() {
    let db = create_test_db().await;
    let (state, _worker) = build_test_app_state(db);
    let app = build_test_app(state);

    let (status, body) = send(
        &app,
        "GET",
        "/api/system/system-status/payments/check",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("payments"));
}

#[tokio::test]
async fn test_check_missing_row_is_not_found() {
    let db = create_test_db().await;
    db.execute_unprepared("DELETE FROM service_status WHERE service_name = 'Admin Panel'")
        .await
        .unwrap();
    let (state, _worker) = build_test_app_state(db);
    let app = build_test_app(state);

    let (status, body) = send(&app, "GET", CHECK_URI, None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_check_database_failure_is_server_error() {
    let db = create_test_db().await;
    db.execute_unprepared("DROP TABLE service_status")
        .await
        .unwrap();
    let (state, _worker) = build_test_app_state(db);
    let app = build_test_app(state);

    let (status, body) = send(&app, "GET", CHECK_URI, None, None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Database error");
    assert!(body["error"].is_string());
}

// ============================================================================
// Admin endpoint: access control
// ============================================================================

#[tokio::test]
async fn test_update_without_token_is_unauthorized() {
    let db = create_test_db().await;
    let (state, _worker) = build_test_app_state(db);
    let app = build_test_app(state);

    let (status, body) = send(
        &app,
        "PUT",
        STATUS_URI,
        None,
        Some(serde_json::json!({"serviceName": "Admin Panel", "status": "deactivated"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_update_with_garbage_token_is_unauthorized() {
    let db = create_test_db().await;
    let (state, _worker) = build_test_app_state(db);
    let app = build_test_app(state);

    let (status, _) = send(
        &app,
        "PUT",
        STATUS_URI,
        Some("not-a-jwt"),
        Some(serde_json::json!({"serviceName": "Admin Panel", "status": "deactivated"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_admin_is_forbidden() {
    let db = create_test_db().await;
    let editor = create_test_user(&db, "dawit", None, false).await;
    let (state, _worker) = build_test_app_state(db.clone());
    let app = build_test_app(state);

    let (status, body) = send(
        &app,
        "PUT",
        STATUS_URI,
        Some(&token_for(&editor)),
        Some(serde_json::json!({"serviceName": "Admin Panel", "status": "deactivated"})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Admin access required");

    let row = system_status::find_status(&db, "Admin Panel")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, ServiceState::Activated);
}

#[tokio::test]
async fn test_list_requires_admin() {
    let db = create_test_db().await;
    let admin = create_test_admin(&db).await;
    let editor = create_test_user(&db, "dawit", None, false).await;
    let (state, _worker) = build_test_app_state(db);
    let app = build_test_app(state);

    let (status, _) = send(&app, "GET", STATUS_URI, Some(&token_for(&editor)), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", STATUS_URI, Some(&token_for(&admin)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["serviceName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Admin Panel", "Public Website"]);
}

// ============================================================================
// Admin endpoint: writes
// ============================================================================

#[tokio::test]
async fn test_deactivate_then_check_reports_message() {
    let db = create_test_db().await;
    let admin = create_test_admin(&db).await;
    let (state, _worker) = build_test_app_state(db.clone());
    let app = build_test_app(state);

    let (status, body) = send(
        &app,
        "PUT",
        STATUS_URI,
        Some(&token_for(&admin)),
        Some(serde_json::json!({
            "serviceName": "Admin Panel",
            "status": "deactivated",
            "maintenanceMessage": "Back at 0400"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "deactivated");
    assert_eq!(body["data"]["maintenanceMessage"], "Back at 0400");
    assert_eq!(body["data"]["updatedBy"], "Selam Tesfaye");

    let (status, body) = send(&app, "GET", CHECK_URI, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "deactivated");
    assert_eq!(body["maintenance_message"], "Back at 0400");
}

#[tokio::test]
async fn test_post_is_accepted_like_put() {
    let db = create_test_db().await;
    let admin = create_test_admin(&db).await;
    let (state, _worker) = build_test_app_state(db.clone());
    let app = build_test_app(state);

    let (status, _) = send(
        &app,
        "POST",
        STATUS_URI,
        Some(&token_for(&admin)),
        Some(serde_json::json!({"serviceName": "Public Website", "status": "deactivated"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let check = system_status::check_status(&db, KnownService::PublicWebsite)
        .await
        .unwrap();
    assert_eq!(check.status, ServiceState::Deactivated);
}

#[tokio::test]
async fn test_invalid_status_is_rejected_and_row_untouched() {
    let db = create_test_db().await;
    let admin = create_test_admin(&db).await;
    let (state, _worker) = build_test_app_state(db.clone());
    let app = build_test_app(state);

    let before = system_status::find_status(&db, "Admin Panel")
        .await
        .unwrap()
        .unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        STATUS_URI,
        Some(&token_for(&admin)),
        Some(serde_json::json!({
            "serviceName": "Admin Panel",
            "status": "maintenance",
            "maintenanceMessage": "should not be stored"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);

    let after = system_status::find_status(&db, "Admin Panel")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(before, after);

    let logs = wait_for_audit_rows(&db, 1).await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, "service_status_update_rejected");
}

#[tokio::test]
async fn test_non_string_status_is_rejected_with_envelope_and_audited() {
    let db = create_test_db().await;
    let admin = create_test_admin(&db).await;
    let (state, _worker) = build_test_app_state(db.clone());
    let app = build_test_app(state);

    let (status, body) = send(
        &app,
        "PUT",
        STATUS_URI,
        Some(&token_for(&admin)),
        Some(serde_json::json!({"serviceName": "Admin Panel", "status": 7})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("'7'"));

    let logs = wait_for_audit_rows(&db, 1).await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, "service_status_update_rejected");

    let check = system_status::check_status(&db, KnownService::AdminPanel)
        .await
        .unwrap();
    assert_eq!(check.status, ServiceState::Activated);
}

#[tokio::test]
async fn test_malformed_body_gets_json_envelope() {
    let db = create_test_db().await;
    let admin = create_test_admin(&db).await;
    let (state, _worker) = build_test_app_state(db);
    let app = build_test_app(state);

    let (status, body) = send(
        &app,
        "PUT",
        STATUS_URI,
        Some(&token_for(&admin)),
        Some(serde_json::json!({"status": "deactivated"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_unknown_service_is_not_found() {
    let db = create_test_db().await;
    let admin = create_test_admin(&db).await;
    let (state, _worker) = build_test_app_state(db);
    let app = build_test_app(state);

    let (status, body) = send(
        &app,
        "PUT",
        STATUS_URI,
        Some(&token_for(&admin)),
        Some(serde_json::json!({"serviceName": "Payments", "status": "deactivated"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_successful_write_queues_audit_record() {
    let db = create_test_db().await;
    let admin = create_test_admin(&db).await;
    let (state, _worker) = build_test_app_state(db.clone());
    let app = build_test_app(state);

    let (status, body) = send(
        &app,
        "PUT",
        STATUS_URI,
        Some(&token_for(&admin)),
        Some(serde_json::json!({
            "serviceName": "Admin Panel",
            "status": "deactivated",
            "maintenanceMessage": "Back at 0400"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let logs = wait_for_audit_rows(&db, 1).await;
    assert_eq!(logs.len(), 1);

    let log = &logs[0];
    assert_eq!(log.action, "service_status_updated");
    assert_eq!(log.target_type, "service_status");
    assert_eq!(log.target_id.as_deref(), Some(body["data"]["id"].to_string().as_str()));
    assert_eq!(log.admin_id, Some(admin.id));
    assert_eq!(log.admin_name.as_deref(), Some("Selam Tesfaye"));

    let details: serde_json::Value =
        serde_json::from_str(log.details.as_deref().unwrap()).unwrap();
    assert_eq!(details["serviceName"], "Admin Panel");
    assert_eq!(details["status"], "deactivated");
    assert_eq!(details["previousStatus"], "activated");
    assert_eq!(details["maintenanceMessage"], "Back at 0400");
}

#[tokio::test]
async fn test_audit_failure_does_not_change_response() {
    let db = create_test_db().await;
    let admin = create_test_admin(&db).await;
    let token = token_for(&admin);
    let request = serde_json::json!({
        "serviceName": "Admin Panel",
        "status": "deactivated",
        "maintenanceMessage": "Back at 0400"
    });

    // Baseline with a working audit table
    let (state, _worker) = build_test_app_state(db.clone());
    let app = build_test_app(state);
    let (ok_status, ok_body) =
        send(&app, "PUT", STATUS_URI, Some(&token), Some(request.clone())).await;

    // Same write with every audit insert failing
    db.execute_unprepared("DROP TABLE audit_logs").await.unwrap();
    let (status, body) = send(&app, "PUT", STATUS_URI, Some(&token), Some(request)).await;

    assert_eq!(status, ok_status);
    assert_eq!(body["success"], ok_body["success"]);
    assert_eq!(body["message"], ok_body["message"]);
    assert_eq!(body["data"]["status"], ok_body["data"]["status"]);
    assert_eq!(
        body["data"]["maintenanceMessage"],
        ok_body["data"]["maintenanceMessage"]
    );
}
