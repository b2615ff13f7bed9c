//! Test helpers and utilities for integration testing.
//!
//! Provides an in-memory database with the real migrations applied, user
//! fixtures, bearer tokens and a fully wired application state.

#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use sea_orm_migration::MigratorTrait;
use tokio::task::JoinHandle;
use tower::util::ServiceExt;

use habesha_admin::endpoints::create_router;
use habesha_admin::migrations::Migrator;
use habesha_admin::models::{audit_log, user};
use habesha_admin::services::{create_access_token, AuditLogger};
use habesha_admin::state::AppState;

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    // Run migrations using the Migrator (includes the service status seed)
    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

/// Insert a user; `is_admin` decides whether it may use the status switch
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    display_name: Option<&str>,
    is_admin: bool,
) -> user::Model {
    let now = chrono::Utc::now();

    let new_user = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@habeshaexpat.test", username)),
        display_name: Set(display_name.map(str::to_string)),
        is_active: Set(true),
        is_admin: Set(is_admin),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_user.insert(db).await.unwrap()
}

pub async fn create_test_admin(db: &DatabaseConnection) -> user::Model {
    create_test_user(db, "selam", Some("Selam Tesfaye"), true).await
}

/// Bearer token for a fixture user
pub fn token_for(user: &user::Model) -> String {
    create_access_token(user.id, Some(user.label()), None).unwrap()
}

/// Application state with a running audit worker
pub fn build_test_app_state(db: DatabaseConnection) -> (AppState, JoinHandle<()>) {
    let (audit, worker) = AuditLogger::spawn(db.clone(), 64);
    (AppState::new(db, audit), worker)
}

pub fn build_test_app(state: AppState) -> Router {
    create_router(state)
}

/// Send a request and return (status, body as JSON, `Null` if the body is not JSON)
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().uri(uri).method(method);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}

/// Send a request and return (status, body as text)
pub async fn send_text(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, String::from_utf8_lossy(&bytes).into_owned())
}

/// Poll until the asynchronous audit worker has written `expected` rows
pub async fn wait_for_audit_rows(db: &DatabaseConnection, expected: u64) -> Vec<audit_log::Model> {
    for _ in 0..100 {
        let count = audit_log::Entity::find().count(db).await.unwrap();
        if count >= expected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    audit_log::Entity::find().all(db).await.unwrap()
}
