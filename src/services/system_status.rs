//! Service status store
//!
//! One row per named service, pre-seeded by migrations. Writes replace the
//! mutable columns in a single statement; the last write wins.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::service_status::{self, KnownService, ServiceState};

/// Admin request to flip a service's status
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    #[validate(length(min = 1, max = 255, message = "serviceName must not be empty"))]
    pub service_name: String,
    /// Raw value; parsed against the allow-list before anything is written.
    /// Non-string JSON is kept as its text so it is rejected like any other value.
    #[serde(default, deserialize_with = "status_text")]
    pub status: String,
    #[validate(length(max = 2000, message = "maintenanceMessage is too long"))]
    pub maintenance_message: Option<String>,
}

fn status_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(status) => status,
        other => other.to_string(),
    })
}

impl StatusUpdate {
    /// Validate shape and parse the status value
    pub fn parse(&self) -> Result<ServiceState> {
        self.validate()?;
        self.status
            .parse::<ServiceState>()
            .map_err(AppError::Validation)
    }
}

/// What the check endpoint reports for one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCheck {
    pub status: ServiceState,
    pub maintenance_message: String,
}

/// Before/after pair returned by [`update_status`]
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub previous: ServiceState,
    pub current: service_status::Model,
}

pub async fn find_status<C: ConnectionTrait>(
    db: &C,
    service_name: &str,
) -> Result<Option<service_status::Model>> {
    let row = service_status::Entity::find()
        .filter(service_status::Column::ServiceName.eq(service_name))
        .one(db)
        .await?;
    Ok(row)
}

pub async fn list_statuses<C: ConnectionTrait>(db: &C) -> Result<Vec<service_status::Model>> {
    let rows = service_status::Entity::find()
        .order_by_asc(service_status::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

/// Read-only lookup behind the check endpoint
pub async fn check_status<C: ConnectionTrait>(
    db: &C,
    service: KnownService,
) -> Result<StatusCheck> {
    let row = find_status(db, service.name()).await?.ok_or_else(|| {
        AppError::NotFound(format!("No status recorded for '{}'", service.name()))
    })?;

    Ok(StatusCheck {
        status: row.status,
        maintenance_message: row.maintenance_message,
    })
}

/// Apply an admin status change.
///
/// The status value is checked before the database is touched, so an invalid
/// request never mutates the row. An omitted maintenance message keeps the
/// stored one.
pub async fn update_status<C: ConnectionTrait>(
    db: &C,
    update: &StatusUpdate,
    updated_by: &str,
) -> Result<StatusChange> {
    let new_state = update.parse()?;

    let existing = find_status(db, &update.service_name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Service '{}' not found", update.service_name)))?;

    let previous = existing.status;
    let mut row = existing.into_active_model();
    row.status = Set(new_state);
    if let Some(message) = &update.maintenance_message {
        row.maintenance_message = Set(message.clone());
    }
    row.updated_by = Set(Some(updated_by.to_string()));
    row.updated_at = Set(chrono::Utc::now());

    let current = row.update(db).await?;

    tracing::info!(
        service = %current.service_name,
        from = %previous,
        to = %current.status,
        updated_by,
        "Service status updated"
    );

    Ok(StatusChange { previous, current })
}
