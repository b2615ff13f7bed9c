//! Best-effort audit trail for administrative mutations
//!
//! Handlers enqueue records through [`AuditLogger::log_action`] without
//! awaiting anything. A single [`AuditWorker`] drains the bounded queue into
//! `audit_logs`. A full queue or a failed insert is logged and dropped; neither
//! ever reaches the HTTP response.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{header::USER_AGENT, request::Parts};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::db::DbConn;
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::audit_log::{self, AuditAction, TargetType};

/// Name recorded when a mutation arrives without an authenticated user
pub const UNKNOWN_ADMIN: &str = "Unknown";

/// Who made a request and from where, captured verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub admin_id: Option<i64>,
    pub admin_name: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestContext {
    pub fn from_parts(parts: &Parts) -> Self {
        let user = parts.extensions.get::<AuthenticatedUser>();

        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            });

        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        Self {
            admin_id: user.map(|u| u.0.id),
            admin_name: Some(
                user.map(|u| u.0.label().to_string())
                    .unwrap_or_else(|| UNKNOWN_ADMIN.to_string()),
            ),
            ip_address,
            user_agent,
        }
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

/// One queued audit record
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub context: RequestContext,
    pub action: AuditAction,
    pub target_type: TargetType,
    pub target_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Sending half of the audit queue
#[derive(Clone)]
pub struct AuditLogger {
    tx: mpsc::Sender<AuditEntry>,
    dropped: Arc<AtomicU64>,
}

/// Receiving half of the audit queue, consumed by [`AuditWorker`]
pub struct AuditQueue(mpsc::Receiver<AuditEntry>);

impl AuditLogger {
    /// Create a bounded queue without starting a worker
    pub fn channel(capacity: usize) -> (Self, AuditQueue) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                tx,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            AuditQueue(rx),
        )
    }

    /// Create a queue and spawn its worker on the current runtime.
    ///
    /// The worker finishes once every logger clone is dropped and the queue
    /// is drained.
    pub fn spawn(db: DbConn, capacity: usize) -> (Self, JoinHandle<()>) {
        let (logger, queue) = Self::channel(capacity);
        let handle = tokio::spawn(AuditWorker::new(db, queue).run());
        (logger, handle)
    }

    /// Enqueue an audit record. Never blocks and never fails the caller.
    pub fn log_action(
        &self,
        context: &RequestContext,
        action: AuditAction,
        target_type: TargetType,
        target_id: Option<String>,
        details: Option<serde_json::Value>,
    ) {
        let entry = AuditEntry {
            context: context.clone(),
            action,
            target_type,
            target_id,
            details,
            created_at: chrono::Utc::now(),
        };

        match self.tx.try_send(entry) {
            Ok(()) => {}
            Err(TrySendError::Full(entry)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(action = %entry.action, "Audit queue full, dropping record");
            }
            Err(TrySendError::Closed(entry)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(action = %entry.action, "Audit worker stopped, dropping record");
            }
        }
    }

    /// Records discarded because the queue was full or closed
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Drains the audit queue into `audit_logs`
pub struct AuditWorker {
    db: DbConn,
    queue: AuditQueue,
}

impl AuditWorker {
    pub fn new(db: DbConn, queue: AuditQueue) -> Self {
        Self { db, queue }
    }

    pub async fn run(mut self) {
        tracing::debug!("Audit worker started");

        while let Some(entry) = self.queue.0.recv().await {
            let action = entry.action;
            if let Err(e) = insert_entry(&self.db, entry).await {
                tracing::error!(action = %action, error = %e, "Failed to write audit log");
            }
        }

        tracing::debug!("Audit worker stopped");
    }
}

async fn insert_entry(db: &DbConn, entry: AuditEntry) -> Result<()> {
    let row = audit_log::ActiveModel {
        admin_id: Set(entry.context.admin_id),
        admin_name: Set(entry.context.admin_name),
        action: Set(entry.action.to_string()),
        target_type: Set(entry.target_type.to_string()),
        target_id: Set(entry.target_id),
        details: Set(entry.details.map(|d| d.to_string())),
        ip_address: Set(entry.context.ip_address),
        user_agent: Set(entry.context.user_agent),
        created_at: Set(entry.created_at),
        ..Default::default()
    };

    row.insert(db).await?;
    Ok(())
}

/// Query parameters for fetching audit logs
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditLogQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub admin_id: Option<i64>,
    pub action: Option<String>,
    pub target_type: Option<String>,
}

/// Paginated audit log response
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct AuditLogResponse {
    pub logs: Vec<audit_log::Model>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// Get audit logs, newest first, with filtering and pagination
pub async fn get_audit_logs(db: &DbConn, query: AuditLogQuery) -> Result<AuditLogResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(50).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut select = audit_log::Entity::find();

    if let Some(admin_id) = query.admin_id {
        select = select.filter(audit_log::Column::AdminId.eq(admin_id));
    }

    if let Some(action) = &query.action {
        select = select.filter(audit_log::Column::Action.eq(action.clone()));
    }

    if let Some(target_type) = &query.target_type {
        select = select.filter(audit_log::Column::TargetType.eq(target_type.clone()));
    }

    let total = select.clone().count(db).await?;

    let logs = select
        .order_by_desc(audit_log::Column::CreatedAt)
        .order_by_desc(audit_log::Column::Id)
        .offset(offset)
        .limit(per_page)
        .all(db)
        .await?;

    let total_pages = total.div_ceil(per_page);

    Ok(AuditLogResponse {
        logs,
        total,
        page,
        per_page,
        total_pages,
    })
}
