use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::DbConn;
use crate::models::service_status::KnownService;
use crate::services::system_status;

use super::GateStatus;

/// Wire shape of the check endpoint response, read leniently: every field is
/// optional and judged by [`CheckPayload::interpret`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckPayload {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub maintenance_message: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CheckPayload {
    /// Accept only `success: true` with one of the two persisted statuses
    pub fn interpret(self) -> Result<(GateStatus, String), String> {
        if self.success != Some(true) {
            return Err(self
                .message
                .unwrap_or_else(|| "Failed to check system status".to_string()));
        }

        let message = self.maintenance_message.unwrap_or_default();
        match self.status.as_deref() {
            Some("activated") => Ok((GateStatus::Activated, message)),
            Some("deactivated") => Ok((GateStatus::Deactivated, message)),
            Some(other) => Err(format!("Unexpected system status '{}'", other)),
            None => Err("System status missing from response".to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Status check request failed: {0}")]
    Transport(String),

    #[error("Status check returned an unreadable response: {0}")]
    Decode(String),
}

/// Source of the admin panel status for the gate
#[async_trait]
pub trait StatusProbe: Send + Sync {
    async fn check(&self) -> Result<CheckPayload, ProbeError>;
}

/// Calls a remote check endpoint over HTTP. The body is read whatever the
/// status code; only the payload decides.
pub struct HttpStatusProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpStatusProbe {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl StatusProbe for HttpStatusProbe {
    async fn check(&self) -> Result<CheckPayload, ProbeError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ProbeError::Transport(e.to_string()))?;

        response
            .json::<CheckPayload>()
            .await
            .map_err(|e| ProbeError::Decode(e.to_string()))
    }
}

/// Reads the local status store through the same lookup the check endpoint
/// uses, producing the payload that endpoint would have sent.
pub struct StoreProbe {
    db: DbConn,
    service: KnownService,
}

impl StoreProbe {
    pub fn new(db: DbConn, service: KnownService) -> Self {
        Self { db, service }
    }
}

#[async_trait]
impl StatusProbe for StoreProbe {
    async fn check(&self) -> Result<CheckPayload, ProbeError> {
        let payload = match system_status::check_status(&self.db, self.service).await {
            Ok(check) => CheckPayload {
                success: Some(true),
                status: Some(check.status.to_string()),
                maintenance_message: Some(check.maintenance_message),
                message: None,
            },
            Err(e) => CheckPayload {
                success: Some(false),
                message: Some(e.to_string()),
                ..Default::default()
            },
        };

        Ok(payload)
    }
}
