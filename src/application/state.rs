use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::CONFIG;
use crate::gate::{HttpStatusProbe, StatusProbe, StoreProbe};
use crate::models::service_status::KnownService;
use crate::services::audit::AuditLogger;

pub use crate::db::DbConn;

/// Probe shared by every admin shell mount
pub type SharedProbe = Arc<dyn StatusProbe>;

/// Application state containing all shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub audit: AuditLogger,
    pub gate_probe: SharedProbe,
    /// How long one shell mount waits for the probe before rendering the loading page
    pub gate_timeout: Duration,
    /// Built admin SPA served once the gate lets a route through
    pub static_dir: PathBuf,
}

impl AppState {
    /// Build state with the gate probe chosen by configuration: the remote
    /// check endpoint when `HABESHA_GATE_CHECK_URL` is set, the local store otherwise.
    pub fn new(db: DbConn, audit: AuditLogger) -> Self {
        let gate_probe: SharedProbe = match &CONFIG.gate.check_url {
            Some(url) => {
                tracing::info!(url = %url, "Admin gate probes remote status endpoint");
                Arc::new(HttpStatusProbe::new(url.clone()))
            }
            None => Arc::new(StoreProbe::new(db.clone(), KnownService::AdminPanel)),
        };

        Self {
            db,
            audit,
            gate_probe,
            gate_timeout: CONFIG.gate.timeout,
            static_dir: CONFIG.server.static_files_dir.clone(),
        }
    }

    /// Replace the gate probe
    pub fn with_probe(mut self, probe: SharedProbe) -> Self {
        self.gate_probe = probe;
        self
    }

    pub fn with_gate_timeout(mut self, timeout: Duration) -> Self {
        self.gate_timeout = timeout;
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }
}
