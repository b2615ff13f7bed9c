//! Admin panel status gate
//!
//! Each mount of the admin shell performs exactly one status check and maps
//! the outcome onto three states (`Loading`, `Activated`, `Deactivated`) plus
//! an orthogonal error. Any failure of the check fails open: the state is
//! forced to `Activated` and the error is recorded, so a broken status service
//! never locks administrators out. The error card still replaces the routes
//! until the page is reloaded.

pub mod pages;
pub mod probe;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};

pub use probe::{CheckPayload, HttpStatusProbe, ProbeError, StatusProbe, StoreProbe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    Loading,
    Activated,
    Deactivated,
}

/// Outcome of one mount's status check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateState {
    pub status: GateStatus,
    pub maintenance_message: String,
    pub error: Option<String>,
}

impl Default for GateState {
    fn default() -> Self {
        Self::loading()
    }
}

impl GateState {
    pub fn loading() -> Self {
        Self {
            status: GateStatus::Loading,
            maintenance_message: String::new(),
            error: None,
        }
    }

    /// Map a probe outcome onto the gate. Everything except a well-formed
    /// `success: true` payload fails open.
    pub fn from_outcome(outcome: Result<CheckPayload, ProbeError>) -> Self {
        let interpreted = outcome
            .map_err(|e| e.to_string())
            .and_then(CheckPayload::interpret);

        match interpreted {
            Ok((status, maintenance_message)) => Self {
                status,
                maintenance_message,
                error: None,
            },
            Err(error) => Self::fail_open(error),
        }
    }

    fn fail_open(error: String) -> Self {
        tracing::warn!(error = %error, "Admin status check failed, failing open");
        Self {
            status: GateStatus::Activated,
            maintenance_message: String::new(),
            error: Some(error),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.status != GateStatus::Loading
    }

    /// What a request for `path` renders under this state
    pub fn view<'a>(&'a self, path: &'a str) -> GateView<'a> {
        if self.status == GateStatus::Loading {
            return GateView::Loading;
        }

        if let Some(message) = &self.error {
            return GateView::ErrorCard {
                message: message.as_str(),
            };
        }

        match self.status {
            // Catch-all: no admin route survives deactivation
            GateStatus::Deactivated => GateView::Shutdown {
                message: self.maintenance_message.as_str(),
            },
            _ => GateView::Route { path },
        }
    }
}

/// Terminal rendering of the gate for one path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateView<'a> {
    Loading,
    ErrorCard { message: &'a str },
    Shutdown { message: &'a str },
    Route { path: &'a str },
}

/// One mounted gate: a single spawned status check publishing into a watch
/// channel. Dropping the handle cancels the check and discards its result.
pub struct GateHandle {
    rx: watch::Receiver<GateState>,
    _unmount: DropGuard,
}

impl GateHandle {
    pub fn mount(probe: Arc<dyn StatusProbe>) -> Self {
        let (tx, rx) = watch::channel(GateState::loading());
        let token = CancellationToken::new();
        let cancelled = token.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    tracing::debug!("Gate unmounted before status check resolved");
                }
                outcome = probe.check() => {
                    // Receiver may already be gone; nothing to deliver then
                    let _ = tx.send(GateState::from_outcome(outcome));
                }
            }
        });

        Self {
            rx,
            _unmount: token.drop_guard(),
        }
    }

    /// Current state without waiting
    pub fn state(&self) -> GateState {
        self.rx.borrow().clone()
    }

    /// Wait up to `budget` for the check to resolve. A check that has not
    /// resolved by then leaves the state at `Loading`.
    pub async fn settled(&mut self, budget: Duration) -> GateState {
        let wait = self.rx.wait_for(GateState::is_settled);
        let resolved = match tokio::time::timeout(budget, wait).await {
            Ok(Ok(state)) => Some(state.clone()),
            _ => None,
        };

        resolved.unwrap_or_else(|| self.state())
    }
}
