use std::env;
use std::time::Duration;

/// Settings for the admin shell's status gate
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Remote check endpoint. When unset the shell probes the local status store.
    pub check_url: Option<String>,
    /// How long one mount waits for the probe before rendering the loading page
    pub timeout: Duration,
}

impl GateConfig {
    pub fn from_env() -> Self {
        Self {
            check_url: env::var("HABESHA_GATE_CHECK_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            timeout: Duration::from_secs(
                env::var("HABESHA_GATE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),
        }
    }
}
