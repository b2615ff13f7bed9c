use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins, parsed from `HABESHA_ALLOWED_ORIGINS` (comma-separated).
    /// When empty, any origin is allowed.
    pub allowed_origins: Vec<String>,
    /// Directory holding the built admin SPA (`index.html` and assets)
    pub static_files_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HABESHA_API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("HABESHA_API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            allowed_origins: parse_origins(
                &env::var("HABESHA_ALLOWED_ORIGINS").unwrap_or_default(),
            ),
            static_files_dir: PathBuf::from(
                env::var("HABESHA_STATIC_FILES_DIR").unwrap_or_else(|_| "/app/static".to_string()),
            ),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
