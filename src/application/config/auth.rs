use std::env;

/// Key used when no secret is configured. The server refuses to boot with it.
const UNSET_JWT_SECRET: &str = "habesha-admin-unset-secret";

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify admin bearer tokens
    pub jwt_secret: Option<String>,
    pub jwt_issuer: String,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self::from_values(
            env::var("HABESHA_JWT_SECRET").ok(),
            env::var("HABESHA_JWT_ISSUER").ok(),
        )
    }

    fn from_values(jwt_secret: Option<String>, jwt_issuer: Option<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.filter(|s| !s.trim().is_empty()),
            jwt_issuer: jwt_issuer.unwrap_or_else(|| "habesha-admin".to_string()),
        }
    }

    /// Secret handed to the token codec
    pub fn signing_secret(&self) -> &str {
        self.jwt_secret.as_deref().unwrap_or(UNSET_JWT_SECRET)
    }

    /// Fail startup unless the signing secret was injected
    pub fn ensure_secret(&self) -> anyhow::Result<()> {
        if self.jwt_secret.is_none() {
            anyhow::bail!("HABESHA_JWT_SECRET must be set to a non-empty value");
        }
        Ok(())
    }
}
