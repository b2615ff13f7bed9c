use std::env;

#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Bound of the in-memory audit queue; records beyond it are dropped
    pub queue_capacity: usize,
}

impl AuditConfig {
    pub fn from_env() -> Self {
        Self {
            queue_capacity: env::var("HABESHA_AUDIT_QUEUE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|capacity: &usize| *capacity > 0)
                .unwrap_or(1024),
        }
    }
}
