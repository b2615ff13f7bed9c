pub mod audit;
pub mod security;
pub mod system_status;

pub use audit::{AuditLogger, AuditWorker, RequestContext};
pub use security::*;
