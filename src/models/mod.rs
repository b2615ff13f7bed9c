pub mod audit_log;
pub mod service_status;
pub mod user;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::audit_log::{self, Entity as AuditLog};
    pub use super::service_status::{self, Entity as ServiceStatus};
    pub use super::user::{self, Entity as User};
}
