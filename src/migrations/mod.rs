pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_service_status;
mod m20250301_000003_create_audit_logs;
mod m20250301_000004_seed_service_status;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_service_status::Migration),
            Box::new(m20250301_000003_create_audit_logs::Migration),
            Box::new(m20250301_000004_seed_service_status::Migration),
        ]
    }
}
