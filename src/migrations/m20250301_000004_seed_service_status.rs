use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::models::service_status::{self, KnownService, ServiceState};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let now = chrono::Utc::now();

        for service in KnownService::ALL {
            let exists = service_status::Entity::find()
                .filter(service_status::Column::ServiceName.eq(service.name()))
                .one(db)
                .await?
                .is_some();

            if exists {
                continue;
            }

            let row = service_status::ActiveModel {
                service_name: Set(service.name().to_string()),
                status: Set(ServiceState::Activated),
                maintenance_message: Set(String::new()),
                updated_by: Set(Some("system".to_string())),
                updated_at: Set(now),
                ..Default::default()
            };
            row.insert(db).await?;
        }

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // Seeding is not reversible - rows may have been modified
        Ok(())
    }
}
