//! Migration: Create service_status table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceStatus::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceStatus::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ServiceStatus::ServiceName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ServiceStatus::Status)
                            .string_len(16)
                            .not_null()
                            .default("activated"),
                    )
                    .col(
                        ColumnDef::new(ServiceStatus::MaintenanceMessage)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(ServiceStatus::UpdatedBy).string().null())
                    .col(
                        ColumnDef::new(ServiceStatus::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ServiceStatus::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "service_status"]
enum ServiceStatus {
    Table,
    Id,
    #[iden = "service_name"]
    ServiceName,
    Status,
    #[iden = "maintenance_message"]
    MaintenanceMessage,
    #[iden = "updated_by"]
    UpdatedBy,
    #[iden = "updated_at"]
    UpdatedAt,
}
