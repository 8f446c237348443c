use sea_orm_migration::prelude::*;

use crate::schema::{EventLogs, Main};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table((Main::Schema, EventLogs::Table))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventLogs::EventType).string_len(50).not_null())
                    .col(ColumnDef::new(EventLogs::EntityType).string_len(50).not_null())
                    .col(ColumnDef::new(EventLogs::EntityId).integer().not_null())
                    .col(ColumnDef::new(EventLogs::RequestMethod).string_len(10).not_null())
                    .col(ColumnDef::new(EventLogs::RequestPath).string_len(500).not_null())
                    .col(ColumnDef::new(EventLogs::RequestBody).text().null())
                    .col(ColumnDef::new(EventLogs::UserId).string_len(100).null())
                    .col(ColumnDef::new(EventLogs::IpAddress).string_len(45).null())
                    .col(
                        ColumnDef::new(EventLogs::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(EventLogs::StatusCode).integer().null())
                    .col(
                        ColumnDef::new(EventLogs::ProcessingStatus)
                            .string_len(20)
                            .not_null()
                            .default("completed"),
                    )
                    .col(ColumnDef::new(EventLogs::ProcessedAt).timestamp().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table((Main::Schema, EventLogs::Table))
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}
