use sea_orm_migration::prelude::*;

use crate::schema::{Cities, Main, States};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table((Main::Schema, Cities::Table))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cities::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cities::StateId).integer().not_null())
                    .col(ColumnDef::new(Cities::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Cities::Code).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Cities::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cities_state_id")
                            .from((Main::Schema, Cities::Table), Cities::StateId)
                            .to((Main::Schema, States::Table), States::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Code is unique among active cities only.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS cities_code_active_unique \
                 ON main.cities (code) WHERE is_active = true",
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cities_state_id")
                    .table((Main::Schema, Cities::Table))
                    .col(Cities::StateId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cities_is_active")
                    .table((Main::Schema, Cities::Table))
                    .col(Cities::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table((Main::Schema, Cities::Table))
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}
