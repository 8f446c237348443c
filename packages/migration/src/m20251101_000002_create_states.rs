use sea_orm_migration::prelude::*;

use crate::schema::{Countries, Main, States};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table((Main::Schema, States::Table))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(States::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(States::CountryId).integer().not_null())
                    .col(ColumnDef::new(States::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(States::Code)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_states_country_id")
                            .from((Main::Schema, States::Table), States::CountryId)
                            .to((Main::Schema, Countries::Table), Countries::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table((Main::Schema, States::Table))
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}
