//! Create assembly table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Assembly::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Assembly::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Assembly::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Assembly::Active).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Assembly::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Assembly::EndedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: active (the "find the active assembly" lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_assembly_active")
                    .table(Assembly::Table)
                    .col(Assembly::Active)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Assembly::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Assembly {
    Table,
    Id,
    Name,
    Active,
    StartedAt,
    EndedAt,
}
