//! Create code table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Code::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Code::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Code::AssemblyId).string_len(32).not_null())
                    .col(ColumnDef::new(Code::Code).string_len(32).not_null())
                    .col(ColumnDef::new(Code::Used).boolean().not_null().default(false))
                    .col(ColumnDef::new(Code::VotesCount).integer().not_null().default(1))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_code_assembly_id")
                            .from(Code::Table, Code::AssemblyId)
                            .to(Assembly::Table, Assembly::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: the human-entered code string
        manager
            .create_index(
                Index::create()
                    .name("idx_code_code")
                    .table(Code::Table)
                    .col(Code::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: assembly_id
        manager
            .create_index(
                Index::create()
                    .name("idx_code_assembly_id")
                    .table(Code::Table)
                    .col(Code::AssemblyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Code::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Code {
    Table,
    Id,
    AssemblyId,
    Code,
    Used,
    VotesCount,
}

#[derive(Iden)]
enum Assembly {
    Table,
    Id,
}
