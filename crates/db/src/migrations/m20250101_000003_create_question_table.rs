//! Create question table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Question::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Question::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Question::AssemblyId).string_len(32).not_null())
                    .col(ColumnDef::new(Question::Text).text().not_null())
                    .col(ColumnDef::new(Question::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(Question::OrderNumber).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_assembly_id")
                            .from(Question::Table, Question::AssemblyId)
                            .to(Assembly::Table, Assembly::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: assembly_id + active (the "current question" lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_question_assembly_id_active")
                    .table(Question::Table)
                    .col(Question::AssemblyId)
                    .col(Question::Active)
                    .to_owned(),
            )
            .await?;

        // Index: order_number
        manager
            .create_index(
                Index::create()
                    .name("idx_question_order_number")
                    .table(Question::Table)
                    .col(Question::OrderNumber)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Question::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Question {
    Table,
    Id,
    AssemblyId,
    Text,
    Active,
    OrderNumber,
}

#[derive(Iden)]
enum Assembly {
    Table,
    Id,
}
