//! Create vote table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vote::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vote::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Vote::QuestionId).string_len(32).not_null())
                    .col(ColumnDef::new(Vote::CodeId).string_len(32).not_null())
                    .col(ColumnDef::new(Vote::Option).string_len(16).not_null())
                    .col(ColumnDef::new(Vote::Weight).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(Vote::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_question_id")
                            .from(Vote::Table, Vote::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_code_id")
                            .from(Vote::Table, Vote::CodeId)
                            .to(Code::Table, Code::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: question_id (the tally lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_question_id")
                    .table(Vote::Table)
                    .col(Vote::QuestionId)
                    .to_owned(),
            )
            .await?;

        // Index: code_id
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_code_id")
                    .table(Vote::Table)
                    .col(Vote::CodeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vote::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Vote {
    Table,
    Id,
    QuestionId,
    CodeId,
    Option,
    Weight,
    CreatedAt,
}

#[derive(Iden)]
enum Question {
    Table,
    Id,
}

#[derive(Iden)]
enum Code {
    Table,
    Id,
}
