//! Question entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Question model: one up/down/abstain item put to a vote.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "question")]
pub struct Model {
    /// Unique question ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Assembly this question belongs to.
    #[sea_orm(indexed)]
    pub assembly_id: String,

    /// The question text as presented to voters.
    #[sea_orm(column_type = "Text")]
    pub text: String,

    /// Whether this question is currently open for voting.
    ///
    /// At most one question per assembly is active; adding a new question
    /// deactivates all prior ones.
    pub active: bool,

    /// Presentation and tie-break order within the assembly (1-based).
    pub order_number: i32,
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assembly::Entity",
        from = "Column::AssemblyId",
        to = "super::assembly::Column::Id",
        on_delete = "Cascade"
    )]
    Assembly,

    #[sea_orm(has_many = "super::vote::Entity")]
    Votes,
}

impl Related<super::assembly::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assembly.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
