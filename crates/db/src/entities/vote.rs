//! Vote entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The three-value option enumeration votes are cast with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum VoteOption {
    /// In favor.
    #[sea_orm(string_value = "A favor")]
    #[serde(rename = "A favor")]
    AFavor,

    /// Against.
    #[sea_orm(string_value = "En contra")]
    #[serde(rename = "En contra")]
    EnContra,

    /// Abstain.
    #[sea_orm(string_value = "Abstenerse")]
    #[serde(rename = "Abstenerse")]
    Abstenerse,
}

/// Vote model. Append-only: votes are never mutated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vote")]
pub struct Model {
    /// Unique vote ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Question this vote was cast on.
    #[sea_orm(indexed)]
    pub question_id: String,

    /// The code spent on this vote.
    #[sea_orm(indexed)]
    pub code_id: String,

    /// Chosen option.
    pub option: VoteOption,

    /// Weight copied from the code's `votes_count` at cast time, so later
    /// changes to a code never retroactively alter historical tallies.
    pub weight: i32,

    /// When the vote was recorded.
    pub created_at: DateTimeWithTimeZone,
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::QuestionId",
        to = "super::question::Column::Id",
        on_delete = "Cascade"
    )]
    Question,

    #[sea_orm(
        belongs_to = "super::code::Entity",
        from = "Column::CodeId",
        to = "super::code::Column::Id",
        on_delete = "Cascade"
    )]
    Code,
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl Related<super::code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Code.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
