//! Voting code entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Single-use voting code model.
///
/// A code is an attendee's credential for one assembly. It carries a vote
/// weight (`votes_count`) and is consumed exactly once: the `used` flag only
/// ever transitions from `false` to `true`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "code")]
pub struct Model {
    /// Unique code row ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Assembly this code belongs to.
    #[sea_orm(indexed)]
    pub assembly_id: String,

    /// The human-entered code string (`COVnnn-XXXX`), unique system-wide.
    #[sea_orm(unique)]
    pub code: String,

    /// Whether the code has been spent on a vote.
    pub used: bool,

    /// Vote weight carried by this code.
    pub votes_count: i32,
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
}

impl Related<super::assembly::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assembly.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
