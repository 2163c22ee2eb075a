//! Assembly entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Assembly model: one voting session with an ordered list of questions.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assembly")]
pub struct Model {
    /// Unique assembly ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Display name of the assembly.
    pub name: String,

    /// Whether this assembly is currently running.
    ///
    /// At most one assembly is active at a time; the lifecycle service
    /// refuses to start a new one while another is active.
    pub active: bool,

    /// When the assembly was started.
    pub started_at: DateTime<Utc>,

    /// When the assembly was ended (null while running).
    #[sea_orm(nullable)]
    pub ended_at: Option<DateTime<Utc>>,
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::code::Entity")]
    Codes,

    #[sea_orm(has_many = "super::question::Entity")]
    Questions,
}

impl Related<super::code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Codes.def()
    }
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
