//! Assembly repository.

use std::sync::Arc;

use asamblea_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use crate::entities::{assembly, Assembly};

/// Repository for assembly operations.
#[derive(Clone)]
pub struct AssemblyRepository {
    db: Arc<DatabaseConnection>,
}

impl AssemblyRepository {
    /// Create a new assembly repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an assembly by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<assembly::Model>> {
        Assembly::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an assembly by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<assembly::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Assembly not found: {id}")))
    }

    /// Find the currently active assembly, if any.
    ///
    /// At most one assembly is active by convention; if that invariant is
    /// ever violated the most recently started one wins.
    pub async fn find_active(&self) -> AppResult<Option<assembly::Model>> {
        Assembly::find()
            .filter(assembly::Column::Active.eq(true))
            .order_by_desc(assembly::Column::StartedAt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new assembly.
    pub async fn create(&self, model: assembly::ActiveModel) -> AppResult<assembly::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an assembly.
    pub async fn update(&self, model: assembly::ActiveModel) -> AppResult<assembly::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
