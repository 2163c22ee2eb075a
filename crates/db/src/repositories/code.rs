//! Voting code repository.

use std::sync::Arc;

use asamblea_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::entities::{code, Code};

/// Repository for voting code operations.
#[derive(Clone)]
pub struct CodeRepository {
    db: Arc<DatabaseConnection>,
}

impl CodeRepository {
    /// Create a new code repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an unused code by its exact code string.
    ///
    /// Already-used codes are filtered out here, so a hit means the code is
    /// still spendable at lookup time.
    pub async fn find_unused_by_code(&self, code_str: &str) -> AppResult<Option<code::Model>> {
        Code::find()
            .filter(code::Column::Code.eq(code_str))
            .filter(code::Column::Used.eq(false))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all codes issued for an assembly.
    pub async fn find_by_assembly(&self, assembly_id: &str) -> AppResult<Vec<code::Model>> {
        Code::find()
            .filter(code::Column::AssemblyId.eq(assembly_id))
            .order_by_asc(code::Column::Code)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count codes issued for an assembly.
    pub async fn count_by_assembly(&self, assembly_id: &str) -> AppResult<u64> {
        Code::find()
            .filter(code::Column::AssemblyId.eq(assembly_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Bulk-insert a batch of codes.
    pub async fn insert_many(&self, models: Vec<code::ActiveModel>) -> AppResult<()> {
        Code::insert_many(models)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Atomically claim a code: flip `used` to true only if it is still
    /// false.
    ///
    /// Returns true if this call consumed the code. Two concurrent casts
    /// racing for the same code serialize at the store; exactly one claim
    /// succeeds and the loser sees false.
    pub async fn claim(&self, id: &str) -> AppResult<bool> {
        let result = Code::update_many()
            .col_expr(code::Column::Used, Expr::value(true))
            .filter(code::Column::Id.eq(id))
            .filter(code::Column::Used.eq(false))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected == 1)
    }
}
