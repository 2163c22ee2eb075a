//! Question repository.

use std::sync::Arc;

use asamblea_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use crate::entities::{question, Question};

/// Repository for question operations.
#[derive(Clone)]
pub struct QuestionRepository {
    db: Arc<DatabaseConnection>,
}

impl QuestionRepository {
    /// Create a new question repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a question by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<question::Model>> {
        Question::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a question by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<question::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question not found: {id}")))
    }

    /// List an assembly's questions in presentation order.
    pub async fn find_by_assembly(&self, assembly_id: &str) -> AppResult<Vec<question::Model>> {
        Question::find()
            .filter(question::Column::AssemblyId.eq(assembly_id))
            .order_by_asc(question::Column::OrderNumber)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the active question of an assembly, if any.
    pub async fn find_active(&self, assembly_id: &str) -> AppResult<Option<question::Model>> {
        Question::find()
            .filter(question::Column::AssemblyId.eq(assembly_id))
            .filter(question::Column::Active.eq(true))
            .order_by_asc(question::Column::OrderNumber)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count an assembly's questions.
    pub async fn count_by_assembly(&self, assembly_id: &str) -> AppResult<u64> {
        Question::find()
            .filter(question::Column::AssemblyId.eq(assembly_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new question.
    pub async fn create(&self, model: question::ActiveModel) -> AppResult<question::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Deactivate all questions of an assembly ordered before the given one.
    pub async fn deactivate_prior(&self, assembly_id: &str, order_number: i32) -> AppResult<()> {
        Question::update_many()
            .col_expr(question::Column::Active, Expr::value(false))
            .filter(question::Column::AssemblyId.eq(assembly_id))
            .filter(question::Column::OrderNumber.lt(order_number))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Deactivate a single question.
    pub async fn deactivate(&self, id: &str) -> AppResult<()> {
        Question::update_many()
            .col_expr(question::Column::Active, Expr::value(false))
            .filter(question::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Deactivate every question of an assembly (assembly close).
    pub async fn deactivate_all(&self, assembly_id: &str) -> AppResult<()> {
        Question::update_many()
            .col_expr(question::Column::Active, Expr::value(false))
            .filter(question::Column::AssemblyId.eq(assembly_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
