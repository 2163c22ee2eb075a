//! Vote repository.

use std::sync::Arc;

use asamblea_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use crate::entities::{vote, Vote};

/// Repository for vote operations. Votes are append-only: there is no
/// update or delete path.
#[derive(Clone)]
pub struct VoteRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record a new vote.
    pub async fn create(&self, model: vote::ActiveModel) -> AppResult<vote::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all votes cast on a question.
    pub async fn find_by_question(&self, question_id: &str) -> AppResult<Vec<vote::Model>> {
        Vote::find()
            .filter(vote::Column::QuestionId.eq(question_id))
            .order_by_asc(vote::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count votes cast on a question.
    pub async fn count_by_question(&self, question_id: &str) -> AppResult<u64> {
        Vote::find()
            .filter(vote::Column::QuestionId.eq(question_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
