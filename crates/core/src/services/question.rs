//! Question sequencing service.

use asamblea_common::{AppError, AppResult, IdGenerator};
use asamblea_db::{
    entities::question,
    repositories::{AssemblyRepository, QuestionRepository},
};
use sea_orm::Set;
use tracing::info;

/// Service for the question lifecycle within an assembly.
///
/// Questions form a strict sequence: adding a new one deactivates every
/// prior question, so at most one is open for voting at a time.
#[derive(Clone)]
pub struct QuestionService {
    question_repo: QuestionRepository,
    assembly_repo: AssemblyRepository,
    id_gen: IdGenerator,
}

impl QuestionService {
    /// Create a new question service.
    #[must_use]
    pub const fn new(question_repo: QuestionRepository, assembly_repo: AssemblyRepository) -> Self {
        Self {
            question_repo,
            assembly_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a question to an assembly and open it for voting.
    ///
    /// The new question takes the next order number; all earlier questions
    /// of the assembly are deactivated first so voting moves forward.
    pub async fn add_question(
        &self,
        assembly_id: &str,
        text: &str,
    ) -> AppResult<question::Model> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation(
                "Question text must not be empty".to_string(),
            ));
        }

        let assembly = self.assembly_repo.get_by_id(assembly_id).await?;
        if !assembly.active {
            return Err(AppError::Conflict(format!(
                "Assembly '{}' has ended; no further questions can be added",
                assembly.name
            )));
        }

        let count = self.question_repo.count_by_assembly(assembly_id).await?;
        let order_number = i32::try_from(count)
            .map_err(|_| AppError::Internal("Question count overflow".to_string()))?
            + 1;

        self.question_repo
            .deactivate_prior(assembly_id, order_number)
            .await?;

        let created = self
            .question_repo
            .create(question::ActiveModel {
                id: Set(self.id_gen.generate()),
                assembly_id: Set(assembly_id.to_string()),
                text: Set(text.to_string()),
                active: Set(true),
                order_number: Set(order_number),
            })
            .await?;

        info!(
            question_id = %created.id,
            assembly_id,
            order_number,
            "Question opened"
        );
        Ok(created)
    }

    /// Close the currently active question.
    ///
    /// Looks in the given assembly, or in the active one when no assembly
    /// is named.
    pub async fn end_current_question(
        &self,
        assembly_id: Option<&str>,
    ) -> AppResult<question::Model> {
        let assembly = match assembly_id {
            Some(id) => self.assembly_repo.get_by_id(id).await?,
            None => self
                .assembly_repo
                .find_active()
                .await?
                .ok_or_else(|| AppError::NotFound("No active assembly".to_string()))?,
        };

        let current = self
            .question_repo
            .find_active(&assembly.id)
            .await?
            .ok_or_else(|| AppError::NotFound("No active question".to_string()))?;

        self.question_repo.deactivate(&current.id).await?;
        info!(question_id = %current.id, "Question closed");

        Ok(question::Model {
            active: false,
            ..current
        })
    }

    /// Find the question currently open for voting, if any.
    pub async fn current_question(&self) -> AppResult<Option<question::Model>> {
        let Some(assembly) = self.assembly_repo.find_active().await? else {
            return Ok(None);
        };
        self.question_repo.find_active(&assembly.id).await
    }

    /// List an assembly's questions in presentation order.
    pub async fn list(&self, assembly_id: &str) -> AppResult<Vec<question::Model>> {
        self.question_repo.find_by_assembly(assembly_id).await
    }

    /// Get a question by ID.
    pub async fn get(&self, id: &str) -> AppResult<question::Model> {
        self.question_repo.get_by_id(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use asamblea_db::entities::assembly;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn mock_assembly(id: &str, active: bool) -> assembly::Model {
        assembly::Model {
            id: id.to_string(),
            name: "Asamblea".to_string(),
            active,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    fn mock_question(id: &str, assembly_id: &str, order: i32, active: bool) -> question::Model {
        question::Model {
            id: id.to_string(),
            assembly_id: assembly_id.to_string(),
            text: format!("Pregunta {order}"),
            active,
            order_number: order,
        }
    }

    fn service(
        question_db: sea_orm::DatabaseConnection,
        assembly_db: sea_orm::DatabaseConnection,
    ) -> QuestionService {
        QuestionService::new(
            QuestionRepository::new(Arc::new(question_db)),
            AssemblyRepository::new(Arc::new(assembly_db)),
        )
    }

    #[tokio::test]
    async fn test_add_question_rejects_blank_text() {
        let question_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let assembly_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(question_db, assembly_db)
            .add_question("asm1", "   ")
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_question_rejects_ended_assembly() {
        let question_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let assembly_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_assembly("asm1", false)]])
            .into_connection();

        let result = service(question_db, assembly_db)
            .add_question("asm1", "¿Se aprueba el presupuesto?")
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_add_question_takes_next_order_and_deactivates_prior() {
        let created = mock_question("q3", "asm1", 3, true);

        let question_db = MockDatabase::new(DatabaseBackend::Postgres)
            // count, then insert returning the new row
            .append_query_results([
                [count_row(2)],
            ])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .append_query_results([[created.clone()]])
            .into_connection();
        let assembly_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_assembly("asm1", true)]])
            .into_connection();

        let result = service(question_db, assembly_db)
            .add_question("asm1", " ¿Se aprueba el presupuesto? ")
            .await
            .unwrap();

        assert_eq!(result.order_number, 3);
        assert!(result.active);
    }

    // Count queries come back as a single row with a num_items column.
    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        let mut row = std::collections::BTreeMap::new();
        row.insert("num_items", sea_orm::Value::BigInt(Some(n)));
        row
    }

    #[tokio::test]
    async fn test_end_current_question_requires_active_assembly() {
        let question_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let assembly_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<assembly::Model>::new()])
            .into_connection();

        let result = service(question_db, assembly_db).end_current_question(None).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_end_current_question_requires_open_question() {
        let question_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<question::Model>::new()])
            .into_connection();
        let assembly_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_assembly("asm1", true)]])
            .into_connection();

        let result = service(question_db, assembly_db).end_current_question(None).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_end_current_question_closes_it() {
        let question_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_question("q1", "asm1", 1, true)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let assembly_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_assembly("asm1", true)]])
            .into_connection();

        let closed = service(question_db, assembly_db)
            .end_current_question(None)
            .await
            .unwrap();

        assert_eq!(closed.id, "q1");
        assert!(!closed.active);
    }

    #[tokio::test]
    async fn test_current_question_is_none_without_assembly() {
        let question_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let assembly_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<assembly::Model>::new()])
            .into_connection();

        let current = service(question_db, assembly_db)
            .current_question()
            .await
            .unwrap();

        assert!(current.is_none());
    }
}
