//! Assembly lifecycle service.

use asamblea_common::{AppError, AppResult, IdGenerator};
use asamblea_db::{
    entities::{assembly, code},
    repositories::{AssemblyRepository, CodeRepository, QuestionRepository},
};
use chrono::Utc;
use sea_orm::Set;
use tracing::info;

/// Number of single-use codes issued when an assembly starts.
pub const CODES_PER_ASSEMBLY: u32 = 78;

/// Service for the assembly lifecycle: start, end, code issuance.
#[derive(Clone)]
pub struct AssemblyService {
    assembly_repo: AssemblyRepository,
    code_repo: CodeRepository,
    question_repo: QuestionRepository,
    id_gen: IdGenerator,
}

impl AssemblyService {
    /// Create a new assembly service.
    #[must_use]
    pub const fn new(
        assembly_repo: AssemblyRepository,
        code_repo: CodeRepository,
        question_repo: QuestionRepository,
    ) -> Self {
        Self {
            assembly_repo,
            code_repo,
            question_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Find the currently active assembly, if any.
    pub async fn active_assembly(&self) -> AppResult<Option<assembly::Model>> {
        self.assembly_repo.find_active().await
    }

    /// Get an assembly by ID.
    pub async fn get(&self, id: &str) -> AppResult<assembly::Model> {
        self.assembly_repo.get_by_id(id).await
    }

    /// List the codes issued for an assembly.
    pub async fn codes(&self, assembly_id: &str) -> AppResult<Vec<code::Model>> {
        self.code_repo.find_by_assembly(assembly_id).await
    }

    /// Start a new assembly and issue its batch of single-use codes.
    ///
    /// Refuses to start while another assembly is active. The code batch is
    /// generated synchronously: exactly [`CODES_PER_ASSEMBLY`] codes with
    /// unique strings and a vote weight of 1 each.
    pub async fn start_assembly(
        &self,
        name: Option<String>,
    ) -> AppResult<(assembly::Model, Vec<code::Model>)> {
        if let Some(active) = self.assembly_repo.find_active().await? {
            return Err(AppError::Conflict(format!(
                "Assembly '{}' is already active; end it before starting a new one",
                active.name
            )));
        }

        let now = Utc::now();
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("Asamblea {}", now.format("%Y-%m-%d")));

        let assembly = self
            .assembly_repo
            .create(assembly::ActiveModel {
                id: Set(self.id_gen.generate()),
                name: Set(name),
                active: Set(true),
                started_at: Set(now),
                ended_at: Set(None),
            })
            .await?;

        let batch: Vec<code::ActiveModel> = (1..=CODES_PER_ASSEMBLY)
            .map(|ordinal| code::ActiveModel {
                id: Set(self.id_gen.generate()),
                assembly_id: Set(assembly.id.clone()),
                code: Set(self.id_gen.generate_voting_code(ordinal)),
                used: Set(false),
                votes_count: Set(1),
            })
            .collect();

        self.code_repo.insert_many(batch).await?;

        let codes = self.code_repo.find_by_assembly(&assembly.id).await?;
        info!(
            assembly_id = %assembly.id,
            codes = codes.len(),
            "Assembly started"
        );

        Ok((assembly, codes))
    }

    /// End an assembly: clear its active flag, stamp the end time and
    /// force-deactivate all of its questions.
    pub async fn end_assembly(&self, id: &str) -> AppResult<assembly::Model> {
        let current = self.assembly_repo.get_by_id(id).await?;
        if !current.active {
            return Err(AppError::Conflict(format!(
                "Assembly '{}' has already ended",
                current.name
            )));
        }

        let mut active_model: assembly::ActiveModel = current.into();
        active_model.active = Set(false);
        active_model.ended_at = Set(Some(Utc::now()));

        let ended = self.assembly_repo.update(active_model).await?;
        self.question_repo.deactivate_all(&ended.id).await?;

        info!(assembly_id = %ended.id, "Assembly ended");
        Ok(ended)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn mock_assembly(id: &str, name: &str, active: bool) -> assembly::Model {
        assembly::Model {
            id: id.to_string(),
            name: name.to_string(),
            active,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    fn mock_code(id: &str, assembly_id: &str, code: &str) -> code::Model {
        code::Model {
            id: id.to_string(),
            assembly_id: assembly_id.to_string(),
            code: code.to_string(),
            used: false,
            votes_count: 1,
        }
    }

    fn service(
        assembly_db: sea_orm::DatabaseConnection,
        code_db: sea_orm::DatabaseConnection,
        question_db: sea_orm::DatabaseConnection,
    ) -> AssemblyService {
        AssemblyService::new(
            AssemblyRepository::new(Arc::new(assembly_db)),
            CodeRepository::new(Arc::new(code_db)),
            QuestionRepository::new(Arc::new(question_db)),
        )
    }

    #[tokio::test]
    async fn test_start_assembly_refuses_when_one_is_active() {
        let assembly_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_assembly("asm1", "Asamblea vieja", true)]])
            .into_connection();
        let code_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let question_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(assembly_db, code_db, question_db)
            .start_assembly(None)
            .await;

        match result {
            Err(AppError::Conflict(msg)) => assert!(msg.contains("Asamblea vieja")),
            other => panic!("Expected Conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_start_assembly_issues_code_batch() {
        let created = mock_assembly("asm1", "Asamblea nueva", true);
        let issued: Vec<code::Model> = (1..=CODES_PER_ASSEMBLY)
            .map(|i| mock_code(&format!("c{i}"), "asm1", &format!("COV{i:03}-ABCD")))
            .collect();

        let assembly_db = MockDatabase::new(DatabaseBackend::Postgres)
            // no active assembly, then the insert returning the new row
            .append_query_results([Vec::<assembly::Model>::new(), vec![created.clone()]])
            .into_connection();
        let code_db = MockDatabase::new(DatabaseBackend::Postgres)
            // the batch insert, then the listing query
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: u64::from(CODES_PER_ASSEMBLY),
            }])
            .append_query_results([issued.clone()])
            .into_connection();
        let question_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let (assembly, codes) = service(assembly_db, code_db, question_db)
            .start_assembly(Some("Asamblea nueva".to_string()))
            .await
            .unwrap();

        assert_eq!(assembly.id, "asm1");
        assert_eq!(codes.len(), CODES_PER_ASSEMBLY as usize);
        assert!(codes.iter().all(|c| c.votes_count == 1 && !c.used));
    }

    #[tokio::test]
    async fn test_end_assembly_rejects_already_ended() {
        let assembly_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_assembly("asm1", "Asamblea", false)]])
            .into_connection();
        let code_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let question_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service(assembly_db, code_db, question_db)
            .end_assembly("asm1")
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_end_assembly_deactivates_questions() {
        let running = mock_assembly("asm1", "Asamblea", true);
        let mut ended = running.clone();
        ended.active = false;
        ended.ended_at = Some(Utc::now());

        let assembly_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![running], vec![ended]])
            .into_connection();
        let code_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let question_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 3,
            }])
            .into_connection();

        let result = service(assembly_db, code_db, question_db)
            .end_assembly("asm1")
            .await
            .unwrap();

        assert!(!result.active);
        assert!(result.ended_at.is_some());
    }

    #[test]
    fn test_code_batch_size_is_fixed() {
        assert_eq!(CODES_PER_ASSEMBLY, 78);
    }

    #[test]
    fn test_generated_codes_are_unique() {
        let id_gen = IdGenerator::new();
        let codes: std::collections::HashSet<String> = (1..=CODES_PER_ASSEMBLY)
            .map(|i| id_gen.generate_voting_code(i))
            .collect();
        // Ordinal prefix alone guarantees uniqueness within a batch
        assert_eq!(codes.len(), CODES_PER_ASSEMBLY as usize);
    }
}
