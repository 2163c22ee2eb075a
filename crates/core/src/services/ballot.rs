//! Ballot service: code validation and vote casting.

use asamblea_common::{AppError, AppResult, IdGenerator};
use asamblea_db::{
    entities::{code, question, vote, vote::VoteOption},
    repositories::{AssemblyRepository, CodeRepository, QuestionRepository, VoteRepository},
};
use chrono::Utc;
use sea_orm::Set;
use tracing::{info, warn};

/// Maximum number of codes a single ballot may spend at once.
pub const MAX_CODES_PER_BALLOT: usize = 2;

/// Outcome of a successful code validation: the resolved codes plus the
/// combined vote weight they carry.
#[derive(Debug, Clone)]
pub struct ValidatedBallot {
    /// Resolved, still-unused codes in the order they were entered.
    pub codes: Vec<code::Model>,
    /// Sum of the codes' vote weights.
    pub weight: i32,
}

/// Outcome of a cast: the question voted on and the recorded votes.
#[derive(Debug, Clone)]
pub struct CastResult {
    /// The question the votes were cast on.
    pub question: question::Model,
    /// One recorded vote per spent code, in entry order.
    pub votes: Vec<vote::Model>,
}

impl CastResult {
    /// Combined weight of the recorded votes.
    #[must_use]
    pub fn total_weight(&self) -> i32 {
        self.votes.iter().map(|v| v.weight).sum()
    }
}

/// Service for validating voting codes and casting votes with them.
#[derive(Clone)]
pub struct BallotService {
    code_repo: CodeRepository,
    vote_repo: VoteRepository,
    question_repo: QuestionRepository,
    assembly_repo: AssemblyRepository,
    id_gen: IdGenerator,
}

impl BallotService {
    /// Create a new ballot service.
    #[must_use]
    pub const fn new(
        code_repo: CodeRepository,
        vote_repo: VoteRepository,
        question_repo: QuestionRepository,
        assembly_repo: AssemblyRepository,
    ) -> Self {
        Self {
            code_repo,
            vote_repo,
            question_repo,
            assembly_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Validate a set of entered codes without spending them.
    ///
    /// Blank entries are skipped; the remaining codes must be non-empty,
    /// at most [`MAX_CODES_PER_BALLOT`], pairwise distinct and each resolve
    /// to an unused code. Validation is advisory only: codes stay spendable
    /// until [`Self::cast_vote`] claims them.
    pub async fn validate_codes(&self, entered: &[String]) -> AppResult<ValidatedBallot> {
        let trimmed: Vec<&str> = entered
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "Enter at least one voting code".to_string(),
            ));
        }
        if trimmed.len() > MAX_CODES_PER_BALLOT {
            return Err(AppError::Validation(format!(
                "At most {MAX_CODES_PER_BALLOT} codes may be used per ballot"
            )));
        }
        for (i, entry) in trimmed.iter().enumerate() {
            if trimmed[..i].contains(entry) {
                return Err(AppError::Validation(format!(
                    "Code '{entry}' was entered more than once"
                )));
            }
        }

        let mut codes = Vec::with_capacity(trimmed.len());
        for entry in trimmed {
            let found = self
                .code_repo
                .find_unused_by_code(entry)
                .await?
                .ok_or_else(|| {
                    AppError::Validation(format!("Code '{entry}' is invalid or already used"))
                })?;
            codes.push(found);
        }

        let weight = codes.iter().map(|c| c.votes_count).sum();
        Ok(ValidatedBallot { codes, weight })
    }

    /// Cast a vote on the currently open question, spending the given codes.
    ///
    /// Each code is claimed atomically before its vote is recorded, so a
    /// code can never back two votes even under concurrent submissions. A
    /// claim that loses the race aborts the cast with a conflict; votes
    /// already recorded for earlier codes in the same ballot stand.
    pub async fn cast_vote(&self, entered: &[String], option: VoteOption) -> AppResult<CastResult> {
        let ballot = self.validate_codes(entered).await?;

        let assembly = self
            .assembly_repo
            .find_active()
            .await?
            .ok_or_else(|| AppError::NotFound("No active assembly".to_string()))?;
        let question = self
            .question_repo
            .find_active(&assembly.id)
            .await?
            .ok_or_else(|| AppError::NotFound("No question is open for voting".to_string()))?;

        let mut votes = Vec::with_capacity(ballot.codes.len());
        for code in &ballot.codes {
            if !self.code_repo.claim(&code.id).await? {
                warn!(code = %code.code, question_id = %question.id, "Code claim lost a race");
                return Err(AppError::Conflict(format!(
                    "Code '{}' was spent by another submission; remove it and try again",
                    code.code
                )));
            }

            let recorded = self
                .vote_repo
                .create(vote::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    question_id: Set(question.id.clone()),
                    code_id: Set(code.id.clone()),
                    option: Set(option),
                    weight: Set(code.votes_count),
                    created_at: Set(Utc::now().into()),
                })
                .await?;
            votes.push(recorded);
        }

        info!(
            question_id = %question.id,
            codes = votes.len(),
            weight = votes.iter().map(|v| v.weight).sum::<i32>(),
            "Vote cast"
        );
        Ok(CastResult { question, votes })
    }
}
