//! Ballot endpoints: code validation and vote casting.

use asamblea_common::AppResult;
use asamblea_db::entities::vote::VoteOption;
use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use crate::{response::ApiResponse, sse::SseEvent, state::AppState};

/// Validate codes request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    /// Entered codes; blank entries are ignored.
    pub codes: Vec<String>,
}

/// Validate codes response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    /// The code strings that resolved, in entry order.
    pub codes: Vec<String>,
    /// Combined vote weight of the entered codes.
    pub weight: i32,
}

/// Validate a set of codes without spending them.
async fn validate(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> AppResult<ApiResponse<ValidateResponse>> {
    let ballot = state.ballot_service.validate_codes(&req.codes).await?;

    Ok(ApiResponse::ok(ValidateResponse {
        codes: ballot.codes.into_iter().map(|c| c.code).collect(),
        weight: ballot.weight,
    }))
}

/// Cast vote request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastRequest {
    /// Codes to spend on this ballot.
    pub codes: Vec<String>,
    /// Chosen option.
    pub option: VoteOption,
}

/// Cast vote response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastResponse {
    /// Question the votes were recorded on.
    pub question_id: String,
    /// Number of votes recorded (one per code).
    pub votes_recorded: usize,
    /// Combined weight of the recorded votes.
    pub weight: i32,
}

/// Cast a vote on the currently open question.
async fn cast(
    State(state): State<AppState>,
    Json(req): Json<CastRequest>,
) -> AppResult<ApiResponse<CastResponse>> {
    let result = state.ballot_service.cast_vote(&req.codes, req.option).await?;

    let (_, tally) = state
        .report_service
        .tally_for_question(&result.question.id)
        .await?;
    state.sse_broadcaster.broadcast_vote(SseEvent::VoteCast {
        question_id: result.question.id.clone(),
        tally,
    });

    Ok(ApiResponse::ok(CastResponse {
        question_id: result.question.id.clone(),
        votes_recorded: result.votes.len(),
        weight: result.total_weight(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/validate", post(validate))
        .route("/", post(cast))
}
