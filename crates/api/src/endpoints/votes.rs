//! Vote tally endpoints.

use asamblea_common::AppResult;
use asamblea_core::Tally;
use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::{response::ApiResponse, state::AppState};

/// Tally query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyQuery {
    /// Question to tally.
    pub question_id: String,
}

/// Tally response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyResponse {
    /// The tallied question's ID.
    pub question_id: String,
    /// The question text, for display alongside the totals.
    pub text: String,
    /// Weighted totals.
    pub tally: Tally,
}

/// Get the current weighted tally for a question.
async fn tally(
    State(state): State<AppState>,
    Query(query): Query<TallyQuery>,
) -> AppResult<ApiResponse<TallyResponse>> {
    let (question, tally) = state
        .report_service
        .tally_for_question(&query.question_id)
        .await?;

    Ok(ApiResponse::ok(TallyResponse {
        question_id: question.id,
        text: question.text,
        tally,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/tally", get(tally))
}
