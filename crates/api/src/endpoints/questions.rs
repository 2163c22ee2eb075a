//! Question endpoints.

use asamblea_common::AppResult;
use asamblea_db::entities::question;
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{response::ApiResponse, sse::SseEvent, state::AppState};

/// Question response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    /// Question ID.
    pub id: String,
    /// Owning assembly ID.
    pub assembly_id: String,
    /// Question text.
    pub text: String,
    /// Whether the question is open for voting.
    pub active: bool,
    /// Presentation order (1-based).
    pub order_number: i32,
}

impl From<question::Model> for QuestionResponse {
    fn from(model: question::Model) -> Self {
        Self {
            id: model.id,
            assembly_id: model.assembly_id,
            text: model.text,
            active: model.active,
            order_number: model.order_number,
        }
    }
}

/// Add question request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddQuestionRequest {
    /// Assembly to add the question to.
    pub assembly_id: String,
    /// Question text.
    pub text: String,
}

/// Add a question and open it for voting.
async fn add_question(
    State(state): State<AppState>,
    Json(req): Json<AddQuestionRequest>,
) -> AppResult<ApiResponse<QuestionResponse>> {
    let created = state
        .question_service
        .add_question(&req.assembly_id, &req.text)
        .await?;

    state.sse_broadcaster.broadcast_question(SseEvent::QuestionOpened {
        id: created.id.clone(),
        assembly_id: created.assembly_id.clone(),
        text: created.text.clone(),
        order_number: created.order_number,
    });

    Ok(ApiResponse::ok(created.into()))
}

/// End current question request. The body is optional; without it the
/// active assembly is assumed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndCurrentRequest {
    /// Assembly whose open question should close.
    #[serde(default)]
    pub assembly_id: Option<String>,
}

/// Close the currently open question.
async fn end_current_question(
    State(state): State<AppState>,
    body: Option<Json<EndCurrentRequest>>,
) -> AppResult<ApiResponse<QuestionResponse>> {
    let assembly_id = body.and_then(|Json(req)| req.assembly_id);
    let closed = state
        .question_service
        .end_current_question(assembly_id.as_deref())
        .await?;

    state.sse_broadcaster.broadcast_question(SseEvent::QuestionClosed {
        id: closed.id.clone(),
    });

    Ok(ApiResponse::ok(closed.into()))
}

/// List questions query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuestionsQuery {
    /// Assembly to list questions for.
    pub assembly_id: String,
}

/// List an assembly's questions in order.
async fn list_questions(
    State(state): State<AppState>,
    Query(query): Query<ListQuestionsQuery>,
) -> AppResult<ApiResponse<Vec<QuestionResponse>>> {
    let questions = state.question_service.list(&query.assembly_id).await?;
    Ok(ApiResponse::ok(
        questions.into_iter().map(Into::into).collect(),
    ))
}

/// Get the question currently open for voting, if any.
async fn current_question(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Option<QuestionResponse>>> {
    let current = state.question_service.current_question().await?;
    Ok(ApiResponse::ok(current.map(Into::into)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_question).get(list_questions))
        .route("/end-current", post(end_current_question))
        .route("/current", get(current_question))
}
