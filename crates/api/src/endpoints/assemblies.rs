//! Assembly endpoints.

use asamblea_common::AppResult;
use asamblea_db::entities::{assembly, code};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{response::ApiResponse, sse::SseEvent, state::AppState};

/// Assembly response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyResponse {
    /// Assembly ID.
    pub id: String,
    /// Assembly name.
    pub name: String,
    /// Whether the assembly is running.
    pub active: bool,
    /// Start time, RFC 3339.
    pub started_at: String,
    /// End time, RFC 3339, once ended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
}

impl From<assembly::Model> for AssemblyResponse {
    fn from(model: assembly::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            active: model.active,
            started_at: model.started_at.to_rfc3339(),
            ended_at: model.ended_at.map(|e| e.to_rfc3339()),
        }
    }
}

/// Voting code response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeResponse {
    /// Code ID.
    pub id: String,
    /// The code string handed to an attendee.
    pub code: String,
    /// Whether the code has been spent.
    pub used: bool,
    /// Vote weight the code carries.
    pub votes_count: i32,
}

impl From<code::Model> for CodeResponse {
    fn from(model: code::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            used: model.used,
            votes_count: model.votes_count,
        }
    }
}

/// Start assembly request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartAssemblyRequest {
    /// Optional assembly name; a dated default is used when omitted.
    #[serde(default)]
    pub name: Option<String>,
}

/// Start assembly response: the assembly plus its full code batch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartAssemblyResponse {
    /// The new assembly.
    pub assembly: AssemblyResponse,
    /// The issued codes, for the admin to distribute.
    pub codes: Vec<CodeResponse>,
}

/// Start a new assembly and issue its code batch.
async fn start_assembly(
    State(state): State<AppState>,
    Json(req): Json<StartAssemblyRequest>,
) -> AppResult<ApiResponse<StartAssemblyResponse>> {
    let (assembly, codes) = state.assembly_service.start_assembly(req.name).await?;

    state.sse_broadcaster.broadcast_assembly(SseEvent::AssemblyStarted {
        id: assembly.id.clone(),
        name: assembly.name.clone(),
    });

    Ok(ApiResponse::ok(StartAssemblyResponse {
        assembly: assembly.into(),
        codes: codes.into_iter().map(Into::into).collect(),
    }))
}

/// Get the currently active assembly, if any.
async fn active_assembly(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Option<AssemblyResponse>>> {
    let assembly = state.assembly_service.active_assembly().await?;
    Ok(ApiResponse::ok(assembly.map(Into::into)))
}

/// End an assembly.
async fn end_assembly(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<AssemblyResponse>> {
    let ended = state.assembly_service.end_assembly(&id).await?;

    state.sse_broadcaster.broadcast_assembly(SseEvent::AssemblyEnded {
        id: ended.id.clone(),
    });

    Ok(ApiResponse::ok(ended.into()))
}

/// List an assembly's codes.
async fn list_codes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<CodeResponse>>> {
    let codes = state.assembly_service.codes(&id).await?;
    Ok(ApiResponse::ok(codes.into_iter().map(Into::into).collect()))
}

/// Report format selector.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// `pdf` (default) or `text`.
    #[serde(default)]
    format: Option<String>,
}

/// Download the results report for an assembly.
async fn report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Response> {
    let report = state.report_service.build(&id).await?;

    if query.format.as_deref() == Some("text") {
        let body = asamblea_core::ReportService::render_text(&report);
        return Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response());
    }

    let bytes = asamblea_core::ReportService::render_pdf(&report)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"resultados-{id}.pdf\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_assembly))
        .route("/active", get(active_assembly))
        .route("/{id}/end", post(end_assembly))
        .route("/{id}/codes", get(list_codes))
        .route("/{id}/report", get(report))
}
