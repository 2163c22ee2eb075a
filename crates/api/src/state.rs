//! Shared application state.

use asamblea_core::{AssemblyService, BallotService, QuestionService, ReportService};

use crate::sse::SseBroadcaster;

/// Application state handed to every endpoint.
#[derive(Clone)]
pub struct AppState {
    /// Assembly lifecycle and code issuance.
    pub assembly_service: AssemblyService,
    /// Question sequencing.
    pub question_service: QuestionService,
    /// Code validation and vote casting.
    pub ballot_service: BallotService,
    /// Tallies and result reports.
    pub report_service: ReportService,
    /// Fan-out for real-time SSE streams.
    pub sse_broadcaster: SseBroadcaster,
}
