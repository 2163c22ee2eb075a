//! API endpoints.

mod assemblies;
mod ballots;
mod questions;
mod votes;

use axum::Router;

use crate::sse;
use crate::state::AppState;

pub use assemblies::{AssemblyResponse, CodeResponse};
pub use questions::QuestionResponse;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/assemblies", assemblies::router())
        .nest("/questions", questions::router())
        .nest("/ballots", ballots::router())
        .nest("/votes", votes::router())
        .nest("/streaming/sse", sse::router())
}
