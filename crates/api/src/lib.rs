//! HTTP API layer for asamblea-rs.
//!
//! This crate provides the REST API and real-time streaming:
//!
//! - **Endpoints**: assemblies, questions, ballots and tallies
//! - **Streaming**: Server-Sent Events pushed on every state change
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod response;
pub mod sse;
pub mod state;

pub use endpoints::router;
pub use sse::{SseBroadcaster, SseEvent};
pub use state::AppState;
