//! Server-Sent Events for real-time updates.
//!
//! Three streams mirror the three tables that change during an assembly:
//! `assemblies`, `questions` and `votes`. Write endpoints broadcast after
//! every successful mutation so connected clients re-render immediately.

use std::convert::Infallible;
use std::time::Duration;

use asamblea_core::Tally;
use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::stream::{self, Stream};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use crate::state::AppState;

/// SSE event types.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SseEvent {
    /// Connection established.
    Connected,
    /// A new assembly started.
    #[serde(rename_all = "camelCase")]
    AssemblyStarted {
        /// Assembly ID.
        id: String,
        /// Assembly name.
        name: String,
    },
    /// An assembly ended.
    #[serde(rename_all = "camelCase")]
    AssemblyEnded {
        /// Assembly ID.
        id: String,
    },
    /// A question opened for voting.
    #[serde(rename_all = "camelCase")]
    QuestionOpened {
        /// Question ID.
        id: String,
        /// Owning assembly ID.
        assembly_id: String,
        /// Question text.
        text: String,
        /// Presentation order (1-based).
        order_number: i32,
    },
    /// A question closed.
    #[serde(rename_all = "camelCase")]
    QuestionClosed {
        /// Question ID.
        id: String,
    },
    /// Votes were recorded; carries the fresh tally.
    #[serde(rename_all = "camelCase")]
    VoteCast {
        /// Question the votes landed on.
        question_id: String,
        /// Updated weighted totals.
        tally: Tally,
    },
}

/// SSE broadcast channels, one per table clients watch.
#[derive(Clone)]
pub struct SseBroadcaster {
    /// Assembly lifecycle events.
    pub assemblies: broadcast::Sender<SseEvent>,
    /// Question lifecycle events.
    pub questions: broadcast::Sender<SseEvent>,
    /// Vote events with fresh tallies.
    pub votes: broadcast::Sender<SseEvent>,
}

impl SseBroadcaster {
    /// Create a new SSE broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (assemblies, _) = broadcast::channel(1000);
        let (questions, _) = broadcast::channel(1000);
        let (votes, _) = broadcast::channel(1000);

        Self {
            assemblies,
            questions,
            votes,
        }
    }

    /// Broadcast an assembly lifecycle event.
    pub fn broadcast_assembly(&self, event: SseEvent) {
        let _ = self.assemblies.send(event);
    }

    /// Broadcast a question lifecycle event.
    pub fn broadcast_question(&self, event: SseEvent) {
        let _ = self.questions.send(event);
    }

    /// Broadcast a vote event.
    pub fn broadcast_vote(&self, event: SseEvent) {
        let _ = self.votes.send(event);
    }
}

impl Default for SseBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a broadcast receiver into an SSE response, prefixed with a
/// connected event.
fn event_stream(
    rx: broadcast::Receiver<SseEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        result.ok().map(|event| {
            Ok(Event::default()
                .json_data(&event)
                .unwrap_or_else(|_| Event::default().data("error")))
        })
    });

    let initial = stream::once(async {
        Ok(Event::default()
            .json_data(&SseEvent::Connected)
            .unwrap_or_else(|_| Event::default().data("connected")))
    });

    Sse::new(initial.chain(stream)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}

/// Assembly lifecycle SSE stream.
async fn assemblies_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    event_stream(state.sse_broadcaster.assemblies.subscribe())
}

/// Question lifecycle SSE stream.
async fn questions_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    event_stream(state.sse_broadcaster.questions.subscribe())
}

/// Vote SSE stream.
async fn votes_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    event_stream(state.sse_broadcaster.votes.subscribe())
}

/// Create SSE router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/assemblies", get(assemblies_stream))
        .route("/questions", get(questions_stream))
        .route("/votes", get(votes_stream))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sse_broadcaster_new() {
        let broadcaster = SseBroadcaster::new();
        assert_eq!(broadcaster.assemblies.receiver_count(), 0);
        assert_eq!(broadcaster.questions.receiver_count(), 0);
        assert_eq!(broadcaster.votes.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_subscriber() {
        let broadcaster = SseBroadcaster::new();
        let mut rx = broadcaster.questions.subscribe();

        broadcaster.broadcast_question(SseEvent::QuestionClosed {
            id: "q1".to_string(),
        });

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, SseEvent::QuestionClosed { .. }));
    }

    #[test]
    fn test_broadcast_without_subscribers_is_a_no_op() {
        let broadcaster = SseBroadcaster::new();
        broadcaster.broadcast_assembly(SseEvent::AssemblyEnded {
            id: "asm1".to_string(),
        });
    }

    #[test]
    fn test_vote_event_serialization() {
        let event = SseEvent::VoteCast {
            question_id: "q1".to_string(),
            tally: Tally {
                a_favor: 5,
                en_contra: 2,
                abstenerse: 1,
            },
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"voteCast\""));
        assert!(json.contains("\"questionId\":\"q1\""));
        assert!(json.contains("\"aFavor\":5"));
    }

    #[test]
    fn test_question_event_serialization() {
        let event = SseEvent::QuestionOpened {
            id: "q1".to_string(),
            assembly_id: "asm1".to_string(),
            text: "¿Se aprueba?".to_string(),
            order_number: 1,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"questionOpened\""));
        assert!(json.contains("\"assemblyId\":\"asm1\""));
        assert!(json.contains("\"orderNumber\":1"));
    }
}
