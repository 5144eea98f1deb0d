//! HTTP surface: the streaming chat endpoint.

use crate::{AppState, turn};
use axum::{
    Json, Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::post,
};
use dcore::{ChatMessage, Message};
use futures_core::Stream;
use futures_util::StreamExt;
use provider::Llm;
use serde::Deserialize;
use std::convert::Infallible;

/// Request body for `/api/chat`: the client's transcript so far.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Transcript messages, oldest first.
    pub messages: Vec<Message>,
}

/// Build the axum router with the `/api/chat` endpoint.
pub fn router<P: Llm>(state: AppState<P>) -> Router {
    Router::new()
        .route("/api/chat", post(chat::<P>))
        .with_state(state)
}

/// Run a turn and stream its events as server-sent events.
async fn chat<P: Llm>(
    State(state): State<AppState<P>>,
    Json(request): Json<ChatRequest>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let wire = ChatMessage::from_transcript(&request.messages);
    let events = turn::run_turn(state, wire).map(|event| {
        let data = serde_json::to_string(&event).unwrap_or_else(|e| {
            tracing::error!("failed to serialize event: {e}");
            r#"{"type":"error","message":"event serialization failed"}"#.to_owned()
        });
        Ok(Event::default().data(data))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
