//! One model turn: stream chunks, run tools, interleave annotations.

use crate::AppState;
use anyhow::Result;
use dcore::{ChatMessage, MessageBuilder, Role, StreamEvent};
use futures_core::Stream;
use futures_util::StreamExt;
use provider::{Llm, Request};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tools::StatusSink;

/// Upper bound on model steps within one turn.
const MAX_TOOL_STEPS: usize = 5;

/// Wall-clock bound for a whole turn.
const TURN_TIMEOUT: Duration = Duration::from_secs(30);

/// Run one turn against the provider, streaming events as they happen.
///
/// The turn is driven on a spawned task so tool-status annotations flow into
/// the event stream while the driver awaits tools or the model. The stream
/// always ends with either [`StreamEvent::Finish`] or [`StreamEvent::Error`].
pub fn run_turn<P: Llm>(
    state: AppState<P>,
    messages: Vec<ChatMessage>,
) -> impl Stream<Item = StreamEvent> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let outcome = tokio::time::timeout(TURN_TIMEOUT, drive(state, messages, tx.clone())).await;
        let last = match outcome {
            Ok(Ok(())) => StreamEvent::Finish,
            Ok(Err(e)) => {
                tracing::error!("turn failed: {e:?}");
                StreamEvent::Error {
                    message: e.to_string(),
                }
            }
            Err(_) => StreamEvent::Error {
                message: "request timed out".into(),
            },
        };
        let _ = tx.send(last);
    });

    async_stream::stream! {
        while let Some(event) = rx.recv().await {
            yield event;
        }
    }
}

/// The turn driver: up to [`MAX_TOOL_STEPS`] model steps.
async fn drive<P: Llm>(
    state: AppState<P>,
    mut messages: Vec<ChatMessage>,
    tx: UnboundedSender<StreamEvent>,
) -> Result<()> {
    if messages.first().map(|m| m.role) != Some(Role::System) {
        messages.insert(0, ChatMessage::system(state.system_prompt.as_ref()));
    }
    let request = Request::from(&state.chat);

    // Bridge tool statuses into the event stream. The forwarder ends once
    // every sink (and the driver's own sender) is gone.
    let (status_tx, mut status_rx) = mpsc::unbounded_channel();
    let forwarder = {
        let tx = tx.clone();
        tokio::spawn(async move {
            while let Some(status) = status_rx.recv().await {
                let _ = tx.send(StreamEvent::ToolStatus(status));
            }
        })
    };

    for _ in 0..MAX_TOOL_STEPS {
        let mut builder = MessageBuilder::new();

        {
            let stream = state.provider.stream(request.clone(), &messages);
            futures_util::pin_mut!(stream);
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                if builder.accept(&chunk) {
                    let _ = tx.send(StreamEvent::Text {
                        delta: chunk.content().unwrap_or_default().to_owned(),
                    });
                }
                if chunk.reason().is_some() {
                    break;
                }
            }
        }

        let message = builder.build();
        if message.tool_calls.is_empty() {
            drop(status_tx);
            let _ = forwarder.await;
            return Ok(());
        }

        // Reveal the calls, run the tools, and feed results back.
        let mut results = Vec::with_capacity(message.tool_calls.len());
        for call in &message.tool_calls {
            let _ = tx.send(StreamEvent::ToolCall {
                id: call.id.as_str().into(),
                name: call.function.name.as_str().into(),
                args: call.parsed_args().unwrap_or(Value::Null),
            });

            let sink = StatusSink::new(call.id.as_str(), status_tx.clone());
            let result = match state.toolbox.dispatch(call, &sink).await {
                Ok(result) => result,
                Err(e) => {
                    // The tool already reported the failure through its
                    // sink; the turn itself keeps going.
                    tracing::warn!("tool {} failed: {e}", call.function.name);
                    json!({ "error": e.to_string() })
                }
            };

            let _ = tx.send(StreamEvent::ToolResult {
                id: call.id.as_str().into(),
                result: result.clone(),
            });
            results.push(ChatMessage::tool(result.to_string(), call.id.as_str()));
        }

        messages.push(message);
        messages.extend(results);
    }

    drop(status_tx);
    let _ = forwarder.await;
    anyhow::bail!("tool step limit reached")
}
