//! Turn loop tests against a scripted provider.

use dcore::{
    ChatMessage, Delta, FinishReason, Message, Role, StatusKind, StreamChoice, StreamChunk,
    StreamEvent, ToolCall,
};
use deepspaced::{AppState, DaemonConfig, turn::run_turn};
use futures_core::Stream;
use futures_util::StreamExt;
use provider::{Llm, Request};
use serde_json::json;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};
use tools::Toolbox;

/// Pops one scripted chunk list per provider call and records the messages
/// it was called with.
#[derive(Clone, Default)]
struct Scripted {
    steps: Arc<Mutex<VecDeque<Vec<StreamChunk>>>>,
    seen: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl Scripted {
    fn new(steps: impl IntoIterator<Item = Vec<StreamChunk>>) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into_iter().collect())),
            seen: Arc::default(),
        }
    }

    fn seen(&self) -> Vec<Vec<ChatMessage>> {
        self.seen.lock().unwrap().clone()
    }
}

impl Llm for Scripted {
    fn stream(
        &self,
        _request: Request,
        messages: &[ChatMessage],
    ) -> impl Stream<Item = anyhow::Result<StreamChunk>> + Send {
        self.seen.lock().unwrap().push(messages.to_vec());
        let chunks = self.steps.lock().unwrap().pop_front().unwrap_or_default();
        futures_util::stream::iter(chunks.into_iter().map(Ok))
    }
}

/// Never yields anything.
#[derive(Clone)]
struct Stuck;

impl Llm for Stuck {
    fn stream(
        &self,
        _request: Request,
        _messages: &[ChatMessage],
    ) -> impl Stream<Item = anyhow::Result<StreamChunk>> + Send {
        futures_util::stream::pending()
    }
}

fn state<P: Llm>(provider: P) -> AppState<P> {
    AppState::new(provider, Toolbox::builtin(), &DaemonConfig::default())
}

fn text(delta: &str) -> StreamChunk {
    StreamChunk {
        choices: vec![StreamChoice {
            delta: Delta {
                content: Some(delta.into()),
                ..Default::default()
            },
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn finish(reason: FinishReason) -> StreamChunk {
    StreamChunk {
        choices: vec![StreamChoice {
            finish_reason: Some(reason),
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn tool_call(id: &str, name: &str, args: &str) -> StreamChunk {
    StreamChunk {
        choices: vec![StreamChoice {
            delta: Delta {
                tool_calls: Some(vec![ToolCall {
                    id: id.into(),
                    index: 0,
                    call_type: "function".into(),
                    function: dcore::FunctionCall {
                        name: name.into(),
                        arguments: args.into(),
                    },
                }]),
                ..Default::default()
            },
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn wire(messages: &[Message]) -> Vec<ChatMessage> {
    ChatMessage::from_transcript(messages)
}

fn texts(events: &[StreamEvent]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Text { delta } => Some(delta.as_str()),
            _ => None,
        })
        .collect()
}

fn statuses(events: &[StreamEvent]) -> Vec<StatusKind> {
    events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::ToolStatus(status) => Some(status.status),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn plain_text_turn_streams_and_finishes() {
    let provider = Scripted::new([vec![text("Hel"), text("lo"), finish(FinishReason::Stop)]]);
    let events: Vec<_> = run_turn(state(provider), wire(&[Message::user("hi")]))
        .collect()
        .await;

    assert_eq!(texts(&events), "Hello");
    assert!(matches!(events.last(), Some(StreamEvent::Finish)));
}

#[tokio::test]
async fn system_prompt_is_prepended_once() {
    let provider = Scripted::new([vec![finish(FinishReason::Stop)]]);
    run_turn(state(provider.clone()), wire(&[Message::user("hi")]))
        .collect::<Vec<_>>()
        .await;

    let seen = provider.seen();
    assert_eq!(seen[0][0].role, Role::System);
    assert_eq!(seen[0][1].role, Role::User);
    assert_eq!(
        seen[0].iter().filter(|m| m.role == Role::System).count(),
        1
    );
}

#[tokio::test]
async fn existing_system_message_is_kept() {
    let provider = Scripted::new([vec![finish(FinishReason::Stop)]]);
    let messages = vec![ChatMessage::system("custom"), ChatMessage::user("hi")];
    run_turn(state(provider.clone()), messages)
        .collect::<Vec<_>>()
        .await;

    let seen = provider.seen();
    assert_eq!(seen[0][0].content, "custom");
    assert_eq!(
        seen[0].iter().filter(|m| m.role == Role::System).count(),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn tool_turn_interleaves_calls_statuses_and_results() {
    let provider = Scripted::new([
        vec![
            text("Let me calculate. "),
            tool_call("call-1", "calculator", r#"{"expression":"2+2"}"#),
            finish(FinishReason::ToolCalls),
        ],
        vec![text("The answer is 4."), finish(FinishReason::Stop)],
    ]);

    let events: Vec<_> = run_turn(
        state(provider.clone()),
        wire(&[Message::user("what is 2+2?")]),
    )
    .collect()
    .await;

    // The call is revealed before any of its annotations or its result.
    let call_pos = events
        .iter()
        .position(|e| matches!(e, StreamEvent::ToolCall { name, .. } if name == "calculator"))
        .unwrap();
    let result_pos = events
        .iter()
        .position(|e| matches!(e, StreamEvent::ToolResult { .. }))
        .unwrap();
    assert!(call_pos < result_pos);

    let phases = statuses(&events);
    assert!(phases.contains(&StatusKind::Calculating));
    assert!(phases.contains(&StatusKind::Completed));

    match &events[result_pos] {
        StreamEvent::ToolResult { id, result } => {
            assert_eq!(id, "call-1");
            assert_eq!(result["result"], json!(4));
        }
        _ => unreachable!(),
    }

    assert_eq!(texts(&events), "Let me calculate. The answer is 4.");
    assert!(matches!(events.last(), Some(StreamEvent::Finish)));

    // The second model step saw the assistant call and the tool result.
    let seen = provider.seen();
    assert_eq!(seen.len(), 2);
    let replay = &seen[1];
    assert!(replay.iter().any(|m| !m.tool_calls.is_empty()));
    let tool_msg = replay.iter().find(|m| m.role == Role::Tool).unwrap();
    assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call-1"));
    assert!(tool_msg.content.contains('4'));
}

#[tokio::test(start_paused = true)]
async fn tool_error_does_not_abort_the_turn() {
    let provider = Scripted::new([
        vec![
            tool_call("call-1", "calculator", r#"{"expression":"2+x"}"#),
            finish(FinishReason::ToolCalls),
        ],
        vec![text("That is not something I can compute."), finish(FinishReason::Stop)],
    ]);

    let events: Vec<_> = run_turn(state(provider.clone()), wire(&[Message::user("2+x?")]))
        .collect()
        .await;

    assert!(statuses(&events).contains(&StatusKind::Error));
    let result = events
        .iter()
        .find_map(|e| match e {
            StreamEvent::ToolResult { result, .. } => Some(result.clone()),
            _ => None,
        })
        .unwrap();
    assert!(result["error"].as_str().unwrap().contains("unsupported"));

    // The turn kept going and finished normally.
    assert!(matches!(events.last(), Some(StreamEvent::Finish)));
    assert_eq!(provider.seen().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn unknown_tool_is_reported_and_survived() {
    let provider = Scripted::new([
        vec![
            tool_call("call-1", "compass", "{}"),
            finish(FinishReason::ToolCalls),
        ],
        vec![text("No such instrument."), finish(FinishReason::Stop)],
    ]);

    let events: Vec<_> = run_turn(state(provider), wire(&[Message::user("north?")]))
        .collect()
        .await;

    assert!(statuses(&events).contains(&StatusKind::Error));
    assert!(matches!(events.last(), Some(StreamEvent::Finish)));
}

#[tokio::test(start_paused = true)]
async fn step_limit_surfaces_an_error() {
    let step = vec![
        tool_call("call-1", "calculator", r#"{"expression":"1+1"}"#),
        finish(FinishReason::ToolCalls),
    ];
    let provider = Scripted::new(vec![step; 5]);

    let events: Vec<_> = run_turn(state(provider), wire(&[Message::user("loop")]))
        .collect()
        .await;

    match events.last() {
        Some(StreamEvent::Error { message }) => assert!(message.contains("step limit")),
        other => panic!("expected error event, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn stuck_provider_times_out() {
    let events: Vec<_> = run_turn(state(Stuck), wire(&[Message::user("hello?")]))
        .collect()
        .await;

    match events.last() {
        Some(StreamEvent::Error { message }) => assert!(message.contains("timed out")),
        other => panic!("expected timeout error, got {other:?}"),
    }
}
