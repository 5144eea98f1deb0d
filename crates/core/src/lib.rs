//! Core types for the Deepspace chat assistant.
//!
//! The transcript model ([`Message`], [`ToolInvocation`]) is what sessions
//! persist; the wire model ([`ChatMessage`], [`StreamChunk`]) is what the
//! hosted completion API speaks; [`StreamEvent`] is what the daemon emits to
//! its clients. [`Transcript`] reconciles the event stream back into a
//! transcript on the client side.

pub use {
    annotation::{StatusKind, ToolStatus},
    config::ChatConfig,
    event::StreamEvent,
    message::{ChatMessage, Message, Role, ToolInvocation},
    sse::SseDecoder,
    stream::{Delta, FinishReason, MessageBuilder, StreamChoice, StreamChunk},
    tool::{FunctionCall, Tool, ToolCall, ToolChoice},
    transcript::Transcript,
};

mod annotation;
mod config;
mod event;
mod message;
mod sse;
mod stream;
mod tool;
mod transcript;

/// Current unix time in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Mint a fresh ULID identifier.
pub fn new_id() -> compact_str::CompactString {
    compact_str::CompactString::new(ulid::Ulid::new().to_string())
}
