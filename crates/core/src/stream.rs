//! Streaming chunks from the completion API, and their accumulation.

use crate::{
    message::{ChatMessage, Role},
    tool::ToolCall,
};
use serde::Deserialize;

/// A streaming chat completion chunk
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamChunk {
    /// A unique identifier for the chat completion
    #[serde(default)]
    pub id: String,

    /// The model used for the completion
    #[serde(default)]
    pub model: String,

    /// The list of completion choices (with delta content)
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

impl StreamChunk {
    /// Get the content of the first choice
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
    }

    /// Get the tool calls of the first choice
    pub fn tool_calls(&self) -> Option<&[ToolCall]> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.tool_calls.as_deref())
    }

    /// Get the reason the model stopped generating
    pub fn reason(&self) -> Option<&FinishReason> {
        self.choices
            .first()
            .and_then(|choice| choice.finish_reason.as_ref())
    }
}

/// A completion choice in a streaming response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamChoice {
    /// The index of this choice in the list
    #[serde(default)]
    pub index: u32,

    /// The delta content for this chunk
    #[serde(default)]
    pub delta: Delta,

    /// The reason the model stopped generating
    pub finish_reason: Option<FinishReason>,
}

/// Delta content in a streaming response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Delta {
    /// The role of the message author
    pub role: Option<Role>,

    /// The content delta
    pub content: Option<String>,

    /// Tool calls delta
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// The reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The model finished naturally
    Stop,

    /// The model hit the max token limit
    Length,

    /// Content was filtered
    ContentFilter,

    /// The model is making tool calls
    ToolCalls,
}

/// Accumulates streaming chunks into a complete assistant message.
///
/// Tool call deltas are merged by stream index: the first delta for an index
/// carries the id and name, later ones append argument fragments.
#[derive(Debug, Default)]
pub struct MessageBuilder {
    content: String,
    tool_calls: Vec<(u32, ToolCall)>,
}

impl MessageBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a chunk into the message under construction.
    ///
    /// Returns `true` when the chunk carried a visible content delta.
    pub fn accept(&mut self, chunk: &StreamChunk) -> bool {
        if let Some(calls) = chunk.tool_calls() {
            for call in calls {
                match self.tool_calls.iter_mut().find(|(i, _)| *i == call.index) {
                    Some((_, merged)) => merged.merge(call),
                    None => self.tool_calls.push((call.index, call.clone())),
                }
            }
        }

        match chunk.content() {
            Some(text) if !text.is_empty() => {
                self.content.push_str(text);
                true
            }
            _ => false,
        }
    }

    /// Finish accumulation into an assistant wire message.
    pub fn build(self) -> ChatMessage {
        let mut message = ChatMessage::assistant(self.content);
        message.tool_calls = self.tool_calls.into_iter().map(|(_, call)| call).collect();
        message
    }
}
