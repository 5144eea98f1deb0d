//! Transcript and wire messages.

use crate::tool::{FunctionCall, ToolCall};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The role of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Role {
    /// The user role
    #[serde(rename = "user")]
    User,
    /// The assistant role
    #[serde(rename = "assistant")]
    Assistant,
    /// The system role
    #[serde(rename = "system")]
    System,
    /// The tool role
    #[serde(rename = "tool")]
    Tool,
}

/// A message in a chat transcript.
///
/// Owned by the active session. Immutable once appended, except for the
/// trailing assistant message which grows in place while a response streams.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    /// Unique message id
    pub id: CompactString,

    /// The role of the message
    pub role: Role,

    /// The content of the message
    pub content: String,

    /// Tool invocations requested by this message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_invocations: Vec<ToolInvocation>,
}

impl Message {
    /// Create a new message with a fresh id.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: crate::new_id(),
            role,
            content: content.into(),
            tool_invocations: Vec::new(),
        }
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Find a tool invocation by call id.
    pub fn invocation_mut(&mut self, tool_call_id: &str) -> Option<&mut ToolInvocation> {
        self.tool_invocations
            .iter_mut()
            .find(|inv| inv.tool_call_id == tool_call_id)
    }
}

/// A model-requested call to a named capability.
///
/// Created when the model requests a tool invocation; the result is attached
/// asynchronously once the tool resolves.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolInvocation {
    /// Unique id of the call
    pub tool_call_id: CompactString,

    /// The tool that was invoked
    pub tool_name: CompactString,

    /// Structured arguments the model supplied
    pub args: Value,

    /// The tool result, once resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl ToolInvocation {
    /// Wire form of this invocation.
    fn tool_call(&self) -> ToolCall {
        ToolCall {
            id: self.tool_call_id.to_string(),
            index: 0,
            call_type: "function".into(),
            function: FunctionCall {
                name: self.tool_name.to_string(),
                arguments: self.args.to_string(),
            },
        }
    }
}

/// A message in the chat-completions wire format.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatMessage {
    /// The role of the message
    pub role: Role,

    /// The content of the message
    pub content: String,

    /// Tool calls made by the assistant
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,

    /// For tool results, the call being answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<CompactString>,
}

impl ChatMessage {
    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    /// Create a tool result message answering `tool_call_id`.
    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<CompactString>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Flatten transcript messages into the wire format.
    ///
    /// Assistant tool invocations become `tool_calls` on the assistant
    /// message followed by one `tool` message per resolved invocation, the
    /// shape the completion API expects when a turn is replayed.
    pub fn from_transcript(messages: &[Message]) -> Vec<Self> {
        let mut wire = Vec::with_capacity(messages.len());
        for message in messages {
            match message.role {
                Role::System | Role::User => {
                    wire.push(Self::plain(message.role, message.content.clone()));
                }
                Role::Assistant => {
                    let mut out = Self::assistant(message.content.clone());
                    out.tool_calls = message
                        .tool_invocations
                        .iter()
                        .map(ToolInvocation::tool_call)
                        .collect();
                    wire.push(out);
                    for inv in &message.tool_invocations {
                        let result = inv.result.clone().unwrap_or(Value::Null);
                        wire.push(Self::tool(result.to_string(), inv.tool_call_id.clone()));
                    }
                }
                // Tool results only exist in the wire form; transcripts
                // carry them inside the assistant's invocations.
                Role::Tool => {}
            }
        }
        wire
    }
}
