//! Client-side reconciliation of the event stream.

use crate::{
    annotation::ToolStatus,
    event::StreamEvent,
    message::{Message, Role, ToolInvocation},
};
use compact_str::CompactString;
use std::collections::BTreeMap;

/// A transcript under reconstruction from a daemon event stream.
///
/// Text deltas grow the trailing assistant message in place. Tool statuses
/// are kept in a last-write-wins map keyed by call id, separate from the
/// message list: a status may arrive before the token stream reveals its
/// invocation, and is rendered once it does.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    statuses: BTreeMap<CompactString, ToolStatus>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from previously persisted messages.
    ///
    /// Statuses are ephemeral and start empty regardless of what the
    /// messages contain.
    pub fn resume(messages: Vec<Message>) -> Self {
        Self {
            messages,
            statuses: BTreeMap::new(),
        }
    }

    /// The reconstructed message list.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Latest status for a tool invocation, if any has arrived.
    pub fn status(&self, tool_call_id: &str) -> Option<&ToolStatus> {
        self.statuses.get(tool_call_id)
    }

    /// Append a complete message (e.g. the user's input).
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Drop all messages and statuses.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.statuses.clear();
    }

    /// Fold one stream event into the transcript.
    ///
    /// Returns `true` when the message list changed, which is the signal to
    /// persist the session.
    pub fn apply(&mut self, event: &StreamEvent) -> bool {
        match event {
            StreamEvent::Text { delta } => {
                self.trailing_assistant().content.push_str(delta);
                true
            }
            StreamEvent::ToolCall { id, name, args } => {
                let message = self.trailing_assistant();
                if message.invocation_mut(id).is_some() {
                    return false;
                }
                message.tool_invocations.push(ToolInvocation {
                    tool_call_id: id.clone(),
                    tool_name: name.clone(),
                    args: args.clone(),
                    result: None,
                });
                true
            }
            StreamEvent::ToolResult { id, result } => {
                match self
                    .messages
                    .iter_mut()
                    .rev()
                    .find_map(|m| m.invocation_mut(id))
                {
                    Some(invocation) => {
                        invocation.result = Some(result.clone());
                        true
                    }
                    None => {
                        tracing::warn!("result for unknown tool call {id}");
                        false
                    }
                }
            }
            StreamEvent::ToolStatus(status) => {
                self.statuses
                    .insert(status.tool_call_id.clone(), status.clone());
                false
            }
            StreamEvent::Finish | StreamEvent::Error { .. } => false,
        }
    }

    /// The trailing assistant message, created on demand.
    fn trailing_assistant(&mut self) -> &mut Message {
        if self.messages.last().map(|m| m.role) != Some(Role::Assistant) {
            self.messages.push(Message::assistant(""));
        }
        self.messages.last_mut().unwrap()
    }
}
