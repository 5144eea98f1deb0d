//! The event wire between daemon and client.

use crate::annotation::ToolStatus;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events emitted by the daemon while a turn runs.
///
/// Token deltas and tool lifecycle events share one stream; status
/// annotations ride along out of band and may land before the stream has
/// revealed the invocation they describe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A chunk of assistant text.
    Text {
        /// Content delta.
        delta: String,
    },
    /// The model requested a tool invocation.
    ToolCall {
        /// Unique id of the call.
        id: CompactString,
        /// Tool name.
        name: CompactString,
        /// Parsed arguments.
        args: Value,
    },
    /// A tool invocation resolved.
    ToolResult {
        /// Id of the resolved call.
        id: CompactString,
        /// The tool's result.
        result: Value,
    },
    /// Out-of-band status annotation for a running tool.
    ToolStatus(ToolStatus),
    /// The turn finished normally.
    Finish,
    /// The turn failed; the stream ends after this event.
    Error {
        /// What went wrong.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_tag_by_type() {
        let json = serde_json::to_string(&StreamEvent::Text {
            delta: "hi".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"text","delta":"hi"}"#);

        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"finish"}"#).unwrap();
        assert!(matches!(event, StreamEvent::Finish));
    }

    #[test]
    fn status_round_trips() {
        let status = ToolStatus::completed("call-1", "done");
        let json = serde_json::to_string(&StreamEvent::ToolStatus(status)).unwrap();
        let back: StreamEvent = serde_json::from_str(&json).unwrap();
        match back {
            StreamEvent::ToolStatus(s) => assert_eq!(s.tool_call_id, "call-1"),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
