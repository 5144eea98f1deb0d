//! Tool status annotations.
//!
//! Statuses travel out of band from the token stream, correlated to a tool
//! invocation by call id. They are ephemeral display state: later statuses
//! for the same call supersede earlier ones, and none are persisted.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// The phase a running tool reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Looking up external data
    Searching,
    /// Evaluating an expression
    Calculating,
    /// Post-processing fetched data
    Processing,
    /// Finished successfully
    Completed,
    /// Failed
    Error,
}

/// A status annotation for one tool invocation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolStatus {
    /// The invocation this status belongs to
    pub tool_call_id: CompactString,

    /// Current phase
    pub status: StatusKind,

    /// Human-readable progress message
    pub message: String,

    /// Progress, 0-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,

    /// Error detail when `status` is [`StatusKind::Error`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Emission time, unix milliseconds
    pub timestamp: i64,
}

impl ToolStatus {
    /// Create an in-progress status.
    pub fn progress(
        tool_call_id: impl Into<CompactString>,
        status: StatusKind,
        message: impl Into<String>,
        progress: u8,
    ) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            status,
            message: message.into(),
            progress: Some(progress),
            error: None,
            timestamp: crate::now_ms(),
        }
    }

    /// Create a completed status (progress 100).
    pub fn completed(tool_call_id: impl Into<CompactString>, message: impl Into<String>) -> Self {
        Self::progress(tool_call_id, StatusKind::Completed, message, 100)
    }

    /// Create an error status.
    pub fn error(
        tool_call_id: impl Into<CompactString>,
        message: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            status: StatusKind::Error,
            message: message.into(),
            progress: None,
            error: Some(error.into()),
            timestamp: crate::now_ms(),
        }
    }

    /// Whether this status reports a failure.
    pub fn is_error(&self) -> bool {
        self.status == StatusKind::Error
    }
}
