//! Callable tools for the Deepspace assistant.
//!
//! A [`Tool`] advertises a JSON-Schema parameter shape to the model and
//! executes asynchronously, reporting progress through a [`StatusSink`]
//! whose annotations travel out of band from the token stream. The
//! [`Toolbox`] holds the registered tools and dispatches model tool calls
//! to them.

pub use calculator::{CalculatorTool, EvalError, evaluate};
pub use weather::WeatherTool;

mod calculator;
mod weather;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use compact_str::CompactString;
use dcore::{StatusKind, ToolCall, ToolStatus};
use schemars::Schema;
use serde_json::Value;
use tokio::sync::mpsc;

/// A capability the model may invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model calls this tool by.
    fn name(&self) -> &'static str;

    /// Description shown to the model.
    fn description(&self) -> &'static str;

    /// JSON Schema of the arguments.
    fn parameters(&self) -> Schema;

    /// Run the tool, reporting progress through `status`.
    async fn execute(&self, args: Value, status: &StatusSink) -> Result<Value>;
}

/// Emits status annotations for one tool invocation.
///
/// Sends are fire-and-forget: a dropped receiver means the client is gone
/// and there is nobody left to report to.
#[derive(Clone)]
pub struct StatusSink {
    tool_call_id: CompactString,
    tx: mpsc::UnboundedSender<ToolStatus>,
}

impl StatusSink {
    /// Create a sink for the given call, emitting into `tx`.
    pub fn new(
        tool_call_id: impl Into<CompactString>,
        tx: mpsc::UnboundedSender<ToolStatus>,
    ) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tx,
        }
    }

    /// Report an in-progress phase.
    pub fn progress(&self, kind: StatusKind, message: impl Into<String>, progress: u8) {
        let _ = self.tx.send(ToolStatus::progress(
            self.tool_call_id.clone(),
            kind,
            message,
            progress,
        ));
    }

    /// Report successful completion.
    pub fn completed(&self, message: impl Into<String>) {
        let _ = self
            .tx
            .send(ToolStatus::completed(self.tool_call_id.clone(), message));
    }

    /// Report failure.
    pub fn error(&self, message: impl Into<String>, error: impl Into<String>) {
        let _ = self.tx.send(ToolStatus::error(
            self.tool_call_id.clone(),
            message,
            error,
        ));
    }
}

/// The registered tools.
#[derive(Default)]
pub struct Toolbox {
    tools: Vec<Box<dyn Tool>>,
}

impl Toolbox {
    /// An empty toolbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in tool set: weather lookup and calculator.
    pub fn builtin() -> Self {
        Self::new().with(WeatherTool).with(CalculatorTool)
    }

    /// Register a tool.
    pub fn with(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.push(Box::new(tool));
        self
    }

    /// Wire schemas for every registered tool.
    pub fn schemas(&self) -> Vec<dcore::Tool> {
        self.tools
            .iter()
            .map(|tool| dcore::Tool {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                parameters: tool.parameters(),
            })
            .collect()
    }

    /// Dispatch a model tool call to its implementation.
    ///
    /// Failures outside the tool body (unknown name, malformed argument
    /// JSON) are reported through the sink here; tools report their own.
    pub async fn dispatch(&self, call: &ToolCall, status: &StatusSink) -> Result<Value> {
        let name = call.function.name.as_str();
        let Some(tool) = self.tools.iter().find(|tool| tool.name() == name) else {
            let err = anyhow!("unknown tool: {name}");
            status.error("Tool invocation failed", err.to_string());
            return Err(err);
        };

        let args = match call.parsed_args() {
            Ok(args) => args,
            Err(e) => {
                status.error("Tool invocation failed", e.to_string());
                return Err(e.into());
            }
        };

        tracing::debug!("dispatching {name} with {args}");
        tool.execute(args, status).await
    }
}
