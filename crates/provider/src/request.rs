//! The chat-completions request body.

use dcore::{ChatConfig, ChatMessage, ToolChoice};
use serde::Serialize;
use serde_json::{Value, json};

/// The request body for the completion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// The model we are using
    pub model: String,

    /// The messages to send
    pub messages: Vec<ChatMessage>,

    /// Whether to stream the response
    pub stream: bool,

    /// The temperature to use for the response
    #[serde(skip_serializing_if = "Value::is_null")]
    pub temperature: Value,

    /// The maximum number of tokens to generate
    pub max_tokens: usize,

    /// A list of tools the model may call
    #[serde(skip_serializing_if = "Value::is_null")]
    pub tools: Value,

    /// Controls which (if any) tool is called by the model
    #[serde(skip_serializing_if = "Value::is_null")]
    pub tool_choice: Value,
}

impl Request {
    /// Fill in the messages for one call.
    pub fn with_messages(&self, messages: &[ChatMessage]) -> Self {
        Self {
            messages: messages.to_vec(),
            ..self.clone()
        }
    }

    /// Enable streaming for the request.
    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }
}

impl From<&ChatConfig> for Request {
    fn from(config: &ChatConfig) -> Self {
        Self {
            model: config.model.clone(),
            messages: Vec::new(),
            stream: false,
            temperature: serde_json::Number::from_f64(config.temperature as f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            max_tokens: config.tokens,
            tools: serialize_tools(&config.tools),
            // "none" alone is meaningful without tools attached
            tool_choice: if config.tools.is_empty()
                && !matches!(config.tool_choice, ToolChoice::None)
            {
                Value::Null
            } else {
                serde_json::to_value(&config.tool_choice).unwrap_or(Value::Null)
            },
        }
    }
}

/// Wrap tool schemas the way the chat-completions wire expects.
fn serialize_tools(tools: &[dcore::Tool]) -> Value {
    if tools.is_empty() {
        return Value::Null;
    }

    tools
        .iter()
        .map(|tool| json!({ "type": "function", "function": tool }))
        .collect()
}
