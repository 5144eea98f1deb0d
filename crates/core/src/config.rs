//! Chat configuration.

use crate::{Tool, ToolChoice};
use serde::{Deserialize, Serialize};

/// Configuration for a chat completion.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    /// The model to use
    pub model: String,

    /// The temperature of the model
    pub temperature: f32,

    /// The number of max tokens to generate
    pub tokens: usize,

    /// A list of tools the model may call
    pub tools: Vec<Tool>,

    /// Controls which tool is called by the model
    pub tool_choice: ToolChoice,
}

impl ChatConfig {
    /// Create a new configuration
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set tools for the configuration
    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the tool choice for the configuration
    pub fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = choice;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: "qwen-plus".into(),
            temperature: 1.0,
            tokens: 4096,
            tools: Vec::new(),
            tool_choice: ToolChoice::Auto,
        }
    }
}
