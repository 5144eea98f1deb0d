//! Shared request-handler state.

use crate::DaemonConfig;
use dcore::ChatConfig;
use provider::Llm;
use std::sync::Arc;
use tools::Toolbox;

/// Shared state available to all request handlers.
pub struct AppState<P: Llm> {
    /// The LLM provider.
    pub provider: P,
    /// The registered tools.
    pub toolbox: Arc<Toolbox>,
    /// Chat configuration with the toolbox schemas attached.
    pub chat: ChatConfig,
    /// System prompt prepended to every turn.
    pub system_prompt: Arc<str>,
}

impl<P: Llm> AppState<P> {
    /// Compose the state from a provider, a toolbox, and the daemon config.
    pub fn new(provider: P, toolbox: Toolbox, config: &DaemonConfig) -> Self {
        let chat = ChatConfig::new(config.model.clone()).with_tools(toolbox.schemas());
        let system_prompt = config
            .system_prompt
            .as_deref()
            .unwrap_or(crate::SYSTEM_PROMPT);

        Self {
            provider,
            toolbox: Arc::new(toolbox),
            chat,
            system_prompt: Arc::from(system_prompt),
        }
    }
}

impl<P: Llm> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            toolbox: Arc::clone(&self.toolbox),
            chat: self.chat.clone(),
            system_prompt: Arc::clone(&self.system_prompt),
        }
    }
}
