//! Streaming client for the hosted completion service.
//!
//! The service is a black box behind an OpenAI-compatible wire: it accepts a
//! message list plus tool schemas and emits a token stream interleaved with
//! tool-call requests. [`Llm`] is the seam; [`Qwen`] talks to DashScope's
//! compatible-mode endpoint.

pub use qwen::{DEFAULT_BASE_URL, Qwen};
pub use request::Request;

mod qwen;
mod request;

use anyhow::Result;
use dcore::{ChatMessage, StreamChunk};
use futures_core::Stream;

/// A streaming LLM provider.
pub trait Llm: Clone + Send + Sync + 'static {
    /// Stream a chat completion for `messages`.
    fn stream(
        &self,
        request: Request,
        messages: &[ChatMessage],
    ) -> impl Stream<Item = Result<StreamChunk>> + Send;
}
