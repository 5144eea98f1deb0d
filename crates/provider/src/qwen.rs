//! Qwen over DashScope's OpenAI-compatible endpoint.

use crate::{Llm, Request};
use anyhow::{Result, anyhow};
use async_stream::try_stream;
use dcore::{ChatMessage, SseDecoder, StreamChunk};
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::{
    Client,
    header::{self, HeaderMap},
};

/// DashScope compatible-mode base URL.
pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";

/// Qwen provider.
#[derive(Clone)]
pub struct Qwen {
    client: Client,
    headers: HeaderMap,
    endpoint: String,
}

impl Qwen {
    /// Create a provider with the given credential and optional base URL.
    pub fn new(client: Client, key: &str, base_url: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse()?);
        headers.insert(header::ACCEPT, "text/event-stream".parse()?);
        headers.insert(header::AUTHORIZATION, format!("Bearer {key}").parse()?);

        let base = base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/');
        Ok(Self {
            client,
            headers,
            endpoint: format!("{base}/chat/completions"),
        })
    }
}

impl Llm for Qwen {
    fn stream(
        &self,
        request: Request,
        messages: &[ChatMessage],
    ) -> impl Stream<Item = Result<StreamChunk>> + Send {
        let body = request.with_messages(messages).streaming();
        let request = self
            .client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(&body);

        try_stream! {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                Err(anyhow!("completion request failed ({status}): {text}"))?;
            }

            let mut stream = response.bytes_stream();
            let mut decoder = SseDecoder::new();
            while let Some(bytes) = stream.next().await {
                for chunk in decoder.push(&bytes?) {
                    yield chunk;
                }
            }
            tracing::debug!("completion stream closed");
        }
    }
}
