//! HTTP client for the daemon's streaming chat endpoint.

use anyhow::{Result, anyhow};
use async_stream::try_stream;
use dcore::{Message, SseDecoder, StreamEvent};
use futures_core::Stream;
use futures_util::StreamExt;
use serde_json::json;

/// Talks to a running deepspaced instance.
#[derive(Clone)]
pub struct DaemonClient {
    client: reqwest::Client,
    base_url: String,
}

impl DaemonClient {
    /// Create a client for the daemon at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Post the transcript and stream back the turn's events.
    pub fn chat(&self, messages: &[Message]) -> impl Stream<Item = Result<StreamEvent>> + Send {
        let request = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&json!({ "messages": messages }));

        try_stream! {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                Err(anyhow!("chat request failed ({status}): {text}"))?;
            }

            let mut stream = response.bytes_stream();
            let mut decoder = SseDecoder::new();
            while let Some(bytes) = stream.next().await {
                for event in decoder.push(&bytes?) {
                    yield event;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = DaemonClient::new("http://127.0.0.1:3210/");
        assert_eq!(client.base_url, "http://127.0.0.1:3210");
    }
}
