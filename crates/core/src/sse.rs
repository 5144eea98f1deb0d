//! Server-sent-event data-frame decoding.

use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// Reassembles SSE `data:` frames that may arrive split across reads and
/// decodes their JSON payloads.
///
/// Empty lines, comment lines, `[DONE]` markers and unparseable payloads
/// yield nothing; the latter are logged and skipped rather than failing the
/// stream.
pub struct SseDecoder<T> {
    pending: String,
    _payload: PhantomData<T>,
}

impl<T> Default for SseDecoder<T> {
    fn default() -> Self {
        Self {
            pending: String::new(),
            _payload: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> SseDecoder<T> {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every payload completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<T> {
        self.pending.push_str(&String::from_utf8_lossy(bytes));

        let mut out = Vec::new();
        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            out.extend(decode(line.trim()));
        }
        out
    }
}

/// Decode one SSE line into a payload.
fn decode<T: DeserializeOwned>(line: &str) -> Option<T> {
    let data = line.strip_prefix("data:")?.trim();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }
    match serde_json::from_str(data) {
        Ok(payload) => Some(payload),
        Err(e) => {
            tracing::warn!("failed to parse frame: {e}, data: {data}");
            None
        }
    }
}
