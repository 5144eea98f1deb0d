//! Session lifecycle over a key/value store.

use crate::{
    ChatHistory, Store,
    session::{ChatSession, session_title, today},
};
use anyhow::{Result, bail};
use compact_str::CompactString;
use dcore::Message;

/// Store key holding the serialized history structure.
pub const HISTORY_KEY: &str = "chat-history";

/// Owns the history, its backing store, and the active session id.
///
/// The store is read once at startup; every message-list change serializes
/// the whole structure back.
pub struct SessionStore<S: Store> {
    store: S,
    history: ChatHistory,
    current: CompactString,
}

impl<S: Store> SessionStore<S> {
    /// Load history from the store and pick the active session: today's
    /// most recently updated one, or a freshly minted id.
    pub fn open(store: S) -> Self {
        let history: ChatHistory = store
            .get(HISTORY_KEY)
            .map(|raw| {
                serde_json::from_str(raw).unwrap_or_else(|e| {
                    tracing::warn!("discarding unreadable chat history: {e}");
                    ChatHistory::default()
                })
            })
            .unwrap_or_default();

        let current = history
            .latest_for(&today())
            .map(|session| session.id.clone())
            .unwrap_or_else(dcore::new_id);

        Self {
            store,
            history,
            current,
        }
    }

    /// The active session id.
    pub fn current_id(&self) -> &str {
        &self.current
    }

    /// The full history structure.
    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    /// Messages of the active session; empty if it was never saved.
    pub fn current_messages(&self) -> Vec<Message> {
        self.history
            .find(&self.current)
            .map(|session| session.messages.clone())
            .unwrap_or_default()
    }

    /// Mint a fresh session id and make it active.
    pub fn new_session(&mut self) -> CompactString {
        self.current = dcore::new_id();
        self.current.clone()
    }

    /// Switch to an existing session.
    pub fn select(&mut self, id: &str) -> Result<()> {
        if self.history.find(id).is_none() {
            bail!("no such session: {id}");
        }
        self.current = id.into();
        Ok(())
    }

    /// Upsert the active session with `messages` and write the store.
    ///
    /// Saving an empty message list is a no-op: a session only enters the
    /// history once it has content.
    pub fn save(&mut self, messages: &[Message]) -> Result<()> {
        if messages.is_empty() {
            return Ok(());
        }

        let now = dcore::now_ms();
        self.history.upsert(ChatSession {
            id: self.current.clone(),
            date: today(),
            title: session_title(messages),
            messages: messages.to_vec(),
            created_at: now,
            updated_at: now,
        });
        self.persist()
    }

    /// Delete a session by id.
    ///
    /// Deleting the active session immediately mints a new one, so the
    /// active id is never dangling. Returns whether a session was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let removed = self.history.remove(id);
        if removed {
            self.persist()?;
        }
        if self.current == id {
            self.new_session();
        }
        Ok(removed)
    }

    fn persist(&mut self) -> Result<()> {
        let raw = serde_json::to_string(&self.history)?;
        self.store.set(HISTORY_KEY, raw)
    }
}
