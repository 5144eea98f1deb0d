//! Local chat history, bucketed by calendar date.
//!
//! History is a flat key/value store holding one serialized
//! [`ChatHistory`] under a single key. The [`Store`] trait is fully
//! synchronous; [`InMemory`] backs tests and [`FileStore`] persists a JSON
//! map in one file. Every mutation rewrites the whole structure, which is
//! acceptable at this scale.
//!
//! [`SessionStore`] layers session lifecycle on top: resume today's latest
//! session at startup, upsert on save, drop date buckets as they empty.

pub use history::ChatHistory;
pub use session::{ChatSession, DEFAULT_TITLE, display_date, session_title, today};
pub use sessions::{HISTORY_KEY, SessionStore};
pub use store::{FileStore, InMemory};

mod history;
mod session;
mod sessions;
mod store;

use anyhow::Result;

/// A flat key/value store.
///
/// The trait is synchronous; implementations decide whether `set` and
/// `remove` also persist.
pub trait Store {
    /// Get the value for a key.
    fn get(&self, key: &str) -> Option<&str>;

    /// Set (upsert) a key-value pair.
    fn set(&mut self, key: &str, value: String) -> Result<()>;

    /// Remove a key.
    fn remove(&mut self, key: &str) -> Result<()>;
}
