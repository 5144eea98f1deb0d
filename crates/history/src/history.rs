//! The date-bucketed history structure.

use crate::session::ChatSession;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sessions grouped by calendar date.
///
/// Invariants: a date key never maps to an empty list, and session ids are
/// unique across the whole structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ChatHistory {
    buckets: BTreeMap<CompactString, Vec<ChatSession>>,
}

impl ChatHistory {
    /// Whether the history holds no sessions at all.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of sessions across all dates.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Iterate date buckets in ascending date order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&CompactString, &[ChatSession])> {
        self.buckets
            .iter()
            .map(|(date, sessions)| (date, sessions.as_slice()))
    }

    /// Find a session by id, wherever it lives.
    pub fn find(&self, id: &str) -> Option<&ChatSession> {
        self.buckets
            .values()
            .flat_map(|sessions| sessions.iter())
            .find(|session| session.id == id)
    }

    /// Insert or replace a session in its date bucket.
    ///
    /// Replacing preserves the existing `created_at`; the incoming value is
    /// taken for everything else.
    pub fn upsert(&mut self, mut session: ChatSession) {
        let bucket = self.buckets.entry(session.date.clone()).or_default();
        match bucket.iter_mut().find(|s| s.id == session.id) {
            Some(existing) => {
                session.created_at = existing.created_at;
                *existing = session;
            }
            None => bucket.push(session),
        }
    }

    /// Remove a session by id. Returns whether anything was removed.
    ///
    /// A bucket emptied by the removal is dropped with it.
    pub fn remove(&mut self, id: &str) -> bool {
        let mut removed = false;
        self.buckets.retain(|_, sessions| {
            let len = sessions.len();
            sessions.retain(|s| s.id != id);
            removed |= sessions.len() != len;
            !sessions.is_empty()
        });
        removed
    }

    /// The most recently updated session for a date, if any.
    pub fn latest_for(&self, date: &str) -> Option<&ChatSession> {
        self.buckets
            .get(date)?
            .iter()
            .max_by_key(|session| session.updated_at)
    }
}
