//! History Ledger
//!
//! Bounded, newest-first list of resolved flips. Display only: the
//! verifier never reads it.

use std::collections::VecDeque;

use crate::proof::record::FlipRecord;
use crate::session::config::DEFAULT_HISTORY_LIMIT;

/// Bounded flip history, newest first.
#[derive(Clone, Debug)]
pub struct HistoryLedger {
    entries: VecDeque<FlipRecord>,
    limit: usize,
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl HistoryLedger {
    /// Create an empty ledger keeping at most `limit` entries.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Add a record, evicting the oldest past the bound.
    pub fn append(&mut self, record: FlipRecord) {
        self.entries.push_front(record);
        self.entries.truncate(self.limit);
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &FlipRecord> {
        self.entries.iter()
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&FlipRecord> {
        self.entries.front()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No entries yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum entries kept.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
