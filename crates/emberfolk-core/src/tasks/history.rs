//! Bounded per-agent task history - diagnostics only, no gameplay effect.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::{TaskKind, TaskStatus};

/// How many completed tasks an agent remembers.
pub const HISTORY_CAP: usize = 5;

/// One completed (or failed) task, as remembered by its claimant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: TaskKind,
    pub result: TaskStatus,
    pub completed_at: u64,
    pub message: Option<String>,
}

/// Fixed-capacity ring buffer of [`HistoryEntry`]. Pushing beyond
/// [`HISTORY_CAP`] evicts the oldest entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskHistory {
    entries: VecDeque<HistoryEntry>,
}

impl TaskHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == HISTORY_CAP {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Oldest-first iteration.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
