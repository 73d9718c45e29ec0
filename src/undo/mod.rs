//! Undo/Redo over whole-document snapshots
//!
//! Every recorded edit stores a deep copy of the full page collection. Undo
//! and redo move a cursor through the stored copies and hand the selected one
//! back to the container, which restores it into every page at once.
//!
//! While a restoration is being applied the manager is `Restoring` and
//! ignores `record`, `undo` and `redo`; the container calls
//! [`HistoryManager::finish_restoration`] once the last page has re-rendered.

use crate::document::Page;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Default number of snapshots kept.
pub const DEFAULT_CAPACITY: usize = 50;

/// Direction of a history move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryCommand {
    Undo,
    Redo,
}

/// A deep copy of the page collection at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySnapshot {
    pages: Vec<Page>,
}

impl HistorySnapshot {
    pub fn new(pages: &[Page]) -> Self {
        Self {
            pages: pages.to_vec(),
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryState {
    /// Accepting new snapshots
    #[default]
    Idle,
    /// A snapshot is being applied downstream; capture is suppressed
    Restoring(HistoryCommand),
}

/// Linear, capped snapshot history with a cursor
#[derive(Debug, Clone)]
pub struct HistoryManager {
    entries: VecDeque<HistorySnapshot>,
    cursor: usize,
    capacity: usize,
    state: HistoryState,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HistoryManager {
    /// Create a manager keeping at most `capacity` snapshots (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            capacity: capacity.max(1),
            state: HistoryState::Idle,
        }
    }

    /// Seed the log with the initial collection.
    ///
    /// Only takes effect once: when no history exists yet and `pages` is non-empty.
    pub fn initialize(&mut self, pages: &[Page]) -> bool {
        if !self.entries.is_empty() || pages.is_empty() {
            return false;
        }
        debug!(pages = pages.len(), "seeding history");
        self.entries.push_back(HistorySnapshot::new(pages));
        self.cursor = 0;
        true
    }

    /// Record the collection after an edit.
    ///
    /// Discards any redo branch. Returns `false` without touching the log while
    /// a restoration is in flight.
    pub fn record(&mut self, pages: &[Page]) -> bool {
        if self.is_restoring() {
            trace!("capture suppressed during restoration");
            return false;
        }
        if self.entries.is_empty() {
            return self.initialize(pages);
        }

        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(HistorySnapshot::new(pages));
        self.cursor = self.entries.len() - 1;

        while self.entries.len() > self.capacity {
            self.entries.pop_front();
            self.cursor -= 1;
            debug!(capacity = self.capacity, "evicted oldest snapshot");
        }

        trace!(cursor = self.cursor, len = self.entries.len(), "recorded snapshot");
        true
    }

    /// Step back one snapshot and enter `Restoring`.
    pub fn undo(&mut self) -> Option<&HistorySnapshot> {
        if self.is_restoring() {
            debug!("ignoring undo while a restoration is in flight");
            return None;
        }
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.state = HistoryState::Restoring(HistoryCommand::Undo);
        debug!(cursor = self.cursor, "undo");
        self.entries.get(self.cursor)
    }

    /// Step forward one snapshot and enter `Restoring`.
    pub fn redo(&mut self) -> Option<&HistorySnapshot> {
        if self.is_restoring() {
            debug!("ignoring redo while a restoration is in flight");
            return None;
        }
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.state = HistoryState::Restoring(HistoryCommand::Redo);
        debug!(cursor = self.cursor, "redo");
        self.entries.get(self.cursor)
    }

    /// Run `command`
    pub fn step(&mut self, command: HistoryCommand) -> Option<&HistorySnapshot> {
        match command {
            HistoryCommand::Undo => self.undo(),
            HistoryCommand::Redo => self.redo(),
        }
    }

    /// Leave `Restoring` once every page has been restored.
    pub fn finish_restoration(&mut self) {
        if let HistoryState::Restoring(command) = self.state {
            trace!(?command, "restoration complete");
        }
        self.state = HistoryState::Idle;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn is_restoring(&self) -> bool {
        matches!(self.state, HistoryState::Restoring(_))
    }

    pub fn state(&self) -> HistoryState {
        self.state
    }

    /// Snapshot under the cursor
    pub fn current(&self) -> Option<&HistorySnapshot> {
        self.entries.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.state = HistoryState::Idle;
    }
}
