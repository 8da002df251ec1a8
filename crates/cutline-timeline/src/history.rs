//! Snapshot-based undo/redo history.
//!
//! The stack never owns the live state. Callers hand in the pre-mutation
//! snapshot on `record`, and the current live snapshot on `undo`/`redo`,
//! and restore whatever snapshot comes back:
//!
//! ```ignore
//! history.record("Add clip", store.snapshot());
//! // ... mutate ...
//! if let Some(prev) = history.undo(store.snapshot()) {
//!     store.restore(prev);
//! }
//! ```

use tracing::debug;

/// A single entry in the undo/redo history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry<T> {
    /// Human-readable label describing the action (e.g., "Move clip").
    pub label: String,
    /// State captured at this point in history.
    pub snapshot: T,
}

/// Linear undo/redo history. A new record truncates the redo branch.
#[derive(Debug, Clone)]
pub struct HistoryStack<T> {
    /// Past states (most recent last).
    past: Vec<HistoryEntry<T>>,
    /// Undone states (next to redo last).
    future: Vec<HistoryEntry<T>>,
    /// Maximum number of past entries.
    max_depth: usize,
}

impl<T: Clone> HistoryStack<T> {
    /// Create a new history with the given maximum depth.
    pub fn new(max_depth: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Push the pre-mutation state onto `past` and clear `future`.
    pub fn record(&mut self, label: &str, snapshot: T) {
        self.future.clear();
        self.past.push(HistoryEntry {
            label: label.to_string(),
            snapshot,
        });
        if self.past.len() > self.max_depth {
            self.past.remove(0);
        }
        debug!(label, past = self.past.len(), "History entry recorded");
    }

    /// Step back. `current` is the live state, which moves onto `future`.
    /// Returns the new live state, or `None` (and keeps `current`) when
    /// there is nothing to undo.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let entry = self.past.pop()?;
        debug!(label = %entry.label, past = self.past.len(), "Undo");
        self.future.push(HistoryEntry {
            label: entry.label.clone(),
            snapshot: current,
        });
        Some(entry.snapshot)
    }

    /// Step forward. Mirror of [`undo`](Self::undo).
    pub fn redo(&mut self, current: T) -> Option<T> {
        let entry = self.future.pop()?;
        debug!(label = %entry.label, future = self.future.len(), "Redo");
        self.past.push(HistoryEntry {
            label: entry.label.clone(),
            snapshot: current,
        });
        Some(entry.snapshot)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo steps available.
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    /// Number of redo steps available.
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Label of the action the next undo reverts.
    pub fn undo_label(&self) -> Option<&str> {
        self.past.last().map(|e| e.label.as_str())
    }

    /// Label of the action the next redo reapplies.
    pub fn redo_label(&self) -> Option<&str> {
        self.future.last().map(|e| e.label.as_str())
    }

    /// Clear all history.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

impl<T: Clone> Default for HistoryStack<T> {
    fn default() -> Self {
        Self::new(200)
    }
}

// ── Tests ───────────────────────────────────────────────────────
