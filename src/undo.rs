//! Linear undo/redo history of full snapshots.
//!
//! Basic semantics:
//! - `record` saves the state as it was before a mutation and clears redo
//! - `undo` trades the current state for the newest undo snapshot
//! - `redo` trades it back
//! - the undo side is bounded; the oldest snapshot is dropped first

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default number of snapshots kept on the undo side.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

fn default_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct UndoLog<T> {
    #[serde(default)]
    undo: VecDeque<T>,
    #[serde(default)]
    redo: Vec<T>,
    #[serde(skip, default = "default_limit")]
    limit: usize,
}

impl<T: PartialEq> PartialEq for UndoLog<T> {
    /// Two logs are equal when their snapshots are; the bound is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.undo == other.undo && self.redo == other.redo
    }
}

impl<T> Default for UndoLog<T> {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl<T> UndoLog<T> {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Change the bound, trimming the oldest snapshots if needed.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        self.trim();
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Save the pre-mutation state. Any redo history is discarded.
    pub fn record(&mut self, snapshot: T) {
        self.undo.push_back(snapshot);
        self.redo.clear();
        self.trim();
    }

    /// Swap `current` for the newest undo snapshot.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Swap `current` for the newest redo snapshot.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        self.trim();
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    fn trim(&mut self) {
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_then_redo_round_trips() {
        let mut log = UndoLog::default();
        log.record(vec![1]);
        let restored = log.undo(vec![1, 2]).unwrap();
        assert_eq!(restored, vec![1]);
        let again = log.redo(restored).unwrap();
        assert_eq!(again, vec![1, 2]);
        assert!(log.can_undo());
        assert!(!log.can_redo());
    }

    #[test]
    fn record_clears_redo() {
        let mut log = UndoLog::default();
        log.record(0);
        let current = log.undo(1).unwrap();
        assert!(log.can_redo());
        log.record(current);
        assert!(!log.can_redo());
        assert!(log.redo(5).is_none());
    }

    #[test]
    fn empty_log_returns_none() {
        let mut log: UndoLog<u8> = UndoLog::default();
        assert!(log.undo(1).is_none());
        assert!(log.redo(1).is_none());
    }

    #[test]
    fn limit_drops_oldest() {
        let mut log = UndoLog::with_limit(2);
        log.record(1);
        log.record(2);
        log.record(3);
        assert_eq!(log.undo_depth(), 2);
        assert_eq!(log.undo(4), Some(3));
        assert_eq!(log.undo(3), Some(2));
        assert_eq!(log.undo(2), None);
    }

    #[test]
    fn limit_is_not_serialized() {
        let mut log = UndoLog::with_limit(3);
        log.record("a".to_string());
        let json = serde_json::to_string(&log).unwrap();
        let loaded: UndoLog<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.undo_depth(), 1);
        assert_eq!(loaded.limit(), DEFAULT_HISTORY_LIMIT);
    }
}
