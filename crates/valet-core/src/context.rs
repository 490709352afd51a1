//! Bounded conversation context: one entry per parsed turn, oldest evicted
//! first. The tracker itself is not locked; the router serializes access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::intent::{Intent, SlotMap};

/// Default number of turns kept in history.
pub const DEFAULT_CONTEXT_CAPACITY: usize = 20;

/// Tag distinguishing classified turns from other bookkeeping entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Intent,
    Note,
}

/// One record per turn. Read-only after insertion; removed only by capacity
/// eviction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextEntry {
    pub kind: EntryKind,
    pub name: String,
    pub slots: SlotMap,
    pub confidence: f64,
    pub recorded_at: DateTime<Utc>,
}

impl ContextEntry {
    pub fn from_intent(intent: &Intent) -> Self {
        Self {
            kind: EntryKind::Intent,
            name: intent.name.clone(),
            slots: intent.slots.clone(),
            confidence: intent.confidence,
            recorded_at: Utc::now(),
        }
    }

    pub fn note(name: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Note,
            name: name.into(),
            slots: SlotMap::new(),
            confidence: 0.0,
            recorded_at: Utc::now(),
        }
    }
}

/// Fixed-capacity FIFO history of past turns.
#[derive(Debug)]
pub struct ContextTracker {
    history: VecDeque<ContextEntry>,
    capacity: usize,
}

impl ContextTracker {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest once capacity is reached.
    pub fn record(&mut self, entry: ContextEntry) {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(entry);
    }

    /// Most recent entry tagged as an intent, scanning backwards.
    pub fn last_intent(&self) -> Option<&ContextEntry> {
        self.history
            .iter()
            .rev()
            .find(|entry| entry.kind == EntryKind::Intent)
    }

    /// Up to `n` most recent entries, newest last.
    pub fn recent_entries(&self, n: usize) -> Vec<&ContextEntry> {
        let skip = self.history.len().saturating_sub(n);
        self.history.iter().skip(skip).collect()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl Default for ContextTracker {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::Intent;

    fn intent_entry(name: &str) -> ContextEntry {
        ContextEntry::from_intent(&Intent::new(name, SlotMap::new(), 1.0))
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let mut tracker = ContextTracker::new(3);
        for name in ["a", "b", "c", "d"] {
            tracker.record(intent_entry(name));
        }
        assert_eq!(tracker.len(), 3);
        let names: Vec<&str> = tracker
            .recent_entries(3)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "c", "d"]);
    }

    #[test]
    fn last_intent_skips_notes() {
        let mut tracker = ContextTracker::default();
        tracker.record(intent_entry("get_time"));
        tracker.record(ContextEntry::note("speech_failure"));
        assert_eq!(tracker.last_intent().unwrap().name, "get_time");
    }

    #[test]
    fn last_intent_is_none_when_empty() {
        let tracker = ContextTracker::default();
        assert!(tracker.last_intent().is_none());
    }

    #[test]
    fn recent_entries_are_newest_last() {
        let mut tracker = ContextTracker::default();
        tracker.record(intent_entry("first"));
        tracker.record(intent_entry("second"));
        let recent = tracker.recent_entries(1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].name, "second");
    }
}
