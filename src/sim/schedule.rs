//! Deferred actions on the session clock
//!
//! Delayed message clears, the reflection hand-off and the spawner interval are
//! queued here with a deadline and fired by the driver in deadline order.
//! Entries with equal deadlines fire in the order they were scheduled.

use serde::{Deserialize, Serialize};

/// Something that happens later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timed {
    /// Blank the HUD message
    ClearMessage,
    /// Move from the naming ritual to the epilogue
    EnterReflection,
    /// Spawner interval tick
    Spawn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    due_ms: f64,
    action: Timed,
}

/// Deadline-ordered queue of [`Timed`] actions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    entries: Vec<Entry>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to fire at `due_ms`
    pub fn at(&mut self, due_ms: f64, action: Timed) {
        let index = self
            .entries
            .iter()
            .position(|e| e.due_ms > due_ms)
            .unwrap_or(self.entries.len());
        self.entries.insert(index, Entry { due_ms, action });
    }

    /// Remove and return the earliest entry due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(f64, Timed)> {
        match self.entries.first() {
            Some(entry) if entry.due_ms <= now_ms => {
                let entry = self.entries.remove(0);
                Some((entry.due_ms, entry.action))
            }
            _ => None,
        }
    }

    /// Drop every pending `action`
    pub fn cancel(&mut self, action: Timed) {
        self.entries.retain(|e| e.action != action);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_pending(&self, action: Timed) -> bool {
        self.entries.iter().any(|e| e.action == action)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deadline of the next pending `action`
    pub fn next_due(&self, action: Timed) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.action == action)
            .map(|e| e.due_ms)
    }
}
