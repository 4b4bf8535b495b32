//! Per-tick input snapshot.
//!
//! The arena keeps the keys held during the previous and the current tick.
//! Edge events ("just pressed") are derived by set difference between the two.

use lulu_common::Key;

/// Keys held during the previous and the current tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    previous: Vec<Key>,
    current: Vec<Key>,
}

impl InputSnapshot {
    /// Creates an empty snapshot (nothing held).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shifts the current keys into the previous slot and stores `keys` as current.
    ///
    /// Order is preserved and duplicates are dropped.
    pub fn advance(&mut self, keys: &[Key]) {
        let mut next = Vec::with_capacity(keys.len());
        for &key in keys {
            if !next.contains(&key) {
                next.push(key);
            }
        }
        self.previous = std::mem::replace(&mut self.current, next);
    }

    /// Keys held this tick.
    #[must_use]
    pub fn current(&self) -> &[Key] {
        &self.current
    }

    /// Keys held last tick.
    #[must_use]
    pub fn previous(&self) -> &[Key] {
        &self.previous
    }

    /// Returns `true` while `key` is held.
    #[must_use]
    pub fn is_down(&self, key: Key) -> bool {
        self.current.contains(&key)
    }

    /// Returns `true` only on the tick `key` goes down.
    #[must_use]
    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.current.contains(&key) && !self.previous.contains(&key)
    }

    /// Returns `true` on the tick `key` is let go.
    #[must_use]
    pub fn is_just_released(&self, key: Key) -> bool {
        !self.current.contains(&key) && self.previous.contains(&key)
    }
}
