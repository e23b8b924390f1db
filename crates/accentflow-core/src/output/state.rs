// AccentFlow Held Key Tracking
// Which keys the virtual device currently reports as down

use std::collections::BTreeSet;

use crate::{Action, Key};

/// Keys pressed on the output device and not yet released.
///
/// Ordered so that releasing everything on shutdown is deterministic.
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    held: BTreeSet<Key>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the effect of `action` on `key`. Repeats change nothing.
    pub fn apply(&mut self, key: Key, action: Action) {
        match action {
            Action::Press => {
                self.held.insert(key);
            }
            Action::Release => {
                self.held.remove(&key);
            }
            Action::Repeat => {}
        }
    }

    /// Held keys, lowest code first.
    pub fn keys(&self) -> Vec<Key> {
        self.held.iter().copied().collect()
    }

    pub fn contains_any(&self, mut pred: impl FnMut(Key) -> bool) -> bool {
        self.held.iter().any(|&key| pred(key))
    }

    /// Remove and return every held key, highest code first.
    pub fn drain(&mut self) -> Vec<Key> {
        let keys = self.held.iter().rev().copied().collect();
        self.held.clear();
        keys
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}
