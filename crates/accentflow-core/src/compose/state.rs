// AccentFlow Composition State
// Pure bookkeeping for one accent composition; no I/O

use crate::Key;

/// The accentable key currently being composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveKey {
    pub key: Key,
    pub base: char,
    /// Raw strike counter. Reduce it with [`effective_index`] before use.
    pub variant_index: usize,
}

/// Composition state owned by the router.
///
/// `active` is only ever set while `armed` is true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionState {
    armed: bool,
    active: Option<ActiveKey>,
}

impl CompositionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn active(&self) -> Option<&ActiveKey> {
        self.active.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        !self.armed && self.active.is_none()
    }

    /// Enter accent mode, discarding any selection in progress.
    pub fn arm(&mut self) {
        self.armed = true;
        self.active = None;
    }

    /// Leave accent mode, handing back what was being composed.
    pub fn disarm(&mut self) -> Option<ActiveKey> {
        self.armed = false;
        self.active.take()
    }

    /// Record a press or repeat of an accentable key while armed.
    ///
    /// Striking the same base again advances the selection; any other base
    /// retargets composition and starts from the first variant. Returns the
    /// raw counter after the strike.
    pub fn strike(&mut self, key: Key, base: char) -> usize {
        debug_assert!(self.armed, "strike outside of accent mode");
        match &mut self.active {
            Some(active) if active.base == base => {
                active.key = key;
                active.variant_index = active.variant_index.wrapping_add(1);
                active.variant_index
            }
            _ => {
                self.active = Some(ActiveKey {
                    key,
                    base,
                    variant_index: 0,
                });
                0
            }
        }
    }

    /// Whether a release or repeat of `key` belongs to the composition.
    pub fn suppresses(&self, key: Key) -> bool {
        self.armed && self.active.is_some_and(|active| active.key == key)
    }
}

/// Index into a list of `len` variants, safe for an empty list.
pub fn effective_index(index: usize, len: usize) -> usize {
    index % len.max(1)
}
