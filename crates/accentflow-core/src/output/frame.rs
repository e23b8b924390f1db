// AccentFlow Output Layer - Event Framing
// Regroups forwarded events into the frames the source reported

use crate::input::{RawEvent, EV_SYN, SYN_REPORT};

/// Collects forwarded events until the source closes the frame.
///
/// The SYN_REPORT itself is not kept: the device writer appends its own
/// when it emits the frame. Other SYN codes (SYN_DROPPED, SYN_MT_REPORT)
/// stay in the frame in their original position.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pending: Vec<RawEvent>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one event. Returns the finished frame when `event` closes it.
    pub fn push(&mut self, event: RawEvent) -> Option<Vec<RawEvent>> {
        if event.event_type() == EV_SYN && event.code == SYN_REPORT {
            return Some(self.take());
        }
        self.pending.push(event);
        None
    }

    /// Events received since the last report.
    pub fn take(&mut self) -> Vec<RawEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
