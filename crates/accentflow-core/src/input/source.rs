// AccentFlow Input Layer - Event Sources
// The read side of the pipeline: one ordered stream of raw events

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

use super::RawEvent;

/// Errors raised while acquiring or reading an input source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Unable to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to grab input device {path}: {source}")]
    Grab {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Read error: {0}")]
    Read(#[from] std::io::Error),

    /// The source has no more events and never will.
    #[error("Input source exhausted")]
    Exhausted,
}

impl SourceError {
    /// Acquisition failures happen before the loop starts; everything else
    /// is a failure of a running source.
    pub fn is_acquisition(&self) -> bool {
        matches!(
            self,
            SourceError::DeviceNotFound(_) | SourceError::Open { .. } | SourceError::Grab { .. }
        )
    }
}

/// A serial producer of raw input events.
pub trait EventSource {
    /// Wait up to `timeout` for the next event.
    ///
    /// `Ok(None)` means nothing arrived in time (or the wait was interrupted
    /// by a signal) and the caller should try again.
    fn next_event(&mut self, timeout: Duration) -> Result<Option<RawEvent>, SourceError>;
}

impl<T: EventSource + ?Sized> EventSource for Box<T> {
    fn next_event(&mut self, timeout: Duration) -> Result<Option<RawEvent>, SourceError> {
        (**self).next_event(timeout)
    }
}

/// Replays a fixed list of events, then reports [`SourceError::Exhausted`].
///
/// Used to drive the pipeline without hardware.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    events: VecDeque<RawEvent>,
}

impl ReplaySource {
    pub fn new(events: impl IntoIterator<Item = RawEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl EventSource for ReplaySource {
    fn next_event(&mut self, _timeout: Duration) -> Result<Option<RawEvent>, SourceError> {
        self.events.pop_front().map(Some).ok_or(SourceError::Exhausted)
    }
}
