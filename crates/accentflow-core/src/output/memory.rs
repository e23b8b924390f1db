// AccentFlow In-Memory Sink
// Records output instead of writing to a device

use super::sink::{KeySink, OutputError};
use super::unicode::KeyStroke;
use crate::input::RawEvent;
use crate::{Action, Key};

/// One thing written to a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkRecord {
    Key(Key, Action),
    Sync,
    Forwarded(RawEvent),
}

/// Sink that keeps everything it is given, in order.
///
/// Can be told to start failing after a number of writes to exercise
/// error paths.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<SinkRecord>,
    writes: usize,
    fail_after: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `writes` calls, then fail every later one.
    pub fn failing_after(writes: usize) -> Self {
        Self {
            fail_after: Some(writes),
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[SinkRecord] {
        &self.records
    }

    /// Events passed through unchanged.
    pub fn forwarded(&self) -> Vec<RawEvent> {
        self.records
            .iter()
            .filter_map(|r| match r {
                SinkRecord::Forwarded(event) => Some(*event),
                _ => None,
            })
            .collect()
    }

    /// Synthetic key actions, without their sync markers.
    pub fn strokes(&self) -> Vec<KeyStroke> {
        self.records
            .iter()
            .filter_map(|r| match r {
                SinkRecord::Key(key, action) => Some(KeyStroke {
                    key: *key,
                    action: *action,
                }),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    fn check_write(&mut self) -> Result<(), OutputError> {
        if let Some(limit) = self.fail_after {
            if self.writes >= limit {
                return Err(OutputError::Write(format!(
                    "memory sink refused write #{}",
                    self.writes + 1
                )));
            }
        }
        self.writes += 1;
        Ok(())
    }
}

impl KeySink for MemorySink {
    fn send_key(&mut self, key: Key, action: Action) -> Result<(), OutputError> {
        self.check_write()?;
        self.records.push(SinkRecord::Key(key, action));
        self.records.push(SinkRecord::Sync);
        Ok(())
    }

    fn forward(&mut self, event: &RawEvent) -> Result<(), OutputError> {
        self.check_write()?;
        self.records.push(SinkRecord::Forwarded(*event));
        Ok(())
    }
}
