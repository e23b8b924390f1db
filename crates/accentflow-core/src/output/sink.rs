// AccentFlow Output Layer - Sink Contract
// The write side of the pipeline

use crate::input::RawEvent;
use crate::{Action, Key};

/// Error types for output operations
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to create virtual device: {0}")]
    DeviceCreation(String),

    #[error("Failed to write event: {0}")]
    Write(String),
}

/// Anything that accepts synthetic and forwarded key events.
pub trait KeySink {
    /// Emit one key action, immediately followed by a synchronization
    /// report so the downstream stack processes it on its own.
    fn send_key(&mut self, key: Key, action: Action) -> Result<(), OutputError>;

    /// Pass an event from the input source through unchanged.
    fn forward(&mut self, event: &RawEvent) -> Result<(), OutputError>;
}

impl<T: KeySink + ?Sized> KeySink for &mut T {
    fn send_key(&mut self, key: Key, action: Action) -> Result<(), OutputError> {
        (**self).send_key(key, action)
    }

    fn forward(&mut self, event: &RawEvent) -> Result<(), OutputError> {
        (**self).forward(event)
    }
}

impl<T: KeySink + ?Sized> KeySink for Box<T> {
    fn send_key(&mut self, key: Key, action: Action) -> Result<(), OutputError> {
        (**self).send_key(key, action)
    }

    fn forward(&mut self, event: &RawEvent) -> Result<(), OutputError> {
        (**self).forward(event)
    }
}
