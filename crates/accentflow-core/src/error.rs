// AccentFlow Errors
// Top-level error kinds and how severe each one is

use crate::config::ConfigError;
use crate::input::SourceError;
use crate::output::{DecodeError, OutputError};

/// Every failure the pipeline can report.
#[derive(Debug, thiserror::Error)]
pub enum AccentError {
    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[from] ConfigError),

    #[error("Failed to acquire device: {0}")]
    DeviceAcquisition(String),

    #[error("Invalid variant text: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to inject key events: {0}")]
    Injection(String),

    #[error("Failed to read input: {0}")]
    Read(String),
}

impl AccentError {
    /// Whether the run has to stop. Only decode failures are survivable.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AccentError::Decode(_))
    }
}

impl From<SourceError> for AccentError {
    fn from(err: SourceError) -> Self {
        if err.is_acquisition() {
            AccentError::DeviceAcquisition(err.to_string())
        } else {
            AccentError::Read(err.to_string())
        }
    }
}

impl From<OutputError> for AccentError {
    fn from(err: OutputError) -> Self {
        match err {
            OutputError::DeviceCreation(_) => AccentError::DeviceAcquisition(err.to_string()),
            OutputError::Write(_) => AccentError::Injection(err.to_string()),
        }
    }
}

pub type AccentResult<T> = Result<T, AccentError>;
