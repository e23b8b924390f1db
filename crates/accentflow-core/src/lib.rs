// AccentFlow Core Library
// Accent composition pipeline: raw key events in, forwarded or injected keys out

pub mod action;
pub mod compose;
pub mod config;
pub mod error;
pub mod feedback;
pub mod input;
pub mod key;
pub mod mapping;
pub mod output;
pub mod pipeline;

pub use action::Action;
pub use compose::{CompositionState, EventRouter, RouteOutcome, DEFAULT_TRIGGER};
pub use config::{default_config_content, Config, ConfigError};
pub use error::{AccentError, AccentResult};
pub use feedback::{DisplayMode, Feedback, LogFeedback, NullFeedback, TerminalFeedback};
pub use input::{
    is_keyboard, is_virtual_device, DeviceCapabilities, DeviceSelector, EventSource, RawEvent,
    ReplaySource, SourceError,
};
pub use key::Key;
pub use mapping::{select, MappingEntry, MappingTable};
pub use output::{DecodeError, KeySink, MemorySink, OutputError, UnicodeEntryKeys};
pub use pipeline::{Pipeline, PipelineStats};

#[cfg(feature = "pure-rust")]
pub use input::{DeviceInfo, EvdevSource};
#[cfg(feature = "pure-rust")]
pub use output::VirtualDevice;
