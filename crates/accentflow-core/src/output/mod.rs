// AccentFlow Output Layer
// Output sinks and the Unicode injection protocol

mod frame;
mod memory;
mod sink;
mod state;
mod unicode;

#[cfg(feature = "pure-rust")]
mod uinput;

pub use frame::FrameBuffer;
pub use memory::{MemorySink, SinkRecord};
pub use sink::{KeySink, OutputError};
pub use state::HeldKeys;
pub use unicode::{
    decode_codepoint, hex_digits, ChordPlan, DecodeError, InjectError, KeyStroke, UnicodeEntryKeys,
};

#[cfg(feature = "pure-rust")]
pub use uinput::VirtualDevice;
