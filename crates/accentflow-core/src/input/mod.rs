// AccentFlow Input Layer
// Raw event model, device detection and event sources

mod device;
mod event;
mod source;

#[cfg(feature = "pure-rust")]
mod evdev_source;

pub use device::{
    is_keyboard, is_virtual_device, DeviceCapabilities, DeviceSelector, VIRTUAL_DEVICE_PREFIX,
};
pub use event::{EventKind, RawEvent, EV_KEY, EV_MSC, EV_SYN, SYN_REPORT};
pub use source::{EventSource, ReplaySource, SourceError};

#[cfg(feature = "pure-rust")]
pub use evdev_source::{DeviceInfo, EvdevSource};
