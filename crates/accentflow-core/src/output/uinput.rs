// AccentFlow Pure Rust uinput Output Layer
// Virtual keyboard creation, forwarding and synthetic key emission

use std::sync::OnceLock;

use evdev::uinput::VirtualDeviceBuilder;
use evdev::{AttributeSet, BusType, EventType, InputEvent, InputId};

use super::frame::FrameBuffer;
use super::sink::{KeySink, OutputError};
use super::state::HeldKeys;
use crate::input::{RawEvent, VIRTUAL_DEVICE_PREFIX};
use crate::{Action, Key};

/// Virtual uinput keyboard the pipeline writes to.
///
/// Dropping it closes the uinput handle, which destroys the device.
pub struct VirtualDevice {
    device: evdev::uinput::VirtualDevice,
    held: HeldKeys,
    frame: FrameBuffer,
}

impl VirtualDevice {
    fn debug_output_enabled() -> bool {
        static DEBUG_OUTPUT: OnceLock<bool> = OnceLock::new();
        *DEBUG_OUTPUT.get_or_init(|| {
            std::env::var("ACCENTFLOW_DEBUG_OUTPUT")
                .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "yes" | "on"))
                .unwrap_or(false)
        })
    }

    /// Create the virtual keyboard.
    pub fn new() -> Result<Self, OutputError> {
        let mut keys = AttributeSet::new();
        for code in Key::ESC.code()..=Key::MICMUTE.code() {
            keys.insert(evdev::Key::new(code));
        }

        let name = format!("{} Keyboard", VIRTUAL_DEVICE_PREFIX);
        let device = VirtualDeviceBuilder::new()
            .map_err(|e: std::io::Error| OutputError::DeviceCreation(e.to_string()))?
            .name(&name)
            .input_id(InputId::new(BusType::BUS_USB, 0x1fed, 0x0001, 1))
            .with_keys(&keys)
            .map_err(|e: std::io::Error| OutputError::DeviceCreation(e.to_string()))?
            .build()
            .map_err(|e: std::io::Error| OutputError::DeviceCreation(e.to_string()))?;

        log::info!("Created virtual keyboard '{}'", name);

        Ok(Self {
            device,
            held: HeldKeys::new(),
            frame: FrameBuffer::new(),
        })
    }

    // `emit` terminates every batch with its own SYN_REPORT.
    fn emit(&mut self, events: &[InputEvent]) -> Result<(), OutputError> {
        self.device
            .emit(events)
            .map_err(|e: std::io::Error| OutputError::Write(e.to_string()))
    }

    fn emit_frame(&mut self, frame: Vec<RawEvent>) -> Result<(), OutputError> {
        if frame.is_empty() {
            return Ok(());
        }
        let events: Vec<InputEvent> = frame.iter().map(InputEvent::from).collect();
        self.emit(&events)?;
        for (key, action) in frame.iter().filter_map(RawEvent::key_action) {
            self.held.apply(key, action);
        }
        Ok(())
    }

    /// Write out a forwarded frame the source has not closed yet.
    fn flush_pending(&mut self) -> Result<(), OutputError> {
        let frame = self.frame.take();
        self.emit_frame(frame)
    }

    /// Release every key this device still reports as down.
    pub fn release_all(&mut self) -> Result<(), OutputError> {
        self.flush_pending()?;
        for key in self.held.drain() {
            self.emit(&[InputEvent::new(EventType::KEY, key.code(), Action::Release.to_i32())])?;
        }
        Ok(())
    }

    pub fn held_key_count(&self) -> usize {
        self.held.len()
    }

    /// Release held keys, then destroy the device.
    pub fn close(mut self) -> Result<(), OutputError> {
        self.release_all()
    }
}

impl KeySink for VirtualDevice {
    fn send_key(&mut self, key: Key, action: Action) -> Result<(), OutputError> {
        if Self::debug_output_enabled() {
            eprintln!("[OUTPUT-DEBUG] send_key key={} action={}", key, action);
        }
        self.flush_pending()?;
        self.emit(&[InputEvent::new(EventType::KEY, key.code(), action.to_i32())])?;
        self.held.apply(key, action);
        Ok(())
    }

    fn forward(&mut self, event: &RawEvent) -> Result<(), OutputError> {
        match self.frame.push(*event) {
            Some(frame) => self.emit_frame(frame),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_device_creation() {
        // Needs write access to /dev/uinput, which CI containers lack.
        match VirtualDevice::new() {
            Ok(device) => {
                assert_eq!(device.held_key_count(), 0);
                device.close().unwrap();
            }
            Err(OutputError::DeviceCreation(e)) => {
                println!("Skipping test: cannot create uinput device: {}", e);
            }
            Err(e) => panic!("Unexpected error: {}", e),
        }
    }
}
