// AccentFlow Pure Rust Input Source
// Direct evdev access to one physical keyboard, optionally grabbed

use std::collections::VecDeque;
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::Duration;

use evdev::{Device, EventType};

use super::device::{DeviceCapabilities, DeviceSelector};
use super::source::{EventSource, SourceError};
use super::RawEvent;

/// Device information for listing devices
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub index: usize,
    pub name: String,
    pub path: PathBuf,
}

/// Exclusive reader for a single evdev node.
///
/// Reads are driven by `poll(2)` so waiting for the next key costs nothing
/// and the caller still regains control at least once per timeout.
pub struct EvdevSource {
    device: Device,
    path: PathBuf,
    name: String,
    grabbed: bool,
    pending: VecDeque<RawEvent>,
}

impl EvdevSource {
    /// Open the device picked by `selector`, grabbing it when `grab` is set.
    pub fn acquire(selector: &DeviceSelector, grab: bool) -> Result<Self, SourceError> {
        let (path, device) = match selector {
            DeviceSelector::Path(path) => {
                let device = Device::open(path).map_err(|source| SourceError::Open {
                    path: path.clone(),
                    source,
                })?;
                (path.clone(), device)
            }
            DeviceSelector::Name(_) | DeviceSelector::Autodetect => discover(selector)?,
        };
        Self::from_device(path, device, grab)
    }

    fn from_device(path: PathBuf, mut device: Device, grab: bool) -> Result<Self, SourceError> {
        let name = device.name().unwrap_or("Unknown").to_string();

        if grab {
            // A previous instance that crashed may still hold the grab.
            let _ = device.ungrab();
            device.grab().map_err(|source| SourceError::Grab {
                path: path.clone(),
                source,
            })?;
        }

        log::info!(
            "Listening on {} ({}){}",
            path.display(),
            name,
            if grab { ", grabbed" } else { "" }
        );

        Ok(Self {
            device,
            path,
            name,
            grabbed: grab,
            pending: VecDeque::new(),
        })
    }

    /// List all keyboards that autodetection would consider.
    pub fn list_keyboards() -> Result<Vec<DeviceInfo>, SourceError> {
        let devices: Vec<DeviceInfo> = sorted_devices()
            .into_iter()
            .filter(|(path, device)| {
                DeviceSelector::Autodetect.matches(
                    device.name().unwrap_or(""),
                    path,
                    &capabilities(device),
                )
            })
            .enumerate()
            .map(|(index, (path, device))| DeviceInfo {
                index,
                name: device.name().unwrap_or("Unknown").to_string(),
                path,
            })
            .collect();
        Ok(devices)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    /// Hand the device back to the rest of the system.
    pub fn ungrab(&mut self) {
        if self.grabbed {
            if let Err(e) = self.device.ungrab() {
                log::warn!("Failed to release grab on {}: {}", self.path.display(), e);
            }
            self.grabbed = false;
        }
    }
}

impl EventSource for EvdevSource {
    fn next_event(&mut self, timeout: Duration) -> Result<Option<RawEvent>, SourceError> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }

        let mut fds = [libc::pollfd {
            fd: self.device.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        }];
        let timeout_ms = timeout.as_millis().min(i32::MAX as u128) as i32;

        let ready = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, timeout_ms) };
        if ready < 0 {
            let err = io::Error::last_os_error();
            // A signal (e.g. Ctrl+C) interrupted the wait. Let the caller
            // check its running flag.
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(None);
            }
            return Err(SourceError::Read(err));
        }
        if ready == 0 {
            return Ok(None);
        }

        let revents = fds[0].revents;
        if revents & libc::POLLIN == 0 && revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
            return Err(SourceError::Read(io::Error::new(
                io::ErrorKind::BrokenPipe,
                format!("{} disconnected", self.path.display()),
            )));
        }

        match self.device.fetch_events() {
            Ok(events) => self.pending.extend(events.map(RawEvent::from)),
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(None),
            Err(err) => return Err(SourceError::Read(err)),
        }

        Ok(self.pending.pop_front())
    }
}

/// Releases the grab on every exit path, unwinding included.
impl Drop for EvdevSource {
    fn drop(&mut self) {
        self.ungrab();
    }
}

fn discover(selector: &DeviceSelector) -> Result<(PathBuf, Device), SourceError> {
    sorted_devices()
        .into_iter()
        .find(|(path, device)| {
            selector.matches(device.name().unwrap_or(""), path, &capabilities(device))
        })
        .ok_or_else(|| {
            SourceError::DeviceNotFound(match selector {
                DeviceSelector::Name(name) => format!("No input device named '{}'", name),
                _ => "No keyboard devices found".to_string(),
            })
        })
}

// evdev::enumerate() follows readdir order; sort by event number so
// autodetection is stable across runs.
fn sorted_devices() -> Vec<(PathBuf, Device)> {
    let mut devices: Vec<(PathBuf, Device)> = evdev::enumerate().collect();
    devices.sort_by_key(|(path, _)| (event_number(path), path.clone()));
    devices
}

fn event_number(path: &Path) -> u32 {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix("event"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(u32::MAX)
}

fn capabilities(device: &Device) -> DeviceCapabilities {
    let has_ev_key = device.supported_events().contains(EventType::KEY);
    let keys: Vec<u16> = device
        .supported_keys()
        .map(|keys| keys.iter().map(|k| k.code()).collect())
        .unwrap_or_default();
    DeviceCapabilities::new(has_ev_key, keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::is_virtual_device;

    #[test]
    fn test_event_number() {
        assert_eq!(event_number(Path::new("/dev/input/event3")), 3);
        assert_eq!(event_number(Path::new("/dev/input/event12")), 12);
        assert_eq!(event_number(Path::new("/dev/input/mice")), u32::MAX);
    }

    #[test]
    fn test_missing_path_is_open_error() {
        let selector = DeviceSelector::Path(PathBuf::from("/dev/input/does-not-exist"));
        match EvdevSource::acquire(&selector, false) {
            Err(err) => assert!(err.is_acquisition()),
            Ok(_) => panic!("opened a device that does not exist"),
        }
    }

    #[test]
    fn test_list_keyboards_skips_virtual_devices() {
        // Containers usually expose no readable /dev/input nodes.
        let devices = EvdevSource::list_keyboards().unwrap();
        for device in &devices {
            assert!(!is_virtual_device(&device.name));
        }
    }
}
