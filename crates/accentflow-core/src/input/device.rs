// AccentFlow Input Layer - Device Detection
// Keyboard detection and input device selection

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Name prefix of the virtual keyboard this program creates.
///
/// Autodetection skips any device carrying it so the daemon never reads back
/// its own output.
pub const VIRTUAL_DEVICE_PREFIX: &str = "AccentFlow (virtual)";

/// Device capabilities extracted from evdev device.capabilities()
#[derive(Debug, Clone)]
pub struct DeviceCapabilities {
    /// Whether the device supports EV_KEY events
    pub has_ev_key: bool,
    /// Supported key codes
    pub supported_keys: HashSet<u16>,
}

impl DeviceCapabilities {
    pub fn new(has_ev_key: bool, supported_keys: impl IntoIterator<Item = u16>) -> Self {
        Self {
            has_ev_key,
            supported_keys: supported_keys.into_iter().collect(),
        }
    }

    pub fn supports_key(&self, key_code: u16) -> bool {
        self.supported_keys.contains(&key_code)
    }
}

// Q W E R T Y
const QWERTY_CODES: &[u16] = &[16, 17, 18, 19, 20, 21];
// SPACE A Z
const A_Z_SPACE_CODES: &[u16] = &[57, 30, 44];

/// A device is a keyboard when it reports EV_KEY and has the whole QWERTY
/// row plus A, Z and SPACE. Mice and media remotes fail the letter check.
pub fn is_keyboard(capabilities: &DeviceCapabilities) -> bool {
    capabilities.has_ev_key
        && QWERTY_CODES
            .iter()
            .chain(A_Z_SPACE_CODES)
            .all(|code| capabilities.supports_key(*code))
}

pub fn is_virtual_device(name: &str) -> bool {
    name.contains(VIRTUAL_DEVICE_PREFIX)
}

/// How the input device is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceSelector {
    /// An explicit `/dev/input/eventN` node.
    Path(PathBuf),
    /// The device whose reported name matches exactly.
    Name(String),
    /// First physical keyboard found.
    Autodetect,
}

impl DeviceSelector {
    /// Interpret a user-supplied device string. Anything that looks like a
    /// filesystem path is a path; other text is a device name.
    pub fn parse(spec: Option<&str>) -> Self {
        match spec.map(str::trim) {
            None | Some("") => DeviceSelector::Autodetect,
            Some(s) if s.starts_with('/') || s.starts_with('.') => {
                DeviceSelector::Path(PathBuf::from(s))
            }
            Some(s) => DeviceSelector::Name(s.to_string()),
        }
    }

    /// Whether a discovered device satisfies this selector.
    pub fn matches(&self, name: &str, path: &Path, capabilities: &DeviceCapabilities) -> bool {
        match self {
            DeviceSelector::Path(wanted) => wanted == path,
            DeviceSelector::Name(wanted) => wanted == name,
            DeviceSelector::Autodetect => !is_virtual_device(name) && is_keyboard(capabilities),
        }
    }
}
