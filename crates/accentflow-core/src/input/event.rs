// AccentFlow Input Layer - Raw Events
// Fixed-size event records as read from an input device

use crate::{Action, Key};

/// EV_SYN event type code
pub const EV_SYN: u16 = 0x00;
/// EV_KEY event type code
pub const EV_KEY: u16 = 0x01;
/// EV_MSC event type code
pub const EV_MSC: u16 = 0x04;
/// SYN_REPORT code within EV_SYN
pub const SYN_REPORT: u16 = 0x00;

/// Coarse classification of a raw event.
///
/// Only key events take part in composition; every other type is carried
/// through untouched with its original type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Key,
    Other(u16),
}

impl EventKind {
    pub fn from_type(event_type: u16) -> Self {
        if event_type == EV_KEY {
            EventKind::Key
        } else {
            EventKind::Other(event_type)
        }
    }

    pub fn event_type(self) -> u16 {
        match self {
            EventKind::Key => EV_KEY,
            EventKind::Other(t) => t,
        }
    }
}

/// One record from the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawEvent {
    pub kind: EventKind,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    pub fn new(event_type: u16, code: u16, value: i32) -> Self {
        Self {
            kind: EventKind::from_type(event_type),
            code,
            value,
        }
    }

    /// A key event for `key` carrying `action`.
    pub fn key(key: Key, action: Action) -> Self {
        Self::new(EV_KEY, key.code(), action.to_i32())
    }

    /// The SYN_REPORT marker that closes an event frame.
    pub fn syn_report() -> Self {
        Self::new(EV_SYN, SYN_REPORT, 0)
    }

    pub fn event_type(&self) -> u16 {
        self.kind.event_type()
    }

    pub fn is_key(&self) -> bool {
        self.kind == EventKind::Key
    }

    /// Key and action, when this is a key event with a recognised value.
    pub fn key_action(&self) -> Option<(Key, Action)> {
        if !self.is_key() {
            return None;
        }
        Action::from_i32(self.value).map(|action| (Key::from(self.code), action))
    }
}

#[cfg(feature = "pure-rust")]
impl From<evdev::InputEvent> for RawEvent {
    fn from(event: evdev::InputEvent) -> Self {
        RawEvent::new(event.event_type().0, event.code(), event.value())
    }
}

#[cfg(feature = "pure-rust")]
impl From<&RawEvent> for evdev::InputEvent {
    fn from(event: &RawEvent) -> Self {
        evdev::InputEvent::new(evdev::EventType(event.event_type()), event.code, event.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_type() {
        assert_eq!(EventKind::from_type(EV_KEY), EventKind::Key);
        assert_eq!(EventKind::from_type(EV_SYN), EventKind::Other(EV_SYN));
        assert_eq!(EventKind::Other(EV_MSC).event_type(), EV_MSC);
    }

    #[test]
    fn test_key_action_decoding() {
        let press = RawEvent::key(Key::E, Action::Press);
        assert_eq!(press.key_action(), Some((Key::E, Action::Press)));

        // Scan codes share the code field but are not key events.
        let scan = RawEvent::new(EV_MSC, 4, 0x70008);
        assert_eq!(scan.key_action(), None);

        let odd_value = RawEvent::new(EV_KEY, Key::E.code(), 7);
        assert!(odd_value.is_key());
        assert_eq!(odd_value.key_action(), None);
    }

    #[test]
    fn test_syn_report() {
        let syn = RawEvent::syn_report();
        assert_eq!(syn.event_type(), EV_SYN);
        assert_eq!(syn.code, SYN_REPORT);
        assert!(!syn.is_key());
    }
}
