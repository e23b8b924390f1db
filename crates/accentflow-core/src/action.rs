use std::fmt;

/// What a key event does to its key.
///
/// The discriminants are the `value` field of an evdev `EV_KEY` record:
///   0 == released
///   1 == pressed
///   2 == auto-repeated while held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Action {
    Release = 0,
    Press = 1,
    Repeat = 2,
}

impl Action {
    /// Decode an evdev value. Anything outside 0..=2 is not a key action.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Action::Release),
            1 => Some(Action::Press),
            2 => Some(Action::Repeat),
            _ => None,
        }
    }

    pub fn to_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Release => "release",
            Action::Press => "press",
            Action::Repeat => "repeat",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_value_mapping() {
        for action in [Action::Release, Action::Press, Action::Repeat] {
            assert_eq!(Action::from_i32(action.to_i32()), Some(action));
        }
        assert_eq!(Action::from_i32(3), None);
        assert_eq!(Action::from_i32(-1), None);
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Repeat.to_string(), "repeat");
    }
}
