// AccentFlow Key Type
// Linux input-event-codes.h key codes and the accentable key alphabet

use std::fmt;
use std::str::FromStr;

/// Represents a single keyboard key code.
///
/// This is a newtype wrapper around u16 for type safety.
/// The numeric values match Linux input-event-codes.h definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Key(pub u16);

impl Key {
    pub const ESC: Key = Key(1);
    pub const KEY_1: Key = Key(2);
    pub const KEY_9: Key = Key(10);
    pub const KEY_0: Key = Key(11);
    pub const MINUS: Key = Key(12);
    pub const EQUAL: Key = Key(13);
    pub const E: Key = Key(18);
    pub const U: Key = Key(22);
    pub const ENTER: Key = Key(28);
    pub const LEFT_CTRL: Key = Key(29);
    pub const A: Key = Key(30);
    pub const LEFT_SHIFT: Key = Key(42);
    pub const RIGHT_SHIFT: Key = Key(54);
    pub const LEFT_ALT: Key = Key(56);
    pub const SPACE: Key = Key(57);
    pub const RIGHT_CTRL: Key = Key(97);
    pub const RIGHT_ALT: Key = Key(100);
    pub const LEFT_META: Key = Key(125);
    pub const RIGHT_META: Key = Key(126);
    /// Highest code the virtual keyboard advertises (KEY_MICMUTE).
    pub const MICMUTE: Key = Key(248);

    /// Get the raw numeric code value
    pub fn code(self) -> u16 {
        self.0
    }

    /// Get the name of this key
    pub fn name(self) -> &'static str {
        key_name(self.0)
    }

    /// True for either Shift key.
    pub fn is_shift(self) -> bool {
        self == Key::LEFT_SHIFT || self == Key::RIGHT_SHIFT
    }

    /// Ctrl, Shift, Alt or Meta on either side.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Key::LEFT_CTRL
                | Key::RIGHT_CTRL
                | Key::LEFT_SHIFT
                | Key::RIGHT_SHIFT
                | Key::LEFT_ALT
                | Key::RIGHT_ALT
                | Key::LEFT_META
                | Key::RIGHT_META
        )
    }
}

impl From<u16> for Key {
    fn from(code: u16) -> Self {
        Key(code)
    }
}

impl From<Key> for u16 {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        key_from_name(s).ok_or_else(|| format!("Unknown key: {}", s))
    }
}

// Canonical names first; `key_name` reports the first entry for a code.
const KEY_NAMES: &[(&str, u16)] = &[
    ("RESERVED", 0),
    ("ESC", 1),
    ("KEY_1", 2),
    ("KEY_2", 3),
    ("KEY_3", 4),
    ("KEY_4", 5),
    ("KEY_5", 6),
    ("KEY_6", 7),
    ("KEY_7", 8),
    ("KEY_8", 9),
    ("KEY_9", 10),
    ("KEY_0", 11),
    ("MINUS", 12),
    ("EQUAL", 13),
    ("BACKSPACE", 14),
    ("TAB", 15),
    ("Q", 16),
    ("W", 17),
    ("E", 18),
    ("R", 19),
    ("T", 20),
    ("Y", 21),
    ("U", 22),
    ("I", 23),
    ("O", 24),
    ("P", 25),
    ("LEFT_BRACE", 26),
    ("RIGHT_BRACE", 27),
    ("ENTER", 28),
    ("LEFT_CTRL", 29),
    ("A", 30),
    ("S", 31),
    ("D", 32),
    ("F", 33),
    ("G", 34),
    ("H", 35),
    ("J", 36),
    ("K", 37),
    ("L", 38),
    ("SEMICOLON", 39),
    ("APOSTROPHE", 40),
    ("GRAVE", 41),
    ("LEFT_SHIFT", 42),
    ("BACKSLASH", 43),
    ("Z", 44),
    ("X", 45),
    ("C", 46),
    ("V", 47),
    ("B", 48),
    ("N", 49),
    ("M", 50),
    ("COMMA", 51),
    ("DOT", 52),
    ("SLASH", 53),
    ("RIGHT_SHIFT", 54),
    ("LEFT_ALT", 56),
    ("SPACE", 57),
    ("CAPSLOCK", 58),
    ("F1", 59),
    ("F2", 60),
    ("F3", 61),
    ("F4", 62),
    ("F5", 63),
    ("F6", 64),
    ("F7", 65),
    ("F8", 66),
    ("F9", 67),
    ("F10", 68),
    ("SCROLLLOCK", 70),
    ("F11", 87),
    ("F12", 88),
    ("RIGHT_CTRL", 97),
    ("RIGHT_ALT", 100),
    ("HOME", 102),
    ("UP", 103),
    ("PAGE_UP", 104),
    ("LEFT", 105),
    ("RIGHT", 106),
    ("END", 107),
    ("DOWN", 108),
    ("PAGE_DOWN", 109),
    ("INSERT", 110),
    ("DELETE", 111),
    ("PAUSE", 119),
    ("LEFT_META", 125),
    ("RIGHT_META", 126),
    ("COMPOSE", 127),
    ("MENU", 139),
    ("F13", 183),
    ("F14", 184),
    ("F15", 185),
    ("F16", 186),
    ("F17", 187),
    ("F18", 188),
    ("F19", 189),
    ("F20", 190),
    ("F21", 191),
    ("F22", 192),
    ("F23", 193),
    ("F24", 194),
    ("MICMUTE", 248),
];

const KEY_ALIASES: &[(&str, u16)] = &[
    ("ESCAPE", 1),
    ("1", 2),
    ("2", 3),
    ("3", 4),
    ("4", 5),
    ("5", 6),
    ("6", 7),
    ("7", 8),
    ("8", 9),
    ("9", 10),
    ("0", 11),
    ("LEFTCTRL", 29),
    ("LEFTSHIFT", 42),
    ("RIGHTSHIFT", 54),
    ("LEFTALT", 56),
    ("RIGHTCTRL", 97),
    ("RIGHTALT", 100),
    ("ALTGR", 100),
    ("LEFTMETA", 125),
    ("RIGHTMETA", 126),
];

/// Display name for a key code
pub fn key_name(code: u16) -> &'static str {
    KEY_NAMES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
        .unwrap_or("UNKNOWN")
}

/// Try to parse a key name to a key code.
///
/// Matching is case-insensitive and accepts an optional `KEY_` prefix on
/// letter keys, so `e`, `E` and `KEY_E` all resolve to the same code.
pub fn key_from_name(name: &str) -> Option<Key> {
    let upper = name.trim().to_uppercase();
    let lookup = |candidate: &str| {
        KEY_NAMES
            .iter()
            .chain(KEY_ALIASES)
            .find(|(n, _)| *n == candidate)
            .map(|(_, code)| Key(*code))
    };

    lookup(&upper).or_else(|| upper.strip_prefix("KEY_").and_then(lookup))
}

// Physical keys that can start a composition, with the base character each
// one stands for on a US layout.
const ACCENTABLE_KEYS: &[(u16, char)] = &[
    (30, 'a'),
    (48, 'b'),
    (46, 'c'),
    (32, 'd'),
    (18, 'e'),
    (33, 'f'),
    (34, 'g'),
    (35, 'h'),
    (23, 'i'),
    (36, 'j'),
    (37, 'k'),
    (38, 'l'),
    (50, 'm'),
    (49, 'n'),
    (24, 'o'),
    (25, 'p'),
    (16, 'q'),
    (19, 'r'),
    (31, 's'),
    (20, 't'),
    (22, 'u'),
    (47, 'v'),
    (17, 'w'),
    (45, 'x'),
    (21, 'y'),
    (44, 'z'),
    (40, '\''),
    (39, ';'),
    (41, '`'),
    (26, '['),
    (27, ']'),
    (12, '-'),
    (13, '='),
];

/// Base character a physical key represents, if it is accentable.
pub fn key_to_base(key: Key) -> Option<char> {
    ACCENTABLE_KEYS
        .iter()
        .find(|(code, _)| *code == key.code())
        .map(|(_, base)| *base)
}

/// Reverse of [`key_to_base`].
pub fn base_to_key(base: char) -> Option<Key> {
    let base = base.to_ascii_lowercase();
    ACCENTABLE_KEYS
        .iter()
        .find(|(_, b)| *b == base)
        .map(|(code, _)| Key(*code))
}
