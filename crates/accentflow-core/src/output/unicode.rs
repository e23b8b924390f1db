// AccentFlow Unicode Injection
// Types arbitrary code points through the Ctrl+Shift+U entry convention

use smallvec::SmallVec;

use super::sink::{KeySink, OutputError};
use crate::key::key_from_name;
use crate::{Action, Key};

/// A single synthetic key action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub key: Key,
    pub action: Action,
}

impl KeyStroke {
    pub fn press(key: Key) -> Self {
        Self {
            key,
            action: Action::Press,
        }
    }

    pub fn release(key: Key) -> Self {
        Self {
            key,
            action: Action::Release,
        }
    }
}

/// Worst case: 6 prefix strokes, 6 hex digits tapped, confirm tapped.
pub type ChordPlan = SmallVec<[KeyStroke; 20]>;

/// Why a variant string could not be turned into a code point.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("empty text has no code point")]
    Empty,

    #[error("invalid leading byte 0x{0:02x}")]
    InvalidLeadByte(u8),

    #[error("truncated sequence: {expected}-byte encoding but only {found} byte(s)")]
    Truncated { expected: usize, found: usize },

    #[error("invalid continuation byte 0x{0:02x}")]
    InvalidContinuation(u8),

    #[error("0x{0:X} is not a Unicode scalar value")]
    NotScalar(u32),
}

/// Failure of a whole injection.
#[derive(Debug, thiserror::Error)]
pub enum InjectError {
    /// Nothing was written.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Part of the chord may already be on the wire.
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Decode the leading UTF-8 sequence of `bytes`.
///
/// Returns the code point and how many bytes it occupied.
pub fn decode_codepoint(bytes: &[u8]) -> Result<(u32, usize), DecodeError> {
    let (&lead, rest) = bytes.split_first().ok_or(DecodeError::Empty)?;

    let (len, initial) = match lead {
        0x00..=0x7F => return Ok((lead as u32, 1)),
        b if b & 0xE0 == 0xC0 => (2, (b & 0x1F) as u32),
        b if b & 0xF0 == 0xE0 => (3, (b & 0x0F) as u32),
        b if b & 0xF8 == 0xF0 => (4, (b & 0x07) as u32),
        b => return Err(DecodeError::InvalidLeadByte(b)),
    };

    let continuation = rest.get(..len - 1).ok_or(DecodeError::Truncated {
        expected: len,
        found: bytes.len(),
    })?;

    let mut codepoint = initial;
    for &byte in continuation {
        if byte & 0xC0 != 0x80 {
            return Err(DecodeError::InvalidContinuation(byte));
        }
        codepoint = (codepoint << 6) | (byte & 0x3F) as u32;
    }

    match char::from_u32(codepoint) {
        Some(_) => Ok((codepoint, len)),
        None => Err(DecodeError::NotScalar(codepoint)),
    }
}

/// Lowercase hexadecimal rendering typed after the combinator.
pub fn hex_digits(codepoint: u32) -> String {
    format!("{codepoint:x}")
}

fn digit_key(digit: char) -> Key {
    let name = digit.to_ascii_lowercase().to_string();
    match key_from_name(&name) {
        Some(key) if digit.is_ascii_hexdigit() => key,
        _ => unreachable!("{digit:?} cannot appear in a hexadecimal rendering"),
    }
}

/// Keys used by the desktop's Unicode entry mode.
///
/// The two modifiers are held while the combinator is tapped, then the hex
/// digits are typed and the confirm key commits the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnicodeEntryKeys {
    pub modifiers: [Key; 2],
    pub combinator: Key,
    pub confirm: Key,
}

impl Default for UnicodeEntryKeys {
    fn default() -> Self {
        Self {
            modifiers: [Key::LEFT_CTRL, Key::LEFT_SHIFT],
            combinator: Key::U,
            confirm: Key::ENTER,
        }
    }
}

impl UnicodeEntryKeys {
    /// Every key stroke needed to type `codepoint`, in emission order.
    pub fn plan(&self, codepoint: u32) -> ChordPlan {
        let [first, second] = self.modifiers;
        let mut plan = ChordPlan::new();

        plan.push(KeyStroke::press(first));
        plan.push(KeyStroke::press(second));
        plan.push(KeyStroke::press(self.combinator));
        plan.push(KeyStroke::release(self.combinator));
        plan.push(KeyStroke::release(first));
        plan.push(KeyStroke::release(second));

        for digit in hex_digits(codepoint).chars() {
            let key = digit_key(digit);
            plan.push(KeyStroke::press(key));
            plan.push(KeyStroke::release(key));
        }

        plan.push(KeyStroke::press(self.confirm));
        plan.push(KeyStroke::release(self.confirm));
        plan
    }

    /// Like [`plan`](Self::plan), but lifts `held` output keys first and
    /// presses them again after the confirm key.
    pub fn plan_with_held(&self, codepoint: u32, held: &[Key]) -> ChordPlan {
        let mut plan: ChordPlan = held.iter().rev().map(|&key| KeyStroke::release(key)).collect();
        plan.extend(self.plan(codepoint));
        plan.extend(held.iter().map(|&key| KeyStroke::press(key)));
        plan
    }

    /// Decode the leading character of `text` and plan its chord around the
    /// keys in `held`.
    pub fn plan_text(&self, text: &str, held: &[Key]) -> Result<(u32, ChordPlan), DecodeError> {
        let (codepoint, len) = decode_codepoint(text.as_bytes())?;
        if len < text.len() {
            log::debug!("Only the first code point of {:?} is injected", text);
        }
        Ok((codepoint, self.plan_with_held(codepoint, held)))
    }

    /// Type the leading character of `text` into `sink`.
    ///
    /// `held` are keys the sink currently reports as down; they are released
    /// for the duration of the chord. A decode failure writes nothing. A
    /// write failure stops immediately; strokes already sent stay sent.
    pub fn inject<S: KeySink + ?Sized>(
        &self,
        sink: &mut S,
        text: &str,
        held: &[Key],
    ) -> Result<u32, InjectError> {
        let (codepoint, plan) = self.plan_text(text, held)?;
        for stroke in plan {
            sink.send_key(stroke.key, stroke.action)?;
        }
        Ok(codepoint)
    }
}
