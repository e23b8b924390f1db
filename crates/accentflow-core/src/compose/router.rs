// AccentFlow Event Router
// Per-event intercept-or-forward decision

use super::state::{effective_index, CompositionState};
use crate::feedback::Feedback;
use crate::input::RawEvent;
use crate::mapping::{select, MappingTable};
use crate::output::{DecodeError, HeldKeys, InjectError, KeySink, OutputError, UnicodeEntryKeys};
use crate::{Action, Key};

/// Default accent-mode trigger.
pub const DEFAULT_TRIGGER: Key = Key::RIGHT_ALT;

/// What the router did with one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Written to the sink unchanged.
    Forwarded,
    /// Swallowed without output.
    Consumed,
    /// An accentable key was struck; the preview now shows `index`.
    Previewed { base: char, index: usize },
    /// The trigger was released and this text was injected.
    Committed(String),
    /// The selected variant could not be decoded; nothing was injected.
    Dropped { text: String, error: DecodeError },
}

/// Classifies raw events and drives composition, injection and feedback.
///
/// Holds the only [`CompositionState`] of a pipeline. Events must be routed
/// one at a time, in arrival order.
pub struct EventRouter<'a, S: KeySink, F: Feedback> {
    table: &'a MappingTable,
    trigger: Key,
    unicode: UnicodeEntryKeys,
    state: CompositionState,
    /// Modifiers forwarded as pressed and not yet released.
    modifiers: HeldKeys,
    sink: S,
    feedback: F,
}

impl<'a, S: KeySink, F: Feedback> EventRouter<'a, S, F> {
    pub fn new(table: &'a MappingTable, sink: S, feedback: F) -> Self {
        Self {
            table,
            trigger: DEFAULT_TRIGGER,
            unicode: UnicodeEntryKeys::default(),
            state: CompositionState::new(),
            modifiers: HeldKeys::new(),
            sink,
            feedback,
        }
    }

    pub fn with_trigger(mut self, trigger: Key) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_unicode_keys(mut self, unicode: UnicodeEntryKeys) -> Self {
        self.unicode = unicode;
        self
    }

    pub fn trigger(&self) -> Key {
        self.trigger
    }

    pub fn state(&self) -> &CompositionState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn into_parts(self) -> (S, F) {
        (self.sink, self.feedback)
    }

    fn shift_pressed(&self) -> bool {
        self.modifiers.contains_any(Key::is_shift)
    }

    /// Route one event.
    ///
    /// Only sink write failures are returned; they leave the output device
    /// in an unknown state and should end the run.
    pub fn route(&mut self, event: &RawEvent) -> Result<RouteOutcome, OutputError> {
        let Some((key, action)) = event.key_action() else {
            self.sink.forward(event)?;
            return Ok(RouteOutcome::Forwarded);
        };
        if key == self.trigger {
            return self.route_trigger(action);
        }
        if key.is_modifier() {
            self.modifiers.apply(key, action);
        }

        // A repeat only strikes the key being composed; keys already down
        // before the trigger keep flowing through.
        let strikes = match action {
            Action::Press => true,
            Action::Repeat => self.state.suppresses(key),
            Action::Release => false,
        };
        if self.state.is_armed() && strikes {
            if let Some((base, variants)) = self.lookup(key) {
                let raw = self.state.strike(key, base);
                let index = effective_index(raw, variants.len());
                log::debug!("Accent key {} -> '{}' variant {}", key, base, index);
                self.feedback.show_options(base, variants, index);
                return Ok(RouteOutcome::Previewed { base, index });
            }
        }

        if action != Action::Press && self.state.suppresses(key) {
            return Ok(RouteOutcome::Consumed);
        }

        self.sink.forward(event)?;
        Ok(RouteOutcome::Forwarded)
    }

    fn route_trigger(&mut self, action: Action) -> Result<RouteOutcome, OutputError> {
        match action {
            Action::Press => {
                log::debug!("Accent mode engaged");
                self.state.arm();
                self.feedback.clear();
                Ok(RouteOutcome::Consumed)
            }
            Action::Release if self.state.is_armed() => {
                log::debug!("Accent mode released");
                let result = self.commit();
                self.feedback.clear();
                result
            }
            _ => Ok(RouteOutcome::Consumed),
        }
    }

    fn commit(&mut self) -> Result<RouteOutcome, OutputError> {
        let Some(active) = self.state.disarm() else {
            return Ok(RouteOutcome::Consumed);
        };
        let table = self.table;
        let Some(text) = table
            .variants_for(active.base)
            .and_then(|variants| select(variants, active.variant_index))
        else {
            return Ok(RouteOutcome::Consumed);
        };

        let held = self.modifiers.keys();
        match self.unicode.inject(&mut self.sink, text, &held) {
            Ok(codepoint) => {
                log::info!("Committed '{}' (U+{:04X})", text, codepoint);
                self.feedback.show_committed(text);
                Ok(RouteOutcome::Committed(text.to_string()))
            }
            Err(InjectError::Decode(error)) => {
                log::warn!("Dropping variant {:?} for '{}': {}", text, active.base, error);
                Ok(RouteOutcome::Dropped {
                    text: text.to_string(),
                    error,
                })
            }
            Err(InjectError::Output(e)) => Err(e),
        }
    }

    /// Base and variants for `key`, trying the uppercase base first while
    /// Shift is held.
    fn lookup(&self, key: Key) -> Option<(char, &'a [String])> {
        let table = self.table;
        let base = table.base_for(key)?;
        if self.shift_pressed() {
            let upper = base.to_ascii_uppercase();
            if upper != base {
                if let Some(variants) = table.variants_for(upper) {
                    return Some((upper, variants));
                }
            }
        }
        table.variants_for(base).map(|variants| (base, variants))
    }
}
