// AccentFlow Feedback Port
// Ephemeral preview of the accent being composed

mod terminal;

use std::io;

pub use terminal::TerminalFeedback;

/// Where previews are rendered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::EnumString, strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum DisplayMode {
    #[default]
    #[strum(to_string = "terminal", serialize = "tui")]
    Terminal,
    #[strum(to_string = "log")]
    Log,
    #[strum(to_string = "none")]
    Disabled,
}

/// Renderer contract used by the router.
///
/// Every call is a full redraw. Rendering failures are the renderer's own
/// business and never reach the caller.
pub trait Feedback {
    fn show_options(&mut self, base: char, variants: &[String], active_index: usize);
    fn show_committed(&mut self, text: &str);
    fn clear(&mut self);
}

impl<T: Feedback + ?Sized> Feedback for Box<T> {
    fn show_options(&mut self, base: char, variants: &[String], active_index: usize) {
        (**self).show_options(base, variants, active_index)
    }

    fn show_committed(&mut self, text: &str) {
        (**self).show_committed(text)
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

impl<T: Feedback + ?Sized> Feedback for &mut T {
    fn show_options(&mut self, base: char, variants: &[String], active_index: usize) {
        (**self).show_options(base, variants, active_index)
    }

    fn show_committed(&mut self, text: &str) {
        (**self).show_committed(text)
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

/// Renderer for `mode`.
pub fn for_mode(mode: DisplayMode) -> Box<dyn Feedback> {
    match mode {
        DisplayMode::Terminal => Box::new(TerminalFeedback::new(io::stderr())),
        DisplayMode::Log => Box::new(LogFeedback),
        DisplayMode::Disabled => Box::new(NullFeedback),
    }
}

/// Writes previews to the log at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl Feedback for LogFeedback {
    fn show_options(&mut self, base: char, variants: &[String], active_index: usize) {
        let selected = variants.get(active_index).map(String::as_str).unwrap_or("");
        log::info!("{} -> {} ({:?})", base, selected, variants);
    }

    fn show_committed(&mut self, text: &str) {
        log::info!("Committed {}", text);
    }

    fn clear(&mut self) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullFeedback;

impl Feedback for NullFeedback {
    fn show_options(&mut self, _base: char, _variants: &[String], _active_index: usize) {}
    fn show_committed(&mut self, _text: &str) {}
    fn clear(&mut self) {}
}

/// One call received by a [`RecordingFeedback`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackCall {
    Options {
        base: char,
        variants: Vec<String>,
        active_index: usize,
    },
    Committed(String),
    Clear,
}

/// Keeps every call, for asserting what the user would have seen.
#[derive(Debug, Default, Clone)]
pub struct RecordingFeedback {
    calls: Vec<FeedbackCall>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[FeedbackCall] {
        &self.calls
    }

    /// Committed strings, oldest first.
    pub fn committed(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                FeedbackCall::Committed(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The most recent preview, as (base, active index).
    pub fn last_preview(&self) -> Option<(char, usize)> {
        self.calls.iter().rev().find_map(|call| match call {
            FeedbackCall::Options {
                base, active_index, ..
            } => Some((*base, *active_index)),
            _ => None,
        })
    }
}

impl Feedback for RecordingFeedback {
    fn show_options(&mut self, base: char, variants: &[String], active_index: usize) {
        self.calls.push(FeedbackCall::Options {
            base,
            variants: variants.to_vec(),
            active_index,
        });
    }

    fn show_committed(&mut self, text: &str) {
        self.calls.push(FeedbackCall::Committed(text.to_string()));
    }

    fn clear(&mut self) {
        self.calls.push(FeedbackCall::Clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_mode_parse() {
        assert_eq!(DisplayMode::from_str("terminal"), Ok(DisplayMode::Terminal));
        assert_eq!(DisplayMode::from_str("TUI"), Ok(DisplayMode::Terminal));
        assert_eq!(DisplayMode::from_str("Log"), Ok(DisplayMode::Log));
        assert_eq!(DisplayMode::from_str("none"), Ok(DisplayMode::Disabled));
        assert!(DisplayMode::from_str("gui").is_err());
    }

    #[test]
    fn test_display_mode_to_string() {
        assert_eq!(DisplayMode::Terminal.to_string(), "terminal");
        assert_eq!(DisplayMode::Disabled.to_string(), "none");
        assert_eq!(DisplayMode::default(), DisplayMode::Terminal);
    }

    #[test]
    fn test_recording_feedback() {
        let mut feedback = RecordingFeedback::new();
        let variants = vec!["é".to_string(), "è".to_string()];
        feedback.show_options('e', &variants, 1);
        feedback.show_committed("è");
        feedback.clear();

        assert_eq!(feedback.last_preview(), Some(('e', 1)));
        assert_eq!(feedback.committed(), vec!["è"]);
        assert_eq!(feedback.calls().last(), Some(&FeedbackCall::Clear));
    }

    #[test]
    fn test_boxed_feedback_forwards() {
        let mut inner = RecordingFeedback::new();
        {
            let mut boxed: Box<dyn Feedback + '_> = Box::new(&mut inner);
            boxed.clear();
        }
        assert_eq!(inner.calls(), &[FeedbackCall::Clear]);
    }
}
