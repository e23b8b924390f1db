// AccentFlow Terminal Feedback
// Single status line preview using crossterm

use std::io::{self, Write};

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{Clear, ClearType};

use super::Feedback;

/// Draws the variant list on one line of `out`, active variant highlighted.
pub struct TerminalFeedback<W: Write> {
    out: W,
    drawn: bool,
}

impl<W: Write> TerminalFeedback<W> {
    pub fn new(out: W) -> Self {
        Self { out, drawn: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn erase(&mut self) -> io::Result<()> {
        if self.drawn {
            queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
            self.drawn = false;
        }
        Ok(())
    }

    fn draw_options(&mut self, base: char, variants: &[String], active: usize) -> io::Result<()> {
        self.erase()?;
        queue!(self.out, Print(format!("{} ", base)))?;
        for (index, variant) in variants.iter().enumerate() {
            if index == active {
                queue!(
                    self.out,
                    SetAttribute(Attribute::Reverse),
                    Print(format!("[{}]", variant)),
                    SetAttribute(Attribute::Reset)
                )?;
            } else {
                queue!(self.out, Print(format!(" {} ", variant)))?;
            }
        }
        self.drawn = true;
        self.out.flush()
    }

    fn draw_committed(&mut self, text: &str) -> io::Result<()> {
        self.erase()?;
        queue!(self.out, Print(format!("-> {}\r\n", text)))?;
        self.out.flush()
    }

    fn render(result: io::Result<()>) {
        if let Err(e) = result {
            log::debug!("Terminal feedback failed: {}", e);
        }
    }
}

impl<W: Write> Feedback for TerminalFeedback<W> {
    fn show_options(&mut self, base: char, variants: &[String], active_index: usize) {
        let result = self.draw_options(base, variants, active_index);
        Self::render(result);
    }

    fn show_committed(&mut self, text: &str) {
        let result = self.draw_committed(text);
        Self::render(result);
    }

    fn clear(&mut self) {
        let result = self.erase().and_then(|_| self.out.flush());
        Self::render(result);
    }
}
