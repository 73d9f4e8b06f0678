//! Styling helpers for terminal output.
//!
//! The [`GameStyle`] trait applies ANSI styling via the `colored` crate.
//! Implementations for `&str` and `String` are provided so string literals can
//! be styled directly.

use colored::{ColoredString, Colorize};
use textwrap::fill;

/// Convenience trait for applying color and style to text output.
pub trait GameStyle {
    fn passage_style(&self) -> ColoredString;
    fn choice_style(&self) -> ColoredString;
    fn title_style(&self) -> ColoredString;
    fn banner_style(&self) -> ColoredString;
    fn prompt_style(&self) -> ColoredString;
    fn variable_style(&self) -> ColoredString;
    fn error_style(&self) -> ColoredString;
}

impl GameStyle for &str {
    fn passage_style(&self) -> ColoredString {
        self.truecolor(102, 208, 250)
    }
    fn choice_style(&self) -> ColoredString {
        self.truecolor(220, 180, 40)
    }
    fn title_style(&self) -> ColoredString {
        self.bright_yellow().underline()
    }
    fn banner_style(&self) -> ColoredString {
        self.bold().truecolor(223, 77, 10)
    }
    fn prompt_style(&self) -> ColoredString {
        self.truecolor(75, 80, 75)
    }
    fn variable_style(&self) -> ColoredString {
        self.italic().truecolor(110, 220, 110)
    }
    fn error_style(&self) -> ColoredString {
        self.truecolor(230, 30, 30)
    }
}

impl GameStyle for String {
    fn passage_style(&self) -> ColoredString {
        self.as_str().passage_style()
    }
    fn choice_style(&self) -> ColoredString {
        self.as_str().choice_style()
    }
    fn title_style(&self) -> ColoredString {
        self.as_str().title_style()
    }
    fn banner_style(&self) -> ColoredString {
        self.as_str().banner_style()
    }
    fn prompt_style(&self) -> ColoredString {
        self.as_str().prompt_style()
    }
    fn variable_style(&self) -> ColoredString {
        self.as_str().variable_style()
    }
    fn error_style(&self) -> ColoredString {
        self.as_str().error_style()
    }
}

/// Wrap each line of `text` separately at `width` columns, keeping existing line breaks.
pub fn wrap_lines(text: &str, width: usize) -> String {
    text.split('\n')
        .map(|line| fill(line, width.max(1)))
        .collect::<Vec<_>>()
        .join("\n")
}
