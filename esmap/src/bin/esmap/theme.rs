//! Colors and markers shared by command output and the help appendix.

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use colored::{Color, ColoredString, Colorize};

pub const BULLET: &str = "•";
pub const CHECK: &str = "✓";

/// What a piece of terminal text is; each tone has one color and, for messages, one marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Error,
    Warning,
    Info,
    Detail,
    Heading,
    Key,
    Value,
}

impl Tone {
    pub const fn color(self) -> Color {
        match self {
            Tone::Error => Color::Red,
            Tone::Warning => Color::Yellow,
            Tone::Info => Color::Blue,
            Tone::Detail => Color::BrightBlack,
            Tone::Heading => Color::BrightBlue,
            Tone::Key => Color::BrightCyan,
            Tone::Value => Color::White,
        }
    }

    /// Prefix for one-line messages of this tone.
    pub const fn marker(self) -> &'static str {
        match self {
            Tone::Error => "✗",
            Tone::Warning => "⚠",
            Tone::Info => "ℹ",
            Tone::Detail => "→",
            Tone::Heading | Tone::Key | Tone::Value => "",
        }
    }

    pub fn paint(self, text: &str) -> ColoredString {
        match self {
            Tone::Heading | Tone::Key => text.color(self.color()).bold(),
            _ => text.color(self.color()),
        }
    }
}

/// Help styles in the same palette as command output.
pub fn help_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().bold())
        .usage(AnsiColor::BrightBlue.on_default().bold())
        .literal(AnsiColor::Magenta.on_default())
        .placeholder(AnsiColor::BrightBlack.on_default())
        .error(AnsiColor::Red.on_default().bold())
        .invalid(AnsiColor::Yellow.on_default())
        .valid(AnsiColor::Green.on_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_message_tones_carry_markers() {
        for tone in [Tone::Error, Tone::Warning, Tone::Info, Tone::Detail] {
            assert!(!tone.marker().is_empty());
        }
        for tone in [Tone::Heading, Tone::Key, Tone::Value] {
            assert!(tone.marker().is_empty());
        }
    }
}
