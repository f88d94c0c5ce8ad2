//! Colour and width of the terminal `shelf` writes to.

use std::fmt::Display;

use owo_colors::{OwoColorize, Style, colors::css};

/// Below this many columns listings switch to one line per book.
const NARROW_COLUMNS: u16 = 60;

/// What a piece of output is, which decides how it is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// A change went through.
    Success,
    /// Something was refused or not found.
    Warning,
    /// A genre badge.
    Badge,
    /// A book title.
    Title,
    /// Ids, hints and other secondary text.
    Muted,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Success => Style::new().fg::<css::Green>(),
            Self::Warning => Style::new().fg::<css::Orange>(),
            Self::Badge => Style::new().fg::<css::LightBlue>(),
            Self::Title => Style::new().bold(),
            Self::Muted => Style::new().dimmed(),
        }
    }
}

/// Whether output is coloured.
///
/// Detection runs once per process; a palette is then copied to whatever
/// prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colour: bool,
}

impl Palette {
    /// Never colours anything.
    pub const PLAIN: Self = Self { colour: false };

    /// Colours output when stdout supports it.
    pub fn detect() -> Self {
        Self {
            colour: supports_color::on_cached(supports_color::Stream::Stdout).is_some(),
        }
    }

    /// Renders `text` in the style of `tone`.
    pub fn paint(self, text: impl Display, tone: Tone) -> String {
        if self.colour {
            text.style(tone.style()).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Whether the terminal is too narrow for card listings.
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(width, _)| width.0 < NARROW_COLUMNS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_palette_leaves_text_alone() {
        assert_eq!(Palette::PLAIN.paint("Dune", Tone::Title), "Dune");
    }

    #[test]
    fn colour_palette_wraps_text_in_escapes() {
        let painted = Palette { colour: true }.paint("Deleted", Tone::Success);

        assert!(painted.contains("Deleted"));
        assert!(painted.starts_with('\u{1b}'));
    }
}
