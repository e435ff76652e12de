//! Terminal layout and the colour palette used by the table views

use std::sync::LazyLock;

use owo_colors::{OwoColorize, colors::css};
use tracker::Level;

static COLOR: LazyLock<bool> =
    LazyLock::new(|| supports_color::on(supports_color::Stream::Stdout).is_some());

/// Narrow terminals (< 80 columns) get the compact layouts.
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(width, _)| width.0 < 80)
}

/// What a piece of output means, and so how it is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Completed work and easy questions.
    Done,
    /// Removals and medium questions.
    Caution,
    /// Hard questions.
    Danger,
    /// Ids, timestamps, rules and other secondary text.
    Muted,
}

impl Tone {
    fn apply(self, text: &str) -> String {
        match self {
            Self::Done => text.fg::<css::Green>().to_string(),
            Self::Caution => text.fg::<css::Orange>().to_string(),
            Self::Danger => text.fg::<css::Crimson>().to_string(),
            Self::Muted => text.dimmed().to_string(),
        }
    }
}

impl From<Level> for Tone {
    fn from(level: Level) -> Self {
        match level {
            Level::Easy => Self::Done,
            Level::Medium => Self::Caution,
            Level::Hard => Self::Danger,
        }
    }
}

/// Colours text in a [`Tone`] when stdout supports it.
pub trait Paint {
    /// The text, coloured for `tone` if colour is enabled.
    fn paint(&self, tone: Tone) -> String;
}

impl<T: AsRef<str> + ?Sized> Paint for T {
    fn paint(&self, tone: Tone) -> String {
        let text = self.as_ref();
        if *COLOR {
            tone.apply(text)
        } else {
            text.to_owned()
        }
    }
}

/// The completion marker shown in tables.
pub const fn completion_mark(done: bool) -> &'static str {
    if done { "✓" } else { "·" }
}
