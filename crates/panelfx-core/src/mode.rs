#![forbid(unsafe_code)]

//! Display mode tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The display mode currently driving the panel.
///
/// Exactly one mode is active at a time. Each tag owns one generator inside
/// the engine; switching tags never resets another tag's generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeTag {
    /// Bouncing time of day.
    #[default]
    Clock,
    /// Static centered text.
    Text,
    /// Cached weather report.
    Weather,
    /// Text scrolling right to left.
    Scroll,
    Rainbow,
    Plasma,
    Squares,
    Life,
    Pulse,
    Image,
    Maze,
    Spectrum,
    Fire,
    Pacman,
    /// Blank panel.
    Off,
}

impl ModeTag {
    /// Every tag, in index order.
    pub const ALL: [ModeTag; 15] = [
        ModeTag::Clock,
        ModeTag::Text,
        ModeTag::Weather,
        ModeTag::Scroll,
        ModeTag::Rainbow,
        ModeTag::Plasma,
        ModeTag::Squares,
        ModeTag::Life,
        ModeTag::Pulse,
        ModeTag::Image,
        ModeTag::Maze,
        ModeTag::Spectrum,
        ModeTag::Fire,
        ModeTag::Pacman,
        ModeTag::Off,
    ];

    /// Number of tags.
    pub const COUNT: usize = Self::ALL.len();

    /// Stable index into [`ModeTag::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            ModeTag::Clock => "clock",
            ModeTag::Text => "text",
            ModeTag::Weather => "weather",
            ModeTag::Scroll => "scroll",
            ModeTag::Rainbow => "rainbow",
            ModeTag::Plasma => "plasma",
            ModeTag::Squares => "squares",
            ModeTag::Life => "life",
            ModeTag::Pulse => "pulse",
            ModeTag::Image => "image",
            ModeTag::Maze => "maze",
            ModeTag::Spectrum => "spectrum",
            ModeTag::Fire => "fire",
            ModeTag::Pacman => "pacman",
            ModeTag::Off => "off",
        }
    }

    /// The next tag in index order, wrapping.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }

    /// The previous tag in index order, wrapping.
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::COUNT - 1) % Self::COUNT]
    }

    /// Whether this mode has a typed options record.
    pub const fn has_options(self) -> bool {
        matches!(
            self,
            ModeTag::Clock
                | ModeTag::Plasma
                | ModeTag::Maze
                | ModeTag::Fire
                | ModeTag::Pacman
                | ModeTag::Spectrum
        )
    }
}

impl fmt::Display for ModeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a mode name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError(pub String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown display mode: {:?}", self.0)
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for ModeTag {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == wanted)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}
