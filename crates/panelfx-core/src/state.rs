#![forbid(unsafe_code)]

//! The externally mutable mode state.
//!
//! [`ModeState`] is the whole control surface in one value: the engine
//! clones it once per tick, so every write made between ticks becomes
//! visible together at the next tick boundary.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::mode::ModeTag;
use crate::options::ModeOptions;

/// Text shown by Text and Scroll modes before anything is set.
pub const DEFAULT_TEXT: &str = "HELLO";

/// Default panel brightness (percent).
pub const DEFAULT_BRIGHTNESS: u8 = 80;

/// Snapshot of everything the control layer can change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModeState {
    /// Active mode.
    pub mode: ModeTag,
    /// Text for Text and Scroll modes.
    pub text: String,
    /// Brightness percent, `0..=100`.
    pub brightness: u8,
    /// Location handed to the weather provider (ZIP code or city).
    pub weather_location: Option<String>,
    /// Image file shown by Image mode.
    pub image_path: Option<PathBuf>,
    /// Per-mode options.
    pub options: ModeOptions,
}

impl Default for ModeState {
    fn default() -> Self {
        Self {
            mode: ModeTag::default(),
            text: DEFAULT_TEXT.to_string(),
            brightness: DEFAULT_BRIGHTNESS,
            weather_location: None,
            image_path: None,
            options: ModeOptions::default(),
        }
    }
}

impl ModeState {
    /// Start in `mode` with default everything else.
    pub fn with_mode(mode: ModeTag) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Set the brightness, clamping to 100.
    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness.min(100);
    }

    /// Store new display text.
    ///
    /// Switches to Text mode unless Scroll is active, since Scroll shows the
    /// same text.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        if self.mode != ModeTag::Scroll {
            self.mode = ModeTag::Text;
        }
    }

    /// Set the weather location. Blank strings clear it.
    pub fn set_weather_location(&mut self, location: Option<String>) {
        self.weather_location = location
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
    }
}
