#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. [`EngineConfig::default`]
//! 2. A JSON file ([`EngineConfig::load`])
//! 3. `PANELFX_*` environment variables ([`EngineConfig::apply_env`])
//! 4. Command-line flags (applied by the binary)
//!
//! Call [`EngineConfig::validate`] last; it clamps out-of-range values.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use panelfx_render::FontSize;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::mode::ModeTag;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "PANELFX_";

/// Errors from loading a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not valid configuration JSON.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Runtime configuration for one panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Panel width in pixels.
    pub width: u16,
    /// Panel height in pixels.
    pub height: u16,
    /// Milliseconds between ticks.
    pub tick_interval_ms: u64,
    /// Initial brightness percent.
    pub brightness: u8,
    /// Mode shown at startup.
    pub initial_mode: ModeTag,
    /// Bitmap font for text modes.
    pub font: FontSize,
    /// Offset from UTC for the clock, in minutes.
    pub utc_offset_minutes: i32,
    /// Minimum seconds between weather fetches.
    pub weather_refresh_secs: u64,
    /// Seed for generator randomness. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl EngineConfig {
    pub const MIN_TICK_INTERVAL_MS: u64 = 10;
    pub const MIN_WEATHER_REFRESH_SECS: u64 = 60;
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            tick_interval_ms: 100,
            brightness: 80,
            initial_mode: ModeTag::Clock,
            font: FontSize::Small,
            utc_offset_minutes: 0,
            weather_refresh_secs: 600,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse JSON config text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply `PANELFX_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides looked up through `lookup` (keys include the prefix).
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        override_parsed(&mut self.width, "WIDTH", get("WIDTH"));
        override_parsed(&mut self.height, "HEIGHT", get("HEIGHT"));
        override_parsed(&mut self.tick_interval_ms, "TICK_MS", get("TICK_MS"));
        override_parsed(&mut self.brightness, "BRIGHTNESS", get("BRIGHTNESS"));
        override_parsed(&mut self.initial_mode, "MODE", get("MODE"));
        override_parsed(&mut self.utc_offset_minutes, "UTC_OFFSET", get("UTC_OFFSET"));
        override_parsed(
            &mut self.weather_refresh_secs,
            "WEATHER_REFRESH_SECS",
            get("WEATHER_REFRESH_SECS"),
        );
        if let Some(val) = get("FONT") {
            match FontSize::parse(&val) {
                Some(font) => self.font = font,
                None => warn!(var = "PANELFX_FONT", value = %val, "ignoring invalid override"),
            }
        }
        if let Some(val) = get("SEED") {
            match val.trim().parse() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => warn!(var = "PANELFX_SEED", value = %val, "ignoring invalid override"),
            }
        }
    }

    /// Clamp out-of-range values, logging each adjustment.
    pub fn validate(&mut self) {
        if self.brightness > 100 {
            warn!(brightness = self.brightness, "brightness above 100, clamping");
            self.brightness = 100;
        }
        if self.tick_interval_ms < Self::MIN_TICK_INTERVAL_MS {
            warn!(
                tick_interval_ms = self.tick_interval_ms,
                min = Self::MIN_TICK_INTERVAL_MS,
                "tick interval too short, clamping"
            );
            self.tick_interval_ms = Self::MIN_TICK_INTERVAL_MS;
        }
        if self.weather_refresh_secs < Self::MIN_WEATHER_REFRESH_SECS {
            warn!(
                weather_refresh_secs = self.weather_refresh_secs,
                min = Self::MIN_WEATHER_REFRESH_SECS,
                "weather refresh too frequent, clamping"
            );
            self.weather_refresh_secs = Self::MIN_WEATHER_REFRESH_SECS;
        }
    }

    /// Tick period as a `Duration`.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Weather refresh period as a `Duration`.
    pub fn weather_refresh(&self) -> Duration {
        Duration::from_secs(self.weather_refresh_secs)
    }
}

fn override_parsed<T: std::str::FromStr>(slot: &mut T, name: &str, value: Option<String>) {
    let Some(val) = value else {
        return;
    };
    match val.trim().parse() {
        Ok(v) => *slot = v,
        Err(_) => warn!(var = %format!("{ENV_PREFIX}{name}"), value = %val, "ignoring invalid override"),
    }
}
