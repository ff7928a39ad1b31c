#![forbid(unsafe_code)]

//! Per-mode option records.
//!
//! Each configurable mode gets its own small options struct made of closed
//! enums. Updates arrive as a [`ModeOptionsUpdate`], one variant per mode,
//! and are validated where they enter: the JSON boundary maps unknown values
//! to the documented default and logs a warning instead of failing.
//!
//! # Defaults
//!
//! | Mode     | Default                          |
//! |----------|----------------------------------|
//! | Clock    | 12-hour, rainbow                 |
//! | Plasma   | classic                          |
//! | Maze     | medium speed, medium thickness   |
//! | Fire     | traditional, normal, normal      |
//! | Pac-Man  | normal speed, normal difficulty  |
//! | Spectrum | bars, rainbow                    |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::mode::ModeTag;

/// Error returned when an option value is not one of the accepted names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptionError {
    /// Option type that rejected the value.
    pub option: &'static str,
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for ParseOptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} value: {:?}", self.option, self.value)
    }
}

impl std::error::Error for ParseOptionError {}

macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident,
        { $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant, )+
        }

        impl $name {
            /// Every accepted value.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire name.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseOptionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                match wanted.as_str() {
                    $( $text => Ok($name::$variant), )+
                    _ => Err(ParseOptionError {
                        option: stringify!($name),
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

option_enum! {
    /// Clock time format.
    ClockFormat, default = TwelveHour, {
        /// `hh:mm:ss AM`
        TwelveHour => "12hour",
        /// `HH:MM:SS`
        TwentyFourHour => "24hour",
    }
}

option_enum! {
    /// Clock text color.
    ClockColor, default = Rainbow, {
        /// Hue fades with the frame counter.
        Rainbow => "rainbow",
        /// Fixed gold.
        Solid => "solid",
    }
}

option_enum! {
    /// Plasma interference function.
    PlasmaPattern, default = Classic, {
        Classic => "classic",
        Waves => "waves",
        Cellular => "cellular",
        Psychedelic => "psychedelic",
    }
}

option_enum! {
    /// Maze solver pace.
    MazeSpeed, default = Medium, {
        Slow => "slow",
        Medium => "medium",
        Fast => "fast",
    }
}

option_enum! {
    /// Pixel footprint of one maze grid cell.
    MazeThickness, default = Medium, {
        Small => "small",
        Medium => "medium",
        Large => "large",
    }
}

option_enum! {
    /// Fire color ramp.
    FireScheme, default = Traditional, {
        Traditional => "traditional",
        Blue => "blue",
        Green => "green",
        Purple => "purple",
    }
}

option_enum! {
    /// Fire seed strength.
    FireIntensity, default = Normal, {
        Calm => "calm",
        Normal => "normal",
        Intense => "intense",
    }
}

option_enum! {
    /// Fire simulation pace.
    FireSpeed, default = Normal, {
        Slow => "slow",
        Normal => "normal",
        Fast => "fast",
    }
}

option_enum! {
    /// Pac-Man game pace.
    PacmanSpeed, default = Normal, {
        Slow => "slow",
        Normal => "normal",
        Fast => "fast",
    }
}

option_enum! {
    /// Pac-Man ghost behavior.
    PacmanDifficulty, default = Normal, {
        /// Chasing ghosts head for a random cell each step.
        Easy => "easy",
        /// Scatter and chase alternate.
        Normal => "normal",
        /// Ghosts always chase.
        Hard => "hard",
    }
}

option_enum! {
    /// Spectrum visualization.
    SpectrumStyle, default = Bars, {
        Bars => "bars",
        Waveform => "waveform",
        Heartbeat => "heartbeat",
    }
}

option_enum! {
    /// Spectrum color mode.
    SpectrumColor, default = Rainbow, {
        Rainbow => "rainbow",
        Gradient => "gradient",
        Solid => "solid",
    }
}

impl MazeSpeed {
    /// Frames between solver steps.
    pub const fn frames_per_step(self) -> u64 {
        match self {
            MazeSpeed::Slow => 4,
            MazeSpeed::Medium => 2,
            MazeSpeed::Fast => 1,
        }
    }
}

impl MazeThickness {
    /// Pixels per grid cell.
    pub const fn pixels(self) -> u16 {
        match self {
            MazeThickness::Small => 1,
            MazeThickness::Medium => 2,
            MazeThickness::Large => 3,
        }
    }
}

impl FireIntensity {
    /// Multiplier applied to the bottom-row seed.
    pub const fn multiplier(self) -> f64 {
        match self {
            FireIntensity::Calm => 0.7,
            FireIntensity::Normal => 1.0,
            FireIntensity::Intense => 1.3,
        }
    }
}

impl FireSpeed {
    /// Frames between heat map updates.
    pub const fn frames_per_update(self) -> u64 {
        match self {
            FireSpeed::Slow => 3,
            FireSpeed::Normal => 2,
            FireSpeed::Fast => 1,
        }
    }
}

impl PacmanSpeed {
    /// Frames between game steps.
    pub const fn frames_per_step(self) -> u64 {
        match self {
            PacmanSpeed::Slow => 4,
            PacmanSpeed::Normal => 2,
            PacmanSpeed::Fast => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockOptions {
    pub format: ClockFormat,
    pub color: ClockColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlasmaOptions {
    pub pattern: PlasmaPattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeOptions {
    pub speed: MazeSpeed,
    pub thickness: MazeThickness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FireOptions {
    pub scheme: FireScheme,
    pub intensity: FireIntensity,
    pub speed: FireSpeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PacmanOptions {
    pub speed: PacmanSpeed,
    pub difficulty: PacmanDifficulty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumOptions {
    pub style: SpectrumStyle,
    pub color: SpectrumColor,
}

/// One options record per configurable mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeOptions {
    pub clock: ClockOptions,
    pub plasma: PlasmaOptions,
    pub maze: MazeOptions,
    pub fire: FireOptions,
    pub pacman: PacmanOptions,
    pub spectrum: SpectrumOptions,
}

/// A partial options change for exactly one mode.
///
/// `None` fields leave the stored value untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOptionsUpdate {
    Clock {
        format: Option<ClockFormat>,
        color: Option<ClockColor>,
    },
    Plasma {
        pattern: Option<PlasmaPattern>,
    },
    Maze {
        speed: Option<MazeSpeed>,
        thickness: Option<MazeThickness>,
    },
    Fire {
        scheme: Option<FireScheme>,
        intensity: Option<FireIntensity>,
        speed: Option<FireSpeed>,
    },
    Pacman {
        speed: Option<PacmanSpeed>,
        difficulty: Option<PacmanDifficulty>,
    },
    Spectrum {
        style: Option<SpectrumStyle>,
        color: Option<SpectrumColor>,
    },
}

/// Read `key` from a JSON object as an option value.
///
/// Missing or `null` keys yield `None`. Present but unrecognized values yield
/// the type's default and log a warning.
fn lenient<T>(obj: &Value, key: &str) -> Option<T>
where
    T: FromStr<Err = ParseOptionError> + Default + fmt::Display,
{
    let raw = obj.get(key)?;
    if raw.is_null() {
        return None;
    }
    let parsed = raw
        .as_str()
        .ok_or_else(|| ParseOptionError {
            option: "string",
            value: raw.to_string(),
        })
        .and_then(str::parse::<T>);
    match parsed {
        Ok(value) => Some(value),
        Err(err) => {
            let fallback = T::default();
            warn!(key, error = %err, fallback = %fallback, "invalid mode option, using default");
            Some(fallback)
        }
    }
}

impl ModeOptionsUpdate {
    /// The mode this update targets.
    pub const fn mode(&self) -> ModeTag {
        match self {
            ModeOptionsUpdate::Clock { .. } => ModeTag::Clock,
            ModeOptionsUpdate::Plasma { .. } => ModeTag::Plasma,
            ModeOptionsUpdate::Maze { .. } => ModeTag::Maze,
            ModeOptionsUpdate::Fire { .. } => ModeTag::Fire,
            ModeOptionsUpdate::Pacman { .. } => ModeTag::Pacman,
            ModeOptionsUpdate::Spectrum { .. } => ModeTag::Spectrum,
        }
    }

    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        match *self {
            ModeOptionsUpdate::Clock { format, color } => format.is_none() && color.is_none(),
            ModeOptionsUpdate::Plasma { pattern } => pattern.is_none(),
            ModeOptionsUpdate::Maze { speed, thickness } => speed.is_none() && thickness.is_none(),
            ModeOptionsUpdate::Fire {
                scheme,
                intensity,
                speed,
            } => scheme.is_none() && intensity.is_none() && speed.is_none(),
            ModeOptionsUpdate::Pacman { speed, difficulty } => {
                speed.is_none() && difficulty.is_none()
            }
            ModeOptionsUpdate::Spectrum { style, color } => style.is_none() && color.is_none(),
        }
    }

    /// Build an update for `mode` from a JSON object with camelCase keys
    /// (`clockFormat`, `mazeSpeed`, `fireScheme`, ...).
    ///
    /// Returns `None` for modes without options.
    pub fn from_json(mode: ModeTag, value: &Value) -> Option<Self> {
        let update = match mode {
            ModeTag::Clock => ModeOptionsUpdate::Clock {
                format: lenient(value, "clockFormat"),
                color: lenient(value, "clockColor"),
            },
            ModeTag::Plasma => ModeOptionsUpdate::Plasma {
                pattern: lenient(value, "plasmaPattern"),
            },
            ModeTag::Maze => ModeOptionsUpdate::Maze {
                speed: lenient(value, "mazeSpeed"),
                thickness: lenient(value, "mazeThickness"),
            },
            ModeTag::Fire => ModeOptionsUpdate::Fire {
                scheme: lenient(value, "fireScheme"),
                intensity: lenient(value, "fireIntensity"),
                speed: lenient(value, "fireSpeed"),
            },
            ModeTag::Pacman => ModeOptionsUpdate::Pacman {
                speed: lenient(value, "pacmanSpeed"),
                difficulty: lenient(value, "pacmanDifficulty"),
            },
            ModeTag::Spectrum => ModeOptionsUpdate::Spectrum {
                style: lenient(value, "spectrumStyle"),
                color: lenient(value, "spectrumColor"),
            },
            _ => return None,
        };
        Some(update)
    }

    /// Split a flat JSON object carrying keys for any number of modes into
    /// per-mode updates. Modes with no keys present are skipped.
    pub fn from_flat_json(value: &Value) -> Vec<Self> {
        ModeTag::ALL
            .into_iter()
            .filter_map(|tag| Self::from_json(tag, value))
            .filter(|update| !update.is_empty())
            .collect()
    }
}

impl ModeOptions {
    /// Apply a partial update. Returns `true` if any stored value changed.
    pub fn apply(&mut self, update: ModeOptionsUpdate) -> bool {
        let before = *self;
        match update {
            ModeOptionsUpdate::Clock { format, color } => {
                set(&mut self.clock.format, format);
                set(&mut self.clock.color, color);
            }
            ModeOptionsUpdate::Plasma { pattern } => {
                set(&mut self.plasma.pattern, pattern);
            }
            ModeOptionsUpdate::Maze { speed, thickness } => {
                set(&mut self.maze.speed, speed);
                set(&mut self.maze.thickness, thickness);
            }
            ModeOptionsUpdate::Fire {
                scheme,
                intensity,
                speed,
            } => {
                set(&mut self.fire.scheme, scheme);
                set(&mut self.fire.intensity, intensity);
                set(&mut self.fire.speed, speed);
            }
            ModeOptionsUpdate::Pacman { speed, difficulty } => {
                set(&mut self.pacman.speed, speed);
                set(&mut self.pacman.difficulty, difficulty);
            }
            ModeOptionsUpdate::Spectrum { style, color } => {
                set(&mut self.spectrum.style, style);
                set(&mut self.spectrum.color, color);
            }
        }
        before != *self
    }
}

#[inline]
fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}
