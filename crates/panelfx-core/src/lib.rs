#![forbid(unsafe_code)]

//! Shared vocabulary for panelfx: display modes, per-mode options, the mode
//! state snapshot, configuration, logging, and the contracts for the
//! out-of-band collaborators (wall clock, weather, images).
//!
//! # Role in panelfx
//! `panelfx-core` sits between the render kernel and everything that decides
//! *what* to draw. Generators read a [`ModeState`] snapshot; the control
//! surface writes it.

pub mod clock;
pub mod config;
pub mod image;
pub mod logging;
pub mod mode;
pub mod options;
pub mod state;
pub mod weather;

pub use clock::{FixedClock, LocalTime, SystemClock, WallClock};
pub use config::{ConfigError, EngineConfig};
#[cfg(feature = "image")]
pub use image::DecodingImageLoader;
pub use image::{ImageError, ImageFrame, ImageLoader, ImageStatus, StaticImageLoader};
pub use logging::{LogConfig, LogFormat, init_logging};
pub use mode::{ModeTag, ParseModeError};
pub use options::{
    ClockColor, ClockFormat, ClockOptions, FireIntensity, FireOptions, FireScheme, FireSpeed,
    MazeOptions, MazeSpeed, MazeThickness, ModeOptions, ModeOptionsUpdate, PacmanDifficulty,
    PacmanOptions, PacmanSpeed, ParseOptionError, PlasmaOptions, PlasmaPattern, SpectrumColor,
    SpectrumOptions, SpectrumStyle,
};
pub use state::ModeState;
pub use weather::{
    ForecastDay, StaticWeatherProvider, WeatherCondition, WeatherError, WeatherProvider,
    WeatherReport, WeatherStatus,
};
