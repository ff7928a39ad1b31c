#![forbid(unsafe_code)]

//! panelfx public facade crate.
//!
//! Re-exports the common types from the internal crates and offers a small
//! prelude for driving a panel.

use std::fmt;

// --- Render re-exports -----------------------------------------------------

pub use panelfx_render::{
    DisplaySink, Draw, FontSize, Gradient, HeadlessSink, ImageFrame, MonoFontRenderer,
    PixelBuffer, Rgb, SinkError, TextRenderer, hsv_to_rgb,
};

// --- Core re-exports -------------------------------------------------------

pub use panelfx_core::{
    ConfigError, EngineConfig, ImageLoader, LocalTime, LogConfig, LogFormat, ModeOptions,
    ModeOptionsUpdate, ModeState, ModeTag, ParseModeError, WallClock, WeatherProvider,
    WeatherReport, init_logging,
};

// --- Generator re-exports --------------------------------------------------

pub use panelfx_modes::{Generator, Generators, PacmanStats, RenderContext};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use panelfx_runtime::{
    ControlHandle, CountedTicker, Engine, EngineStatus, IntervalTicker, Runtime, RuntimeError,
    TickReport, Ticker,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for panelfx hosts.
#[derive(Debug)]
pub enum Error {
    /// I/O failure outside the sink.
    Io(std::io::Error),
    /// Config file could not be read or parsed.
    Config(ConfigError),
    /// The sink rejected a frame.
    Sink(SinkError),
    /// The runtime could not start.
    #[cfg(feature = "runtime")]
    Runtime(RuntimeError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Sink(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Runtime(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Sink(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Runtime(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<SinkError> for Error {
    fn from(err: SinkError) -> Self {
        Self::Sink(err)
    }
}

#[cfg(feature = "runtime")]
impl From<RuntimeError> for Error {
    fn from(err: RuntimeError) -> Self {
        Self::Runtime(err)
    }
}

/// Standard result type for panelfx APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DisplaySink, EngineConfig, Error, HeadlessSink, ModeOptionsUpdate, ModeState, ModeTag,
        PixelBuffer, Result, Rgb,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{ControlHandle, Engine, Runtime};

    pub use crate::{core, modes, render};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use panelfx_core as core;
pub use panelfx_modes as modes;
pub use panelfx_render as render;
#[cfg(feature = "runtime")]
pub use panelfx_runtime as runtime;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn config_error_converts() {
        let err: Error = EngineConfig::from_json_str("{ not json").unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn sink_error_displays() {
        let err: Error = SinkError::Disconnected("gone".into()).into();
        assert_eq!(err.to_string(), "sink disconnected: gone");
    }

    #[cfg(feature = "runtime")]
    #[test]
    fn prelude_drives_an_engine() {
        use crate::prelude::*;

        let config = EngineConfig {
            width: 8,
            height: 8,
            seed: Some(9),
            initial_mode: ModeTag::Pulse,
            ..EngineConfig::default()
        };
        let mut engine = Engine::new(&config, HeadlessSink::new(8, 8));
        let report = engine.tick();
        assert_eq!(report.mode, ModeTag::Pulse);
        assert!(engine.sink().last_frame().lit_pixels() > 0);
    }
}
