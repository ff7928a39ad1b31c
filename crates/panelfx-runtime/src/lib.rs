#![forbid(unsafe_code)]

//! Runtime for panelfx: the frame [`Engine`], its tick [`Scheduler`], the
//! [`ControlHandle`] used to change modes, and the background caches for
//! weather reports and decoded images.
//!
//! # Example
//!
//! ```no_run
//! use panelfx_core::{EngineConfig, ModeTag};
//! use panelfx_render::HeadlessSink;
//! use panelfx_runtime::Runtime;
//!
//! let config = EngineConfig::default();
//! let mut runtime = Runtime::from_config(&config, HeadlessSink::new(64, 64));
//! runtime.control().set_mode(ModeTag::Fire);
//! runtime.start()?;
//! // ... later
//! runtime.shutdown();
//! # Ok::<(), panelfx_runtime::RuntimeError>(())
//! ```

pub mod control;
pub mod engine;
mod fetch;
pub mod images;
pub mod runtime;
pub mod scheduler;
pub mod weather;

pub use control::ControlHandle;
pub use engine::{Engine, EngineStatus, TickReport};
pub use images::ImageCache;
pub use runtime::{Runtime, RuntimeError};
pub use scheduler::{CountedTicker, IntervalTicker, Scheduler, StopSignal, StopTrigger, Ticker};
pub use weather::WeatherCache;
