#![forbid(unsafe_code)]

//! The frame engine.
//!
//! [`Engine`] owns everything one panel needs: the pixel buffer, every mode
//! generator, the frame counter, the collaborators, and the sink. One call
//! to [`Engine::tick`] produces and presents exactly one frame.
//!
//! # Tick sequence
//!
//! 1. Clone the shared [`ModeState`] (the lock is held only for the clone).
//! 2. Poll the weather or image cache if the active mode needs it.
//! 3. Clear the buffer, apply brightness, advance the frame counter.
//! 4. Render with the generator bound to the snapshot's mode. A panic is
//!    caught: the frame is blanked and only that generator is reset.
//! 5. Present to the sink. Commit failures are logged and the next tick
//!    proceeds.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use panelfx_core::{
    EngineConfig, ImageLoader, ImageStatus, ModeState, ModeTag, StaticWeatherProvider,
    SystemClock, WallClock, WeatherProvider, WeatherStatus,
};
use panelfx_modes::{Generators, PacmanStats, RenderContext};
use panelfx_render::{DisplaySink, MonoFontRenderer, PixelBuffer, SinkError, TextRenderer};
use serde::Serialize;
use tracing::{debug, error, trace, warn};

use crate::control::ControlHandle;
use crate::images::ImageCache;
use crate::weather::WeatherCache;

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub frame: u64,
    pub mode: ModeTag,
    /// The generator panicked and the frame was blanked.
    pub panicked: bool,
    /// The sink accepted the frame.
    pub committed: bool,
}

/// Engine summary for the control layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    pub frame: u64,
    pub mode: ModeTag,
    pub running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pacman: Option<PacmanStats>,
}

#[cfg(feature = "image")]
fn default_image_loader() -> Arc<dyn ImageLoader> {
    Arc::new(panelfx_core::DecodingImageLoader)
}

#[cfg(not(feature = "image"))]
fn default_image_loader() -> Arc<dyn ImageLoader> {
    Arc::new(panelfx_core::StaticImageLoader::failing())
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

/// Drives one panel.
pub struct Engine<S: DisplaySink> {
    sink: S,
    buffer: PixelBuffer,
    generators: Generators,
    control: ControlHandle,
    frame: u64,
    mode: ModeTag,
    font: Box<dyn TextRenderer>,
    clock: Arc<dyn WallClock>,
    weather: WeatherCache,
    images: ImageCache,
}

impl<S: DisplaySink> Engine<S> {
    /// Build an engine for `config`, presenting to `sink`.
    ///
    /// Without a seed in `config` generators are seeded from the OS.
    pub fn new(config: &EngineConfig, sink: S) -> Self {
        if sink.width() != config.width || sink.height() != config.height {
            warn!(
                sink_width = sink.width(),
                sink_height = sink.height(),
                width = config.width,
                height = config.height,
                "sink size differs from configured panel size"
            );
        }
        let generators = match config.seed {
            Some(seed) => Generators::new(seed),
            None => Generators::from_entropy(),
        };
        let mut state = ModeState::with_mode(config.initial_mode);
        state.set_brightness(config.brightness);

        Self {
            sink,
            buffer: PixelBuffer::new(config.width, config.height),
            generators,
            control: ControlHandle::new(state),
            frame: 0,
            mode: config.initial_mode,
            font: Box::new(MonoFontRenderer::new(config.font)),
            clock: Arc::new(SystemClock::new(config.utc_offset_minutes)),
            weather: WeatherCache::new(
                Arc::new(StaticWeatherProvider::new()),
                config.weather_refresh(),
            ),
            images: ImageCache::new(default_image_loader()),
        }
    }

    #[must_use]
    pub fn with_font(mut self, font: Box<dyn TextRenderer>) -> Self {
        self.font = font;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn WallClock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the weather provider, keeping the refresh interval.
    #[must_use]
    pub fn with_weather_provider(
        mut self,
        provider: Arc<dyn WeatherProvider>,
        config: &EngineConfig,
    ) -> Self {
        self.weather = WeatherCache::new(provider, config.weather_refresh());
        self
    }

    #[must_use]
    pub fn with_image_loader(mut self, loader: Arc<dyn ImageLoader>) -> Self {
        self.images = ImageCache::new(loader);
        self
    }

    /// A handle onto this engine's mode state.
    pub fn control(&self) -> ControlHandle {
        self.control.clone()
    }

    /// Produce and present one frame.
    pub fn tick(&mut self) -> TickReport {
        let snapshot = self.control.get_state();
        let mode = snapshot.mode;
        if mode != self.mode {
            debug!(from = %self.mode, to = %mode, "switching generator");
            self.mode = mode;
        }

        let (width, height) = (self.buffer.width(), self.buffer.height());
        let weather = if mode == ModeTag::Weather {
            self.weather.status(snapshot.weather_location.as_deref())
        } else {
            WeatherStatus::default()
        };
        let image = if mode == ModeTag::Image {
            self.images
                .status(snapshot.image_path.as_deref(), width, height)
        } else {
            ImageStatus::default()
        };

        self.buffer.clear();
        self.buffer.set_brightness(snapshot.brightness);
        self.frame += 1;

        let ctx = RenderContext {
            width,
            height,
            frame: self.frame,
            brightness: snapshot.brightness,
            text: &snapshot.text,
            options: &snapshot.options,
            time: self.clock.now(),
            font: self.font.as_ref(),
            weather: &weather,
            image: &image,
        };
        let generator = self.generators.get_mut(mode);
        let buffer = &mut self.buffer;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| generator.render(ctx, buffer)));

        let panicked = match outcome {
            Ok(()) => false,
            Err(payload) => {
                error!(
                    %mode,
                    frame = self.frame,
                    panic = panic_message(payload.as_ref()),
                    "generator panicked, resetting it"
                );
                self.buffer.clear();
                self.generators.reset(mode);
                true
            }
        };

        let committed = match self.sink.present(&self.buffer) {
            Ok(()) => true,
            Err(err) => {
                warn!(frame = self.frame, error = %err, "sink commit failed");
                false
            }
        };
        trace!(frame = self.frame, %mode, lit = self.buffer.lit_pixels(), "tick");

        TickReport {
            frame: self.frame,
            mode,
            panicked,
            committed,
        }
    }

    /// Clear the panel.
    pub fn blank(&mut self) -> Result<(), SinkError> {
        self.buffer.clear();
        self.sink.blank()
    }

    /// Let in-flight weather and image work finish.
    pub fn join_background(&mut self) {
        self.weather.join();
        self.images.join();
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            frame: self.frame,
            mode: self.mode,
            running: false,
            pacman: self.generators.pacman_stats(),
        }
    }

    /// Frames produced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The last rendered frame.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn generators(&self) -> &Generators {
        &self.generators
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
