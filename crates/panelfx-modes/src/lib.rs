#![forbid(unsafe_code)]

//! Procedural generators, one per display mode.
//!
//! Every generator implements [`Generator`]: it owns its private state,
//! initializes it lazily on first render or when the panel size (or a
//! size-affecting option) changes, and paints one frame per call into the
//! caller's [`PixelBuffer`].
//!
//! # Invariants
//!
//! - `render` with `width == 0` or `height == 0` is a no-op.
//! - Generators never fail; structural mismatches trigger reinitialization.
//! - Private state survives while other modes are active.
//! - Randomness comes from a per-generator seeded `StdRng`, so a fixed seed
//!   reproduces every frame.

use panelfx_core::{ImageStatus, LocalTime, ModeOptions, WeatherStatus};
use panelfx_render::{PixelBuffer, Rgb, TextRenderer};

pub mod clock;
pub mod fire;
pub mod image;
pub mod life;
pub mod maze;
pub mod pacman;
pub mod plasma;
pub mod pulse;
pub mod rainbow;
pub mod registry;
pub mod spectrum;
pub mod squares;
pub mod text;
pub mod weather;

pub use clock::BouncingClock;
pub use fire::Fire;
pub use image::ImageMode;
pub use life::Life;
pub use maze::{Maze, MazeGrid, MazePhase};
pub use pacman::{Pacman, PacmanGame, PacmanStats};
pub use plasma::Plasma;
pub use pulse::Pulse;
pub use rainbow::Rainbow;
pub use registry::{Blank, Generators};
pub use spectrum::Spectrum;
pub use squares::RotatingSquares;
pub use text::{ScrollText, StaticText};
pub use weather::WeatherMode;

/// Everything a generator may read while rendering one frame.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub width: u16,
    pub height: u16,
    /// Global frame counter. Never resets during a run.
    pub frame: u64,
    /// Brightness percent, `0..=100`.
    pub brightness: u8,
    /// Text for Text and Scroll modes.
    pub text: &'a str,
    pub options: &'a ModeOptions,
    /// Local time of day for the clock.
    pub time: LocalTime,
    pub font: &'a dyn TextRenderer,
    pub weather: &'a WeatherStatus,
    pub image: &'a ImageStatus,
}

impl RenderContext<'_> {
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Brightness as an HSV value in `[0, 1]`.
    #[inline]
    pub fn value(&self) -> f64 {
        f64::from(self.brightness.min(100)) / 100.0
    }

    /// Scale a color by the brightness.
    #[inline]
    pub fn dim(&self, color: Rgb) -> Rgb {
        color.scale(self.brightness)
    }
}

/// A display mode's frame generator.
pub trait Generator: Send {
    /// Human-readable name (used for logging).
    fn name(&self) -> &'static str;

    /// Optional hook to (re)allocate state for a new panel size.
    fn resize(&mut self, _width: u16, _height: u16) {}

    /// Drop all private state; the next render starts fresh.
    fn reset(&mut self);

    /// Paint one frame into `buf`. The buffer arrives cleared.
    fn render(&mut self, ctx: RenderContext<'_>, buf: &mut PixelBuffer);
}

/// Draw `text` centered on the panel.
pub(crate) fn draw_centered(ctx: &RenderContext<'_>, buf: &mut PixelBuffer, text: &str, color: Rgb) {
    let tw = ctx.font.measure_text(text) as i32;
    let th = ctx.font.line_height() as i32;
    let x = (i32::from(ctx.width) - tw) / 2;
    let y = (i32::from(ctx.height) - th) / 2;
    ctx.font.draw_text(buf, text, x, y, color);
}

#[cfg(test)]
pub(crate) mod test_support {
    use panelfx_core::{ImageStatus, LocalTime, ModeOptions, WeatherStatus};
    use panelfx_render::{FontSize, MonoFontRenderer};

    use super::RenderContext;

    /// Owns everything a [`RenderContext`] borrows.
    pub struct Fixture {
        pub options: ModeOptions,
        pub text: String,
        pub brightness: u8,
        pub time: LocalTime,
        pub font: MonoFontRenderer,
        pub weather: WeatherStatus,
        pub image: ImageStatus,
    }

    impl Default for Fixture {
        fn default() -> Self {
            Self {
                options: ModeOptions::default(),
                text: "HELLO".into(),
                brightness: 100,
                time: LocalTime::new(10, 9, 8),
                font: MonoFontRenderer::new(FontSize::Small),
                weather: WeatherStatus::default(),
                image: ImageStatus::default(),
            }
        }
    }

    impl Fixture {
        pub fn ctx(&self, width: u16, height: u16, frame: u64) -> RenderContext<'_> {
            RenderContext {
                width,
                height,
                frame,
                brightness: self.brightness,
                text: &self.text,
                options: &self.options,
                time: self.time,
                font: &self.font,
                weather: &self.weather,
                image: &self.image,
            }
        }
    }
}
