#![forbid(unsafe_code)]

//! Whole-panel breathing color.

use panelfx_render::{PixelBuffer, hsv_to_rgb};

use crate::{Generator, RenderContext};

/// Hue cycles slowly; value breathes with `(sin(frame * 0.1) + 1) / 2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pulse;

impl Pulse {
    /// Hue advance per frame.
    const HUE_DRIFT: f64 = 0.005;

    pub fn new() -> Self {
        Self
    }

    /// Breathing envelope in `[0, 1]` for `frame`.
    pub fn envelope(frame: u64) -> f64 {
        ((frame as f64 * 0.1).sin() + 1.0) / 2.0
    }
}

impl Generator for Pulse {
    fn name(&self) -> &'static str {
        "Pulse"
    }

    fn reset(&mut self) {}

    fn render(&mut self, ctx: RenderContext<'_>, buf: &mut PixelBuffer) {
        if ctx.is_empty() {
            return;
        }
        let hue = (ctx.frame as f64 * Self::HUE_DRIFT).fract();
        let value = Self::envelope(ctx.frame) * ctx.value();
        buf.fill(hsv_to_rgb(hue, 1.0, value));
    }
}
