#![forbid(unsafe_code)]

//! Bouncing clock.
//!
//! The time string drifts at a constant velocity and reflects off the panel
//! edges. Bounds use the measured text box, so glyphs never clip unless the
//! text is wider (or taller) than the panel, in which case that axis is
//! pinned to 0.

use panelfx_core::ClockColor;
use panelfx_render::{PixelBuffer, Rgb, hsv_to_rgb};

use crate::{Generator, RenderContext};

/// Pixels per frame.
pub const VELOCITY: (f64, f64) = (0.6, 0.35);

/// Bouncing clock state.
#[derive(Debug, Clone, Default)]
pub struct BouncingClock {
    pos: Option<(f64, f64)>,
    vel: (f64, f64),
    panel: (u16, u16),
}

impl BouncingClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-left of the text box, if placed.
    pub fn position(&self) -> Option<(f64, f64)> {
        self.pos
    }

    /// Advance one axis, reflecting at `0` and `max`.
    fn bounce(pos: &mut f64, vel: &mut f64, max: f64) {
        if max <= 0.0 {
            *pos = 0.0;
            return;
        }
        *pos += *vel;
        if *pos <= 0.0 {
            *pos = 0.0;
            *vel = vel.abs();
        } else if *pos >= max {
            *pos = max;
            *vel = -vel.abs();
        }
    }

    /// Color for the given option and frame.
    pub fn color(color: ClockColor, frame: u64) -> Rgb {
        match color {
            ClockColor::Solid => Rgb::GOLD,
            ClockColor::Rainbow => hsv_to_rgb((frame as f64 * 0.01).fract(), 1.0, 1.0),
        }
    }
}

impl Generator for BouncingClock {
    fn name(&self) -> &'static str {
        "Clock"
    }

    fn reset(&mut self) {
        self.pos = None;
    }

    fn render(&mut self, ctx: RenderContext<'_>, buf: &mut PixelBuffer) {
        if ctx.is_empty() {
            return;
        }
        let opts = ctx.options.clock;
        let text = ctx.time.format(opts.format);
        let max_x = f64::from(ctx.width) - f64::from(ctx.font.measure_text(&text));
        let max_y = f64::from(ctx.height) - f64::from(ctx.font.line_height());

        if self.panel != (ctx.width, ctx.height) {
            self.pos = None;
            self.panel = (ctx.width, ctx.height);
        }
        let (mut x, mut y) = self.pos.unwrap_or_else(|| {
            self.vel = VELOCITY;
            ((max_x / 2.0).max(0.0), (max_y / 2.0).max(0.0))
        });
        // The 12-hour string is wider; keep the box inside after a switch.
        x = x.min(max_x.max(0.0));
        y = y.min(max_y.max(0.0));

        Self::bounce(&mut x, &mut self.vel.0, max_x);
        Self::bounce(&mut y, &mut self.vel.1, max_y);
        self.pos = Some((x, y));

        let color = Self::color(opts.color, ctx.frame);
        ctx.font
            .draw_text(buf, &text, x.round() as i32, y.round() as i32, color);
    }
}
