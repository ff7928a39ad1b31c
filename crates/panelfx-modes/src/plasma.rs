#![forbid(unsafe_code)]

//! Plasma interference fields.
//!
//! Four selectable wave functions, each normalized to a hue in `[0, 1]` and
//! drawn at full saturation with value = brightness. Time advances as
//! `t = frame * 0.1`.

use panelfx_core::PlasmaPattern;
use panelfx_render::{PixelBuffer, hsv_to_rgb};

use crate::{Generator, RenderContext};

/// Classic: four summed sines including a radial term, mapped by `(v + 4) / 8`.
#[inline]
pub fn classic(x: f64, y: f64, cx: f64, cy: f64, t: f64) -> f64 {
    let r = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
    let v = (x / 16.0 + t).sin()
        + (y / 8.0 + t).sin()
        + ((x + y) / 16.0 + t).sin()
        + (r / 8.0 + t).sin();
    (v + 4.0) / 8.0
}

/// Waves: product of orthogonal sines, mapped by `(v + 1) / 2`.
#[inline]
pub fn waves(x: f64, y: f64, t: f64) -> f64 {
    let v = (x / 8.0 + t).sin() * (y / 8.0 + t * 0.7).sin();
    (v + 1.0) / 2.0
}

/// Cellular: two orbiting point sources, mapped by `(v + 2) / 4`.
#[inline]
pub fn cellular(x: f64, y: f64, w: f64, h: f64, t: f64) -> f64 {
    let (cx, cy) = (w / 2.0, h / 2.0);
    let p1 = (cx + (t * 0.7).cos() * w / 3.0, cy + (t * 0.9).sin() * h / 3.0);
    let p2 = (
        cx + (t * 1.1 + std::f64::consts::PI).cos() * w / 3.0,
        cy + (t * 0.6 + std::f64::consts::PI).sin() * h / 3.0,
    );
    let d1 = ((x - p1.0).powi(2) + (y - p1.1).powi(2)).sqrt();
    let d2 = ((x - p2.0).powi(2) + (y - p2.1).powi(2)).sqrt();
    let v = (d1 / 6.0 - t).sin() + (d2 / 6.0 - t).sin();
    (v + 2.0) / 4.0
}

/// Psychedelic: higher-frequency four-term sum plus a slow hue drift.
#[inline]
pub fn psychedelic(x: f64, y: f64, cx: f64, cy: f64, t: f64) -> f64 {
    let r = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
    let v = (x / 4.0 + t * 1.5).sin()
        + (y / 3.0 - t).sin()
        + ((x + y) / 5.0 + t * 2.0).sin()
        + (r / 4.0 - t * 1.3).sin();
    (v + 4.0) / 8.0 + t * 0.05
}

/// Stateless plasma generator; the pattern comes from the options.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plasma;

impl Plasma {
    pub fn new() -> Self {
        Self
    }

    /// Hue in `[0, 1)` at `(x, y)` for `pattern`.
    pub fn hue(pattern: PlasmaPattern, x: f64, y: f64, w: f64, h: f64, t: f64) -> f64 {
        let (cx, cy) = (w / 2.0, h / 2.0);
        let raw = match pattern {
            PlasmaPattern::Classic => classic(x, y, cx, cy, t),
            PlasmaPattern::Waves => waves(x, y, t),
            PlasmaPattern::Cellular => cellular(x, y, w, h, t),
            PlasmaPattern::Psychedelic => psychedelic(x, y, cx, cy, t),
        };
        raw.rem_euclid(1.0)
    }
}

impl Generator for Plasma {
    fn name(&self) -> &'static str {
        "Plasma"
    }

    fn reset(&mut self) {}

    fn render(&mut self, ctx: RenderContext<'_>, buf: &mut PixelBuffer) {
        if ctx.is_empty() {
            return;
        }
        let pattern = ctx.options.plasma.pattern;
        let t = ctx.frame as f64 * 0.1;
        let (w, h) = (f64::from(ctx.width), f64::from(ctx.height));
        let v = ctx.value();

        for y in 0..ctx.height {
            for x in 0..ctx.width {
                let hue = Self::hue(pattern, f64::from(x), f64::from(y), w, h, t);
                buf.set_pixel(i32::from(x), i32::from(y), hsv_to_rgb(hue, 1.0, v));
            }
        }
    }
}
