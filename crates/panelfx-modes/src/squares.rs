#![forbid(unsafe_code)]

//! Concentric rotating squares.

use std::f64::consts::TAU;

use panelfx_render::{Draw, PixelBuffer, hsv_to_rgb};

use crate::{Generator, RenderContext};

/// Squares of side 10, 25, 40, ... up to `min(W, H)`, rotated about the
/// panel center by `frame * 0.05` radians.
#[derive(Debug, Clone, Copy, Default)]
pub struct RotatingSquares;

impl RotatingSquares {
    pub const FIRST_SIZE: u16 = 10;
    pub const SIZE_STEP: u16 = 15;

    pub fn new() -> Self {
        Self
    }

    /// Side lengths drawn for a panel whose shorter edge is `min_dim`.
    pub fn sizes(min_dim: u16) -> impl Iterator<Item = u16> {
        (Self::FIRST_SIZE..=min_dim).step_by(Self::SIZE_STEP as usize)
    }

    /// Corners of a square of side `size` centered on `(cx, cy)` rotated by `angle`.
    pub fn corners(cx: f64, cy: f64, size: f64, angle: f64) -> [(i32, i32); 4] {
        let half = size / 2.0;
        let (sin, cos) = angle.sin_cos();
        [(-half, -half), (half, -half), (half, half), (-half, half)].map(|(dx, dy)| {
            let x = cx + dx * cos - dy * sin;
            let y = cy + dx * sin + dy * cos;
            (x.round() as i32, y.round() as i32)
        })
    }
}

impl Generator for RotatingSquares {
    fn name(&self) -> &'static str {
        "Rotating Squares"
    }

    fn reset(&mut self) {}

    fn render(&mut self, ctx: RenderContext<'_>, buf: &mut PixelBuffer) {
        if ctx.is_empty() {
            return;
        }
        let min_dim = ctx.width.min(ctx.height);
        let cx = f64::from(ctx.width - 1) / 2.0;
        let cy = f64::from(ctx.height - 1) / 2.0;
        let angle = (ctx.frame as f64 * 0.05) % TAU;
        let v = ctx.value();

        for size in Self::sizes(min_dim) {
            let hue = (f64::from(size) / f64::from(min_dim) + ctx.frame as f64 * 0.01).fract();
            let color = hsv_to_rgb(hue, 1.0, v);
            let c = Self::corners(cx, cy, f64::from(size), angle);
            for i in 0..4 {
                let (x0, y0) = c[i];
                let (x1, y1) = c[(i + 1) % 4];
                buf.draw_line(x0, y0, x1, y1, color);
            }
        }
    }
}
