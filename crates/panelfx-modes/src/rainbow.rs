#![forbid(unsafe_code)]

//! Horizontally scrolling rainbow.

use panelfx_render::{PixelBuffer, Rgb, hsv_to_rgb};

use crate::{Generator, RenderContext};

/// Every column gets hue `((x + frame) mod W) / W`; all rows match.
#[derive(Debug, Clone, Default)]
pub struct Rainbow {
    row: Vec<Rgb>,
}

impl Rainbow {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Generator for Rainbow {
    fn name(&self) -> &'static str {
        "Rainbow"
    }

    fn reset(&mut self) {
        self.row.clear();
    }

    fn render(&mut self, ctx: RenderContext<'_>, buf: &mut PixelBuffer) {
        if ctx.is_empty() {
            return;
        }
        let w = u64::from(ctx.width);
        let v = ctx.value();

        self.row.clear();
        self.row.extend((0..w).map(|x| {
            let hue = ((x + ctx.frame) % w) as f64 / w as f64;
            hsv_to_rgb(hue, 1.0, v)
        }));

        for y in 0..i32::from(ctx.height) {
            for (x, &c) in self.row.iter().enumerate() {
                buf.set_pixel(x as i32, y, c);
            }
        }
    }
}
