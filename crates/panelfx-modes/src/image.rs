#![forbid(unsafe_code)]

//! Still image display.

use panelfx_render::{Draw, PixelBuffer, Rgb};

use crate::{Generator, RenderContext, draw_centered};

/// Blits the cached decoded image, centered. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageMode;

impl ImageMode {
    pub fn new() -> Self {
        Self
    }
}

impl Generator for ImageMode {
    fn name(&self) -> &'static str {
        "Image"
    }

    fn reset(&mut self) {}

    fn render(&mut self, ctx: RenderContext<'_>, buf: &mut PixelBuffer) {
        if ctx.is_empty() {
            return;
        }
        if let Some(frame) = ctx.image.frame() {
            let x = (i32::from(ctx.width) - i32::from(frame.width())) / 2;
            let y = (i32::from(ctx.height) - i32::from(frame.height())) / 2;
            buf.blit(frame, x, y);
        } else if let Some(text) = ctx.image.placeholder() {
            draw_centered(&ctx, buf, text, Rgb::WHITE);
        }
    }
}
