#![forbid(unsafe_code)]

//! Static and scrolling text.

use panelfx_render::{PixelBuffer, Rgb, hsv_to_rgb};

use crate::{Generator, RenderContext, draw_centered};

/// Centered text in green.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticText;

impl StaticText {
    pub const COLOR: Rgb = Rgb::GREEN;

    pub fn new() -> Self {
        Self
    }
}

impl Generator for StaticText {
    fn name(&self) -> &'static str {
        "Text"
    }

    fn reset(&mut self) {}

    fn render(&mut self, ctx: RenderContext<'_>, buf: &mut PixelBuffer) {
        if ctx.is_empty() || ctx.text.is_empty() {
            return;
        }
        draw_centered(&ctx, buf, ctx.text, Self::COLOR);
    }
}

/// Text entering from the right edge and leaving on the left, one pixel per
/// frame, then starting over.
#[derive(Debug, Clone, Default)]
pub struct ScrollText {
    offset: i32,
}

impl ScrollText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pixels scrolled since the text last entered.
    pub fn offset(&self) -> i32 {
        self.offset
    }
}

impl Generator for ScrollText {
    fn name(&self) -> &'static str {
        "Scroll"
    }

    fn reset(&mut self) {
        self.offset = 0;
    }

    fn render(&mut self, ctx: RenderContext<'_>, buf: &mut PixelBuffer) {
        if ctx.is_empty() || ctx.text.is_empty() {
            return;
        }
        let w = i32::from(ctx.width);
        let tw = ctx.font.measure_text(ctx.text) as i32;
        let y = (i32::from(ctx.height) - ctx.font.line_height() as i32) / 2;
        let color = hsv_to_rgb((ctx.frame as f64 * 0.005).fract(), 1.0, 1.0);

        ctx.font.draw_text(buf, ctx.text, w - self.offset, y, color);

        self.offset += 1;
        if self.offset > w + tw {
            self.offset = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;

    fn lit_columns(buf: &PixelBuffer) -> Vec<u16> {
        let mut cols: Vec<u16> = buf.iter().filter(|(_, _, c)| !c.is_black()).map(|(x, _, _)| x).collect();
        cols.sort_unstable();
        cols.dedup();
        cols
    }

    #[test]
    fn static_text_is_green_and_centered() {
        let fx = Fixture::default();
        let mut buf = PixelBuffer::new(64, 16);
        StaticText.render(fx.ctx(64, 16, 1), &mut buf);
        assert!(buf.iter().all(|(_, _, c)| c.is_black() || c == Rgb::GREEN));
        let cols = lit_columns(&buf);
        // "HELLO" is 25 px wide: columns 19..=43.
        assert!(*cols.first().unwrap() >= 19);
        assert!(*cols.last().unwrap() <= 43);
    }

    #[test]
    fn empty_text_draws_nothing() {
        let mut fx = Fixture::default();
        fx.text.clear();
        let mut buf = PixelBuffer::new(32, 16);
        StaticText.render(fx.ctx(32, 16, 1), &mut buf);
        ScrollText::new().render(fx.ctx(32, 16, 1), &mut buf);
        assert!(buf.is_cleared());
    }

    #[test]
    fn scroll_moves_left_one_pixel_per_frame() {
        let fx = Fixture::default();
        let mut scroll = ScrollText::new();
        let mut first = None;
        for frame in 1..=12 {
            let mut buf = PixelBuffer::new(32, 16);
            scroll.render(fx.ctx(32, 16, frame), &mut buf);
            let cols = lit_columns(&buf);
            if let Some(&left) = cols.first() {
                match first {
                    None => first = Some((frame, left)),
                    Some((f0, l0)) => assert_eq!(i64::from(left), i64::from(l0) - (frame - f0) as i64),
                }
            }
        }
        assert!(first.is_some());
    }

    #[test]
    fn scroll_wraps_after_leaving() {
        let fx = Fixture::default();
        let mut scroll = ScrollText::new();
        let mut buf = PixelBuffer::new(32, 16);
        // 32 px panel + 25 px text.
        for frame in 0..=57 {
            scroll.render(fx.ctx(32, 16, frame), &mut buf);
        }
        assert_eq!(scroll.offset(), 0);
        scroll.render(fx.ctx(32, 16, 58), &mut buf);
        assert_eq!(scroll.offset(), 1);
    }
}
