#![forbid(unsafe_code)]

//! Bitmap text for the panel.
//!
//! Generators only see the [`TextRenderer`] trait. [`MonoFontRenderer`]
//! implements it with the ASCII mono fonts shipped by `embedded-graphics`,
//! drawing through a small [`DrawTarget`] adapter over [`PixelBuffer`].

use std::convert::Infallible;

use embedded_graphics::Drawable;
use embedded_graphics::Pixel;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Point, Size};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, ascii};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::text::{Baseline, Text};

use crate::buffer::PixelBuffer;
use crate::color::Rgb;

/// Measures and draws single-line text.
pub trait TextRenderer: Send + Sync {
    /// Width in pixels of `text` when drawn.
    fn measure_text(&self, text: &str) -> u32;

    /// Height in pixels of one line.
    fn line_height(&self) -> u32;

    /// Draw `text` with its top-left corner at `(x, y)`. Glyph pixels outside
    /// the buffer are clipped.
    fn draw_text(&self, buf: &mut PixelBuffer, text: &str, x: i32, y: i32, color: Rgb);
}

/// Which bundled font a [`MonoFontRenderer`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FontSize {
    /// 5x7 glyphs; fits `hh:mm:ss AM` on a 64 px panel.
    #[default]
    Small,
    /// 6x10 glyphs.
    Medium,
    /// 10x20 glyphs.
    Large,
}

impl FontSize {
    fn font(self) -> &'static MonoFont<'static> {
        match self {
            FontSize::Small => &ascii::FONT_5X7,
            FontSize::Medium => &ascii::FONT_6X10,
            FontSize::Large => &ascii::FONT_10X20,
        }
    }

    /// Parse `small` / `medium` / `large` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Some(FontSize::Small),
            "medium" => Some(FontSize::Medium),
            "large" => Some(FontSize::Large),
            _ => None,
        }
    }
}

/// [`TextRenderer`] backed by an `embedded-graphics` ASCII mono font.
#[derive(Debug, Clone, Copy)]
pub struct MonoFontRenderer {
    font: &'static MonoFont<'static>,
}

impl MonoFontRenderer {
    pub fn new(size: FontSize) -> Self {
        Self { font: size.font() }
    }

    /// Glyph cell width including inter-character spacing.
    fn advance(&self) -> u32 {
        self.font.character_size.width + self.font.character_spacing
    }
}

impl Default for MonoFontRenderer {
    fn default() -> Self {
        Self::new(FontSize::default())
    }
}

impl TextRenderer for MonoFontRenderer {
    fn measure_text(&self, text: &str) -> u32 {
        let n = text.chars().count() as u32;
        if n == 0 {
            return 0;
        }
        n * self.advance() - self.font.character_spacing
    }

    fn line_height(&self) -> u32 {
        self.font.character_size.height
    }

    fn draw_text(&self, buf: &mut PixelBuffer, text: &str, x: i32, y: i32, color: Rgb) {
        if text.is_empty() || buf.is_empty() {
            return;
        }
        let style = MonoTextStyle::new(self.font, Rgb888::new(color.r(), color.g(), color.b()));
        let mut target = BufferTarget(buf);
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(&mut target)
            .ok();
    }
}

/// `DrawTarget` view over a pixel buffer.
struct BufferTarget<'a>(&'a mut PixelBuffer);

impl OriginDimensions for BufferTarget<'_> {
    fn size(&self) -> Size {
        Size::new(self.0.width() as u32, self.0.height() as u32)
    }
}

impl DrawTarget for BufferTarget<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.0
                .set_pixel(point.x, point.y, Rgb::new(color.r(), color.g(), color.b()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_uses_glyph_advance() {
        let r = MonoFontRenderer::new(FontSize::Small);
        assert_eq!(r.measure_text(""), 0);
        assert_eq!(r.measure_text("A"), 5);
        assert_eq!(r.measure_text("12:34:56 AM"), 55);
        assert_eq!(r.line_height(), 7);
    }

    #[test]
    fn larger_fonts_measure_wider() {
        let small = MonoFontRenderer::new(FontSize::Small);
        let large = MonoFontRenderer::new(FontSize::Large);
        assert!(large.measure_text("HELLO") > small.measure_text("HELLO"));
        assert!(large.line_height() > small.line_height());
    }

    #[test]
    fn draw_paints_inside_measured_box() {
        let r = MonoFontRenderer::new(FontSize::Small);
        let mut buf = PixelBuffer::new(40, 20);
        r.draw_text(&mut buf, "HI", 3, 4, Rgb::GREEN);
        assert!(buf.lit_pixels() > 0);
        let w = r.measure_text("HI") as u16;
        let h = r.line_height() as u16;
        for (x, y, c) in buf.iter() {
            if !c.is_black() {
                assert_eq!(c, Rgb::GREEN);
                assert!((3..3 + w).contains(&x), "x {x}");
                assert!((4..4 + h).contains(&y), "y {y}");
            }
        }
    }

    #[test]
    fn draw_clips_at_edges() {
        let r = MonoFontRenderer::default();
        let mut buf = PixelBuffer::new(4, 4);
        r.draw_text(&mut buf, "WWWW", -2, -3, Rgb::WHITE);
        r.draw_text(&mut buf, "WWWW", 100, 100, Rgb::WHITE);
    }

    #[test]
    fn font_size_parse() {
        assert_eq!(FontSize::parse("Large"), Some(FontSize::Large));
        assert_eq!(FontSize::parse(" small "), Some(FontSize::Small));
        assert_eq!(FontSize::parse("huge"), None);
    }
}
