#![forbid(unsafe_code)]

//! Raster primitives for the pixel buffer.
//!
//! Every operation goes through [`PixelBuffer::set_pixel`], so shapes that
//! extend past the panel edge are clipped pixel by pixel and never fail.

use crate::buffer::{ImageFrame, PixelBuffer};
use crate::color::Rgb;

/// Extension trait for drawing on a [`PixelBuffer`].
pub trait Draw {
    /// Draw a line with integer Bresenham. Both endpoints are painted.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb);

    /// Draw a horizontal run of `len` pixels starting at `(x, y)`.
    fn draw_hline(&mut self, x: i32, y: i32, len: i32, color: Rgb);

    /// Draw a vertical run of `len` pixels starting at `(x, y)`.
    fn draw_vline(&mut self, x: i32, y: i32, len: i32, color: Rgb);

    /// Fill a `w x h` rectangle whose top-left corner is `(x, y)`.
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb);

    /// Draw the 1-pixel outline of a `w x h` rectangle.
    fn draw_rect_outline(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb);

    /// Draw a circle outline with the midpoint algorithm.
    ///
    /// A radius of zero paints the center pixel only.
    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgb);

    /// Copy `image` with its top-left corner at `(x, y)`, clipped to the buffer.
    fn blit(&mut self, image: &ImageFrame, x: i32, y: i32);
}

impl Draw for PixelBuffer {
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx: i32 = if x0 < x1 { 1 } else { -1 };
        let sy: i32 = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut cx = x0;
        let mut cy = y0;

        loop {
            self.set_pixel(cx, cy, color);

            if cx == x1 && cy == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                if cx == x1 {
                    break;
                }
                err += dy;
                cx += sx;
            }
            if e2 <= dx {
                if cy == y1 {
                    break;
                }
                err += dx;
                cy += sy;
            }
        }
    }

    fn draw_hline(&mut self, x: i32, y: i32, len: i32, color: Rgb) {
        for i in 0..len.max(0) {
            self.set_pixel(x.saturating_add(i), y, color);
        }
    }

    fn draw_vline(&mut self, x: i32, y: i32, len: i32, color: Rgb) {
        for i in 0..len.max(0) {
            self.set_pixel(x, y.saturating_add(i), color);
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        if w <= 0 || h <= 0 {
            return;
        }
        // Clip up front so huge rectangles do not loop over off-panel pixels.
        let x_start = x.max(0);
        let y_start = y.max(0);
        let x_end = x.saturating_add(w).min(self.width() as i32);
        let y_end = y.saturating_add(h).min(self.height() as i32);
        for py in y_start..y_end {
            for px in x_start..x_end {
                self.set_pixel(px, py, color);
            }
        }
    }

    fn draw_rect_outline(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        if w <= 0 || h <= 0 {
            return;
        }

        // Top
        self.draw_hline(x, y, w, color);

        // Bottom
        if h > 1 {
            self.draw_hline(x, y + h - 1, w, color);
        }

        // Left (excluding corners)
        if h > 2 {
            self.draw_vline(x, y + 1, h - 2, color);
        }

        // Right (excluding corners)
        if w > 1 && h > 2 {
            self.draw_vline(x + w - 1, y + 1, h - 2, color);
        }
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgb) {
        if radius <= 0 {
            self.set_pixel(cx, cy, color);
            return;
        }

        let mut x = radius;
        let mut y = 0;
        let mut d = 1 - radius;

        while x >= y {
            for (px, py) in [
                (cx + x, cy + y),
                (cx - x, cy + y),
                (cx + x, cy - y),
                (cx - x, cy - y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx + y, cy - x),
                (cx - y, cy - x),
            ] {
                self.set_pixel(px, py, color);
            }
            y += 1;
            if d < 0 {
                d += 2 * y + 1;
            } else {
                x -= 1;
                d += 2 * (y - x) + 1;
            }
        }
    }

    fn blit(&mut self, image: &ImageFrame, x: i32, y: i32) {
        for iy in 0..image.height() {
            for ix in 0..image.width() {
                if let Some(c) = image.get(ix, iy) {
                    self.set_pixel(x + ix as i32, y + iy as i32, c);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(buf: &PixelBuffer) -> Vec<(u16, u16)> {
        buf.iter()
            .filter(|(_, _, c)| !c.is_black())
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn horizontal_line_paints_both_endpoints() {
        let mut buf = PixelBuffer::new(10, 10);
        buf.draw_line(0, 0, 5, 0, Rgb::WHITE);
        assert_eq!(
            lit(&buf),
            vec![(0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (5, 0)]
        );
    }

    #[test]
    fn reversed_line_matches_forward() {
        let mut a = PixelBuffer::new(10, 10);
        let mut b = PixelBuffer::new(10, 10);
        a.draw_line(0, 0, 7, 0, Rgb::WHITE);
        b.draw_line(7, 0, 0, 0, Rgb::WHITE);
        assert_eq!(a, b);
    }

    #[test]
    fn diagonal_line() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.draw_line(0, 0, 3, 3, Rgb::WHITE);
        assert_eq!(lit(&buf), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn line_outside_bounds_draws_nothing() {
        let mut buf = PixelBuffer::new(8, 8);
        buf.draw_line(-20, -5, -2, -40, Rgb::WHITE);
        buf.draw_line(100, 100, 200, 120, Rgb::WHITE);
        assert!(buf.is_cleared());
    }

    #[test]
    fn line_crossing_edge_is_clipped() {
        let mut buf = PixelBuffer::new(4, 1);
        buf.draw_line(-3, 0, 10, 0, Rgb::WHITE);
        assert_eq!(buf.lit_pixels(), 4);
    }

    #[test]
    fn single_point_line() {
        let mut buf = PixelBuffer::new(3, 3);
        buf.draw_line(1, 1, 1, 1, Rgb::WHITE);
        assert_eq!(lit(&buf), vec![(1, 1)]);
    }

    #[test]
    fn rect_outline_leaves_interior() {
        let mut buf = PixelBuffer::new(10, 10);
        buf.draw_rect_outline(2, 2, 4, 3, Rgb::WHITE);
        for x in 2..6 {
            assert!(buf.get(x, 2).is_some_and(|c| !c.is_black()), "top ({x}, 2)");
            assert!(buf.get(x, 4).is_some_and(|c| !c.is_black()), "bottom ({x}, 4)");
        }
        assert_eq!(buf.get(3, 3), Some(Rgb::BLACK));
        assert_eq!(buf.get(4, 3), Some(Rgb::BLACK));
        assert_eq!(buf.lit_pixels(), 10);
    }

    #[test]
    fn fill_rect_clips() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.fill_rect(-2, -2, 4, 4, Rgb::RED);
        assert_eq!(buf.lit_pixels(), 4);
        buf.fill_rect(0, 0, 0, 10, Rgb::BLUE);
        assert_eq!(buf.lit_pixels(), 4);
    }

    #[test]
    fn circle_is_symmetric() {
        let mut buf = PixelBuffer::new(21, 21);
        buf.draw_circle(10, 10, 5, Rgb::WHITE);
        for (x, y) in lit(&buf) {
            let (mx, my) = (20 - x, 20 - y);
            assert!(buf.get(mx as i32, y as i32).is_some_and(|c| !c.is_black()));
            assert!(buf.get(x as i32, my as i32).is_some_and(|c| !c.is_black()));
        }
        assert!(buf.get(15, 10).is_some_and(|c| !c.is_black()));
        assert_eq!(buf.get(10, 10), Some(Rgb::BLACK));
    }

    #[test]
    fn blit_clips_at_edges() {
        let mut buf = PixelBuffer::new(4, 4);
        let img = ImageFrame::solid(3, 3, Rgb::GREEN);
        buf.blit(&img, 2, 2);
        assert_eq!(buf.lit_pixels(), 4);
    }
}
