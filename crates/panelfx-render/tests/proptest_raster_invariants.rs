//! Property-based invariant tests for the color model and raster primitives.
//!
//! 1. HSV conversion never panics and respects the value ceiling.
//! 2. Zero saturation yields gray.
//! 3. Lines never panic and paint at most `max(|dx|, |dy|) + 1` pixels.
//! 4. Lines fully inside the buffer paint both endpoints.
//! 5. Lines are symmetric in their endpoints.
//! 6. Filled rectangles paint exactly their clipped area.
//! 7. Circles stay inside their bounding square.

use panelfx_render::{Draw, PixelBuffer, Rgb, hsv_to_rgb};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn dims() -> impl Strategy<Value = (u16, u16)> {
    (0u16..=48, 0u16..=48)
}

fn coord() -> impl Strategy<Value = i32> {
    -80i32..=80
}

fn unit() -> impl Strategy<Value = f64> {
    0.0f64..=1.0
}

// ═════════════════════════════════════════════════════════════════════════
// 1. HSV conversion never exceeds the value ceiling
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn hsv_channels_bounded_by_value(h in -3.0f64..3.0, s in unit(), v in unit()) {
        let c = hsv_to_rgb(h, s, v);
        let ceiling = (v * 255.0).floor() as u8;
        prop_assert!(c.r() <= ceiling && c.g() <= ceiling && c.b() <= ceiling,
            "h={} s={} v={} -> {:?}", h, s, v, c);
        prop_assert_eq!(c.r().max(c.g()).max(c.b()), ceiling);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Zero saturation is gray
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn hsv_zero_saturation_is_gray(h in unit(), v in unit()) {
        let c = hsv_to_rgb(h, 0.0, v);
        prop_assert_eq!(c.r(), c.g());
        prop_assert_eq!(c.g(), c.b());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Lines are bounded in pixel count
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn line_pixel_count_bounded(
        (w, h) in dims(),
        x0 in coord(), y0 in coord(), x1 in coord(), y1 in coord(),
    ) {
        let mut buf = PixelBuffer::new(w, h);
        buf.draw_line(x0, y0, x1, y1, Rgb::WHITE);
        let bound = (x1 - x0).abs().max((y1 - y0).abs()) as usize + 1;
        prop_assert!(buf.lit_pixels() <= bound);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. In-bounds lines paint both endpoints
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn line_paints_endpoints(
        x0 in 0i32..32, y0 in 0i32..32, x1 in 0i32..32, y1 in 0i32..32,
    ) {
        let mut buf = PixelBuffer::new(32, 32);
        buf.draw_line(x0, y0, x1, y1, Rgb::WHITE);
        prop_assert_eq!(buf.get(x0, y0), Some(Rgb::WHITE));
        prop_assert_eq!(buf.get(x1, y1), Some(Rgb::WHITE));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Axis-aligned lines are symmetric
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn axis_lines_symmetric(a in coord(), b in coord(), fixed in 0i32..16) {
        let mut fwd = PixelBuffer::new(16, 16);
        let mut rev = PixelBuffer::new(16, 16);
        fwd.draw_line(a, fixed, b, fixed, Rgb::WHITE);
        rev.draw_line(b, fixed, a, fixed, Rgb::WHITE);
        prop_assert_eq!(fwd, rev);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Filled rectangles paint their clipped area
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fill_rect_area(
        (w, h) in dims(),
        x in coord(), y in coord(), rw in -4i32..60, rh in -4i32..60,
    ) {
        let mut buf = PixelBuffer::new(w, h);
        buf.fill_rect(x, y, rw, rh, Rgb::RED);
        let cw = ((x + rw).min(w as i32) - x.max(0)).max(0);
        let ch = ((y + rh).min(h as i32) - y.max(0)).max(0);
        let expected = if rw <= 0 || rh <= 0 { 0 } else { (cw * ch) as usize };
        prop_assert_eq!(buf.lit_pixels(), expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Circles stay inside their bounding square
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn circle_within_bounds(cx in 0i32..40, cy in 0i32..40, r in 0i32..20) {
        let mut buf = PixelBuffer::new(40, 40);
        buf.draw_circle(cx, cy, r, Rgb::WHITE);
        for (x, y, c) in buf.iter() {
            if !c.is_black() {
                prop_assert!((x as i32 - cx).abs() <= r);
                prop_assert!((y as i32 - cy).abs() <= r);
            }
        }
    }
}
