#![forbid(unsafe_code)]

//! Packed RGB colors, HSV conversion, and multi-stop gradients.
//!
//! LED panels have no alpha channel, so [`Rgb`] packs three 8-bit channels
//! into the low 24 bits of a `u32` (`0x00RRGGBB`), the same layout the
//! hardware drivers accept.

/// A packed 24-bit RGB color (`0x00RRGGBB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u32);

impl Rgb {
    /// Black (all channels off).
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Pure red.
    pub const RED: Self = Self::new(255, 0, 0);
    /// Pure green.
    pub const GREEN: Self = Self::new(0, 255, 0);
    /// Pure blue.
    pub const BLUE: Self = Self::new(0, 0, 255);
    /// Clock gold (`0xFFD700`).
    pub const GOLD: Self = Self::new(255, 215, 0);

    /// Create a color from its three channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// Create a color from a packed `0xRRGGBB` value. Bits above 24 are dropped.
    #[inline]
    pub const fn from_u32(packed: u32) -> Self {
        Self(packed & 0x00FF_FFFF)
    }

    /// The packed `0xRRGGBB` value.
    #[inline]
    pub const fn to_u32(self) -> u32 {
        self.0
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Returns `true` if every channel is zero.
    #[inline]
    pub const fn is_black(self) -> bool {
        self.0 == 0
    }

    /// Scale every channel by `percent / 100` (truncating). Values above 100
    /// are treated as 100.
    #[inline]
    pub const fn scale(self, percent: u8) -> Self {
        let p = if percent > 100 { 100 } else { percent } as u32;
        Self::new(
            (self.r() as u32 * p / 100) as u8,
            (self.g() as u32 * p / 100) as u8,
            (self.b() as u32 * p / 100) as u8,
        )
    }

    /// Scale every channel by a factor in `[0, 1]` (clamped, truncating).
    #[inline]
    pub fn scale_f(self, factor: f64) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self::new(
            (self.r() as f64 * f) as u8,
            (self.g() as f64 * f) as u8,
            (self.b() as f64 * f) as u8,
        )
    }

    /// Fixed-point linear interpolation between `a` and `b` (`t` clamped to `[0, 1]`).
    #[inline]
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        let t256 = (t.clamp(0.0, 1.0) * 256.0) as u32;
        let inv = 256 - t256;
        Self::new(
            ((a.r() as u32 * inv + b.r() as u32 * t256) >> 8) as u8,
            ((a.g() as u32 * inv + b.g() as u32 * t256) >> 8) as u8,
            ((a.b() as u32 * inv + b.b() as u32 * t256) >> 8) as u8,
        )
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

/// Convert HSV (all components in `[0, 1]`) to a packed RGB color.
///
/// Uses the six-sector formulation: with `f` the fractional part of `h * 6`,
/// `p = v(1 - s)`, `q = v(1 - fs)`, `t = v(1 - (1 - f)s)`, the sectors map to
/// `(v,t,p) (q,v,p) (p,v,t) (p,q,v) (t,p,v) (v,p,q)`. Channels are truncated,
/// not rounded. Hue wraps, so `h = 1.0` is red again.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);
    let mut h6 = h.rem_euclid(1.0) * 6.0;
    // Sector boundaries computed as k/6 land a hair off the integer.
    let nearest = h6.round();
    if (h6 - nearest).abs() < 1e-9 {
        h6 = nearest;
    }
    if h6 >= 6.0 {
        h6 = 0.0;
    }

    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match sector as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    Rgb::new(
        (r * 255.0).floor() as u8,
        (g * 255.0).floor() as u8,
        (b * 255.0).floor() as u8,
    )
}

/// A piecewise-linear color ramp over `[0, 1]`.
///
/// Stops must be sorted by position; the first stop should sit at `0.0` and
/// the last at `1.0`. Values outside the range clamp to the end stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    stops: &'static [(f64, Rgb)],
}

impl Gradient {
    /// Build a gradient from sorted stops.
    pub const fn new(stops: &'static [(f64, Rgb)]) -> Self {
        Self { stops }
    }

    /// Number of stops.
    pub const fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Sample the ramp at `t`.
    pub fn at(&self, t: f64) -> Rgb {
        let Some(&(first_pos, first)) = self.stops.first() else {
            return Rgb::BLACK;
        };
        let t = if t.is_nan() { 0.0 } else { t };
        if t <= first_pos {
            return first;
        }
        for pair in self.stops.windows(2) {
            let (p0, c0) = pair[0];
            let (p1, c1) = pair[1];
            if t <= p1 {
                let span = p1 - p0;
                if span <= f64::EPSILON {
                    return c1;
                }
                return Rgb::lerp(c0, c1, (t - p0) / span);
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_channels() {
        let c = Rgb::new(0x12, 0x34, 0x56);
        assert_eq!(c.to_u32(), 0x123456);
        assert_eq!((c.r(), c.g(), c.b()), (0x12, 0x34, 0x56));
        assert_eq!(Rgb::from_u32(0xFF12_3456), c);
    }

    #[test]
    fn hsv_primaries_and_secondaries_are_exact() {
        let expected = [
            0xFF0000, // red
            0xFFFF00, // yellow
            0x00FF00, // green
            0x00FFFF, // cyan
            0x0000FF, // blue
            0xFF00FF, // magenta
        ];
        for (k, want) in expected.iter().enumerate() {
            let h = k as f64 / 6.0;
            assert_eq!(hsv_to_rgb(h, 1.0, 1.0).to_u32(), *want, "hue {k}/6");
        }
    }

    #[test]
    fn hsv_hue_wraps_at_one() {
        assert_eq!(hsv_to_rgb(1.0, 1.0, 1.0), Rgb::RED);
        assert_eq!(hsv_to_rgb(-1.0 / 6.0, 1.0, 1.0), Rgb::new(255, 0, 255));
    }

    #[test]
    fn hsv_truncates_channels() {
        // v = 0.5 -> 127.5 -> 127 (floor, not round).
        assert_eq!(hsv_to_rgb(0.0, 0.0, 0.5), Rgb::new(127, 127, 127));
    }

    #[test]
    fn hsv_zero_value_is_black() {
        assert_eq!(hsv_to_rgb(0.3, 1.0, 0.0), Rgb::BLACK);
    }

    #[test]
    fn scale_by_percent() {
        assert_eq!(Rgb::new(200, 100, 50).scale(50), Rgb::new(100, 50, 25));
        assert_eq!(Rgb::new(200, 100, 50).scale(0), Rgb::BLACK);
        assert_eq!(Rgb::new(200, 100, 50).scale(150), Rgb::new(200, 100, 50));
    }

    #[test]
    fn lerp_hits_endpoints() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(255, 128, 64);
        assert_eq!(Rgb::lerp(a, b, 0.0), a);
        assert_eq!(Rgb::lerp(a, b, 1.0), b);
    }

    #[test]
    fn gradient_segments() {
        const STOPS: &[(f64, Rgb)] = &[
            (0.0, Rgb::new(0, 0, 0)),
            (0.5, Rgb::new(200, 0, 0)),
            (1.0, Rgb::new(200, 200, 0)),
        ];
        let g = Gradient::new(STOPS);
        assert_eq!(g.stop_count(), 3);
        assert_eq!(g.at(-1.0), Rgb::BLACK);
        assert_eq!(g.at(0.5), Rgb::new(200, 0, 0));
        assert_eq!(g.at(2.0), Rgb::new(200, 200, 0));
        let mid = g.at(0.25);
        assert!(mid.r() > 90 && mid.r() < 110, "got {mid:?}");
    }
}
