#![forbid(unsafe_code)]

//! Synthetic audio visualizer.
//!
//! No audio input: every style is driven by sums of sines over the frame
//! counter, so the output is a pure function of `(frame, options, size)`.

use panelfx_core::{SpectrumColor, SpectrumStyle};
use panelfx_render::{Draw, Gradient, PixelBuffer, Rgb, hsv_to_rgb};

use crate::{Generator, RenderContext};

/// Pixels per band in the bar style.
pub const BAND_WIDTH: u16 = 4;
/// Frames per heartbeat cycle.
pub const HEARTBEAT_FRAMES: u64 = 24;

const SOLID: Rgb = Rgb::new(0, 255, 255);
const HEART: Rgb = Rgb::RED;
const CENTER_LINE: Rgb = Rgb::new(40, 40, 40);

const LEVEL_METER: Gradient = Gradient::new(&[
    (0.0, Rgb::GREEN),
    (0.5, Rgb::new(255, 255, 0)),
    (1.0, Rgb::RED),
]);

/// Amplitude of band `i` at time `t`, in `[0, 1]`.
pub fn band_amplitude(i: usize, t: f64) -> f64 {
    let i = i as f64;
    0.5 * (t * 1.3 + i * 0.5).sin().abs()
        + 0.3 * (t * 2.1 + i * 1.7).sin().abs()
        + 0.2 * (t * 0.7 + i * 0.3).sin().abs()
}

/// Waveform sample for column `x` at time `t`, in `[-1, 1]`.
pub fn wave_sample(x: u16, t: f64) -> f64 {
    let x = f64::from(x);
    0.6 * (x * 0.2 + t * 2.0).sin() + 0.3 * (x * 0.05 - t * 1.3).sin() + 0.1 * (x * 0.7 + t * 3.1).sin()
}

/// Heartbeat envelope: a sharp "lub", a softer "dub", then rest.
pub fn heartbeat(frame: u64) -> f64 {
    let p = (frame % HEARTBEAT_FRAMES) as f64;
    if p < 4.0 {
        1.0 - p / 4.0
    } else if (6.0..10.0).contains(&p) {
        0.6 * (1.0 - (p - 6.0) / 4.0)
    } else {
        0.0
    }
}

/// Ring radius for a beat strength, between `min/8` and `min/2 - 1`.
pub fn heartbeat_radius(min_dim: u16, beat: f64) -> i32 {
    let lo = f64::from(min_dim) / 8.0;
    let hi = (f64::from(min_dim) / 2.0 - 1.0).max(lo);
    (lo + beat.clamp(0.0, 1.0) * (hi - lo)).round() as i32
}

/// Spectrum display mode. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spectrum;

impl Spectrum {
    pub fn new() -> Self {
        Self
    }

    fn color(ctx: &RenderContext<'_>, scheme: SpectrumColor, hue: f64, level: f64) -> Rgb {
        match scheme {
            SpectrumColor::Rainbow => hsv_to_rgb(hue, 1.0, ctx.value()),
            SpectrumColor::Gradient => ctx.dim(LEVEL_METER.at(level)),
            SpectrumColor::Solid => ctx.dim(SOLID),
        }
    }

    fn bars(ctx: &RenderContext<'_>, scheme: SpectrumColor, t: f64, buf: &mut PixelBuffer) {
        let bands = (ctx.width / BAND_WIDTH).max(1);
        let bar_w = i32::from(ctx.width / bands);
        let draw_w = if bar_w > 1 { bar_w - 1 } else { bar_w };
        let h = i32::from(ctx.height);

        for i in 0..bands {
            let amp = band_amplitude(usize::from(i), t);
            let bar_h = (amp * f64::from(ctx.height)).round() as i32;
            let x = i32::from(i) * bar_w;
            let hue = f64::from(i) / f64::from(bands);
            for row in 0..bar_h.min(h) {
                let level = f64::from(row) / f64::from(ctx.height);
                let color = Self::color(ctx, scheme, hue, level);
                buf.draw_hline(x, h - 1 - row, draw_w, color);
            }
        }
    }

    fn waveform(ctx: &RenderContext<'_>, scheme: SpectrumColor, t: f64, buf: &mut PixelBuffer) {
        let center = i32::from(ctx.height) / 2;
        let span = (f64::from(ctx.height) / 2.0 - 2.0).max(0.0);
        buf.draw_hline(0, center, i32::from(ctx.width), ctx.dim(CENTER_LINE));

        let mut prev: Option<i32> = None;
        for x in 0..ctx.width {
            let s = wave_sample(x, t);
            let y = center - (s * span).round() as i32;
            let hue = f64::from(x) / f64::from(ctx.width);
            let color = Self::color(ctx, scheme, hue, s.abs());
            let xi = i32::from(x);
            let y0 = prev.unwrap_or(y);
            for k in -1..=1 {
                buf.draw_line(xi - 1, y0 + k, xi, y + k, color);
            }
            prev = Some(y);
        }
    }

    fn heartbeat(ctx: &RenderContext<'_>, scheme: SpectrumColor, buf: &mut PixelBuffer) {
        let beat = heartbeat(ctx.frame);
        let min_dim = ctx.width.min(ctx.height);
        let r = heartbeat_radius(min_dim, beat);
        let cx = (i32::from(ctx.width) - 1) / 2;
        let cy = (i32::from(ctx.height) - 1) / 2;
        let color = match scheme {
            SpectrumColor::Solid => ctx.dim(HEART),
            SpectrumColor::Rainbow => hsv_to_rgb((ctx.frame as f64 * 0.01).fract(), 1.0, ctx.value()),
            SpectrumColor::Gradient => ctx.dim(LEVEL_METER.at(beat)),
        };
        // Dimmer between beats.
        let color = color.scale_f(0.3 + 0.7 * beat);
        buf.draw_circle(cx, cy, r, color);
        if r > 1 {
            buf.draw_circle(cx, cy, r - 1, color);
        }
    }
}

impl Generator for Spectrum {
    fn name(&self) -> &'static str {
        "Spectrum"
    }

    fn reset(&mut self) {}

    fn render(&mut self, ctx: RenderContext<'_>, buf: &mut PixelBuffer) {
        if ctx.is_empty() {
            return;
        }
        let opts = ctx.options.spectrum;
        let t = ctx.frame as f64 * 0.1;
        match opts.style {
            SpectrumStyle::Bars => Self::bars(&ctx, opts.color, t, buf),
            SpectrumStyle::Waveform => Self::waveform(&ctx, opts.color, t, buf),
            SpectrumStyle::Heartbeat => Self::heartbeat(&ctx, opts.color, buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;

    #[test]
    fn amplitudes_in_unit_range() {
        for frame in 0..500 {
            for band in 0..32 {
                let a = band_amplitude(band, frame as f64 * 0.1);
                assert!((0.0..=1.0).contains(&a));
            }
        }
    }

    #[test]
    fn heartbeat_shape() {
        assert_eq!(heartbeat(0), 1.0);
        assert_eq!(heartbeat(2), 0.5);
        assert_eq!(heartbeat(5), 0.0);
        assert!((heartbeat(6) - 0.6).abs() < 1e-12);
        assert_eq!(heartbeat(12), 0.0);
        assert_eq!(heartbeat(24), 1.0);
        assert!(heartbeat(6) < heartbeat(0));
    }

    #[test]
    fn heartbeat_radius_bounds() {
        assert_eq!(heartbeat_radius(64, 0.0), 8);
        assert_eq!(heartbeat_radius(64, 1.0), 31);
        assert_eq!(heartbeat_radius(64, 5.0), 31);
    }

    #[test]
    fn bars_fill_from_bottom() {
        let fx = Fixture::default();
        let mut mode = Spectrum::new();
        let mut buf = PixelBuffer::new(32, 16);
        mode.render(fx.ctx(32, 16, 7), &mut buf);
        let t = 7.0 * 0.1;
        for band in 0..8u16 {
            let bar_h = (band_amplitude(usize::from(band), t) * 16.0).round() as i32;
            let x = i32::from(band * 4);
            if bar_h > 0 {
                assert!(!buf.get(x, 15).unwrap().is_black(), "band {band} bottom dark");
            }
            if bar_h < 16 {
                assert!(buf.get(x, 15 - bar_h).unwrap().is_black());
            }
            // Gap column between bars.
            assert!(buf.get(x + 3, 15).unwrap().is_black());
        }
    }

    #[test]
    fn solid_bars_are_cyan() {
        let mut fx = Fixture::default();
        fx.options.spectrum.color = SpectrumColor::Solid;
        let mut buf = PixelBuffer::new(16, 16);
        Spectrum.render(fx.ctx(16, 16, 3), &mut buf);
        assert!(buf.iter().all(|(_, _, c)| c.is_black() || c == SOLID));
    }

    #[test]
    fn waveform_draws_center_line() {
        let mut fx = Fixture::default();
        fx.options.spectrum.style = SpectrumStyle::Waveform;
        let mut buf = PixelBuffer::new(32, 32);
        Spectrum.render(fx.ctx(32, 32, 1), &mut buf);
        assert!(buf.lit_pixels() >= 32 * 3);
    }

    #[test]
    fn heartbeat_ring_is_red_when_solid() {
        let mut fx = Fixture::default();
        fx.options.spectrum.style = SpectrumStyle::Heartbeat;
        fx.options.spectrum.color = SpectrumColor::Solid;
        let mut buf = PixelBuffer::new(64, 64);
        Spectrum.render(fx.ctx(64, 64, 24), &mut buf);
        // Full beat: radius 31 around (31, 31).
        assert_eq!(buf.get(62, 31), Some(Rgb::RED));
        assert!(buf.get(31, 31).unwrap().is_black());
    }
}
