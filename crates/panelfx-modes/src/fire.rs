#![forbid(unsafe_code)]

//! Rising fire from a heat-diffusion map.
//!
//! The bottom row is reseeded with random heat on every update. Every other
//! row takes the average of the three cells below it and cools by
//! [`COOLING`]. Heat is stored in `0.0..=1.5`; colors come from one of four
//! five-stop gradients sampled at the heat clamped to `[0, 1]`.
//!
//! # No Per-Frame Allocations
//!
//! The heat map is only reallocated on dimension change.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use panelfx_core::FireScheme;
use panelfx_render::{Gradient, PixelBuffer, Rgb};

use crate::{Generator, RenderContext};

/// Cooling factor applied as heat rises one row.
pub const COOLING: f64 = 0.92;
/// Upper bound of stored heat.
pub const MAX_HEAT: f64 = 1.5;
/// Hot-spot multiplier for the bottom row.
const HOT_SPOT: f64 = 1.5;
/// Probability of a random hot spot per column per update.
const HOT_SPOT_CHANCE: f64 = 0.05;

// ---------------------------------------------------------------------------
// Palettes
// ---------------------------------------------------------------------------

const TRADITIONAL: Gradient = Gradient::new(&[
    (0.0, Rgb::BLACK),
    (0.25, Rgb::new(160, 0, 0)),
    (0.5, Rgb::new(255, 80, 0)),
    (0.75, Rgb::new(255, 180, 0)),
    (1.0, Rgb::new(255, 255, 200)),
]);

const BLUE: Gradient = Gradient::new(&[
    (0.0, Rgb::BLACK),
    (0.25, Rgb::new(0, 0, 120)),
    (0.5, Rgb::new(0, 80, 255)),
    (0.75, Rgb::new(80, 180, 255)),
    (1.0, Rgb::new(220, 240, 255)),
]);

const GREEN: Gradient = Gradient::new(&[
    (0.0, Rgb::BLACK),
    (0.25, Rgb::new(0, 90, 0)),
    (0.5, Rgb::new(0, 200, 0)),
    (0.75, Rgb::new(150, 255, 50)),
    (1.0, Rgb::new(230, 255, 200)),
]);

const PURPLE: Gradient = Gradient::new(&[
    (0.0, Rgb::BLACK),
    (0.25, Rgb::new(70, 0, 90)),
    (0.5, Rgb::new(150, 0, 200)),
    (0.75, Rgb::new(220, 80, 255)),
    (1.0, Rgb::new(255, 210, 255)),
]);

/// Gradient for a color scheme.
pub fn palette(scheme: FireScheme) -> &'static Gradient {
    match scheme {
        FireScheme::Traditional => &TRADITIONAL,
        FireScheme::Blue => &BLUE,
        FireScheme::Green => &GREEN,
        FireScheme::Purple => &PURPLE,
    }
}

// ---------------------------------------------------------------------------
// Fire
// ---------------------------------------------------------------------------

/// Heat-map fire generator.
#[derive(Debug, Clone)]
pub struct Fire {
    width: u16,
    height: u16,
    /// Row-major, `y = height - 1` is the fuel row.
    heat: Vec<f64>,
    updates: u64,
    rng: StdRng,
}

impl Fire {
    pub fn new(seed: u64) -> Self {
        Self {
            width: 0,
            height: 0,
            heat: Vec::new(),
            updates: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Heat at `(x, y)`; out of range is cold.
    pub fn heat(&self, x: u16, y: u16) -> f64 {
        if x < self.width && y < self.height {
            self.heat[y as usize * self.width as usize + x as usize]
        } else {
            0.0
        }
    }

    /// Number of map updates since allocation.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    fn ensure(&mut self, width: u16, height: u16) {
        if self.width == width && self.height == height && !self.heat.is_empty() {
            return;
        }
        self.width = width;
        self.height = height;
        self.heat = vec![0.0; width as usize * height as usize];
        self.updates = 0;
        debug!(width, height, "fire heat map allocated");
    }

    /// Seed the fuel row and propagate heat upward.
    pub fn update(&mut self, frame: u64, intensity: f64) {
        let w = self.width as usize;
        let h = self.height as usize;
        if w == 0 || h == 0 {
            return;
        }

        let base = (h - 1) * w;
        for x in 0..w {
            let mut heat = self.rng.random_range(0.5..1.0) * intensity;
            let wave = (frame as f64 * 0.1 + x as f64 * 0.3).sin();
            if self.rng.random_bool(HOT_SPOT_CHANCE) || wave > 0.95 {
                heat *= HOT_SPOT;
            }
            self.heat[base + x] = heat.min(MAX_HEAT);
        }

        for y in (0..h - 1).rev() {
            let below = (y + 1) * w;
            for x in 0..w {
                let left = self.heat[below + x.saturating_sub(1)];
                let mid = self.heat[below + x];
                let right = self.heat[below + (x + 1).min(w - 1)];
                self.heat[y * w + x] = ((left + mid + right) / 3.0 * COOLING).clamp(0.0, MAX_HEAT);
            }
        }
        self.updates += 1;
    }
}

impl Default for Fire {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Generator for Fire {
    fn name(&self) -> &'static str {
        "Fire"
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.ensure(width, height);
    }

    fn reset(&mut self) {
        self.width = 0;
        self.height = 0;
        self.heat.clear();
        self.updates = 0;
    }

    fn render(&mut self, ctx: RenderContext<'_>, buf: &mut PixelBuffer) {
        if ctx.is_empty() {
            return;
        }
        self.ensure(ctx.width, ctx.height);

        let opts = ctx.options.fire;
        if ctx.frame % opts.speed.frames_per_update() == 0 {
            self.update(ctx.frame, opts.intensity.multiplier());
        }

        let gradient = palette(opts.scheme);
        let w = self.width as usize;
        for (i, &heat) in self.heat.iter().enumerate() {
            let color = ctx.dim(gradient.at(heat.clamp(0.0, 1.0)));
            if !color.is_black() {
                buf.set_pixel((i % w) as i32, (i / w) as i32, color);
            }
        }
    }
}
