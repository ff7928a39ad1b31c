#![forbid(unsafe_code)]

//! Conway's Game of Life on a toroidal grid.
//!
//! One cell per pixel. The grid steps every [`Life::STEP_EVERY`] frames
//! (B3/S23). Each live cell carries an age: it increments on survival and
//! resets on birth, and older cells shift from blue toward red. When the
//! population drops below [`Life::RESEED_BELOW`] the grid is reseeded at a
//! random density between 35% and 50%.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use panelfx_render::{PixelBuffer, hsv_to_rgb};

use crate::{Generator, RenderContext};

/// Game of Life generator.
#[derive(Debug, Clone)]
pub struct Life {
    width: u16,
    height: u16,
    alive: Vec<bool>,
    ages: Vec<u16>,
    /// Scratch for the next generation.
    next_alive: Vec<bool>,
    next_ages: Vec<u16>,
    generation: u64,
    rng: StdRng,
}

impl Life {
    /// Frames between generations.
    pub const STEP_EVERY: u64 = 5;
    /// Population below which the grid is reseeded.
    pub const RESEED_BELOW: usize = 5;

    pub fn new(seed: u64) -> Self {
        Self {
            width: 0,
            height: 0,
            alive: Vec::new(),
            ages: Vec::new(),
            next_alive: Vec::new(),
            next_ages: Vec::new(),
            generation: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Build a grid with exactly the given live cells (all age 0).
    pub fn from_cells(width: u16, height: u16, cells: &[(u16, u16)]) -> Self {
        let mut life = Self::new(0);
        life.allocate(width, height);
        for &(x, y) in cells {
            if x < width && y < height {
                let i = life.index(x, y);
                life.alive[i] = true;
            }
        }
        life
    }

    fn allocate(&mut self, width: u16, height: u16) {
        let len = width as usize * height as usize;
        self.width = width;
        self.height = height;
        self.alive = vec![false; len];
        self.ages = vec![0; len];
        self.next_alive = vec![false; len];
        self.next_ages = vec![0; len];
        self.generation = 0;
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Grid width.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Grid height.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Whether the cell at `(x, y)` is alive. Out of range is dead.
    pub fn is_alive(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height && self.alive[self.index(x, y)]
    }

    /// Age of the cell at `(x, y)` in generations.
    pub fn age(&self, x: u16, y: u16) -> u16 {
        if x < self.width && y < self.height {
            self.ages[self.index(x, y)]
        } else {
            0
        }
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    /// Generations stepped since the last (re)initialization.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fill the grid at a random density in `[0.35, 0.50]`.
    pub fn reseed(&mut self) {
        let density: f64 = self.rng.random_range(0.35..=0.50);
        for (alive, age) in self.alive.iter_mut().zip(self.ages.iter_mut()) {
            *alive = self.rng.random_bool(density);
            *age = 0;
        }
        self.generation = 0;
        debug!(density, population = self.population(), "life reseeded");
    }

    fn live_neighbors(&self, x: u16, y: u16) -> u8 {
        let w = i32::from(self.width);
        let h = i32::from(self.height);
        let mut n = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = (i32::from(x) + dx).rem_euclid(w) as u16;
                let ny = (i32::from(y) + dy).rem_euclid(h) as u16;
                if self.alive[self.index(nx, ny)] {
                    n += 1;
                }
            }
        }
        n
    }

    /// Advance one generation (B3/S23, toroidal).
    pub fn step(&mut self) {
        if self.alive.is_empty() {
            return;
        }
        for y in 0..self.height {
            for x in 0..self.width {
                let i = self.index(x, y);
                let n = self.live_neighbors(x, y);
                let (alive, age) = match (self.alive[i], n) {
                    (true, 2 | 3) => (true, self.ages[i].saturating_add(1)),
                    (false, 3) => (true, 0),
                    _ => (false, 0),
                };
                self.next_alive[i] = alive;
                self.next_ages[i] = age;
            }
        }
        std::mem::swap(&mut self.alive, &mut self.next_alive);
        std::mem::swap(&mut self.ages, &mut self.next_ages);
        self.generation += 1;
    }

    /// Hue for a cell of the given age.
    pub fn hue_for_age(age: u16) -> f64 {
        (0.6 - f64::from(age) * 0.02).max(0.1)
    }
}

impl Generator for Life {
    fn name(&self) -> &'static str {
        "Game of Life"
    }

    fn resize(&mut self, width: u16, height: u16) {
        if self.width == width && self.height == height && !self.alive.is_empty() {
            return;
        }
        self.allocate(width, height);
        if !self.alive.is_empty() {
            self.reseed();
        }
        debug!(width, height, "life grid initialized");
    }

    fn reset(&mut self) {
        self.width = 0;
        self.height = 0;
        self.alive.clear();
        self.ages.clear();
    }

    fn render(&mut self, ctx: RenderContext<'_>, buf: &mut PixelBuffer) {
        if ctx.is_empty() {
            return;
        }
        self.resize(ctx.width, ctx.height);

        if ctx.frame % Self::STEP_EVERY == 0 {
            self.step();
            if self.population() < Self::RESEED_BELOW {
                self.reseed();
            }
        }

        let v = ctx.value();
        for y in 0..self.height {
            for x in 0..self.width {
                let i = self.index(x, y);
                if self.alive[i] {
                    let color = hsv_to_rgb(Self::hue_for_age(self.ages[i]), 0.9, v);
                    buf.set_pixel(i32::from(x), i32::from(y), color);
                }
            }
        }
    }
}
