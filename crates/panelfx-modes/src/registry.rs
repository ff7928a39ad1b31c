#![forbid(unsafe_code)]

//! One generator per mode tag.
//!
//! Generators are created up front and live for the whole run, so a mode's
//! private state survives while other modes are shown. Each random
//! generator gets its own seed derived from the run seed.

use panelfx_core::ModeTag;
use panelfx_render::PixelBuffer;

use crate::{
    BouncingClock, Fire, Generator, ImageMode, Life, Maze, Pacman, PacmanStats, Plasma, Pulse,
    Rainbow, RenderContext, RotatingSquares, ScrollText, Spectrum, StaticText, WeatherMode,
};

const LIFE_SALT: u64 = 0x4c49_4645;
const MAZE_SALT: u64 = 0x4d41_5a45;
const FIRE_SALT: u64 = 0x4649_5245;
const PACMAN_SALT: u64 = 0x5041_434d;

/// The Off mode: leaves the cleared buffer alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blank;

impl Generator for Blank {
    fn name(&self) -> &'static str {
        "Off"
    }

    fn reset(&mut self) {}

    fn render(&mut self, _ctx: RenderContext<'_>, _buf: &mut PixelBuffer) {}
}

/// Every mode's generator, addressable by [`ModeTag`].
pub struct Generators {
    pub clock: BouncingClock,
    pub text: StaticText,
    pub weather: WeatherMode,
    pub scroll: ScrollText,
    pub rainbow: Rainbow,
    pub plasma: Plasma,
    pub squares: RotatingSquares,
    pub life: Life,
    pub pulse: Pulse,
    pub image: ImageMode,
    pub maze: Maze,
    pub spectrum: Spectrum,
    pub fire: Fire,
    pub pacman: Pacman,
    pub off: Blank,
}

impl Generators {
    /// All generators, seeded from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            clock: BouncingClock::new(),
            text: StaticText::new(),
            weather: WeatherMode::new(),
            scroll: ScrollText::new(),
            rainbow: Rainbow::new(),
            plasma: Plasma::new(),
            squares: RotatingSquares::new(),
            life: Life::new(seed ^ LIFE_SALT),
            pulse: Pulse::new(),
            image: ImageMode::new(),
            maze: Maze::new(seed ^ MAZE_SALT),
            spectrum: Spectrum::new(),
            fire: Fire::new(seed ^ FIRE_SALT),
            pacman: Pacman::new(seed ^ PACMAN_SALT),
            off: Blank,
        }
    }

    /// All generators, seeded from the OS.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The generator bound to `tag`.
    pub fn get_mut(&mut self, tag: ModeTag) -> &mut dyn Generator {
        match tag {
            ModeTag::Clock => &mut self.clock,
            ModeTag::Text => &mut self.text,
            ModeTag::Weather => &mut self.weather,
            ModeTag::Scroll => &mut self.scroll,
            ModeTag::Rainbow => &mut self.rainbow,
            ModeTag::Plasma => &mut self.plasma,
            ModeTag::Squares => &mut self.squares,
            ModeTag::Life => &mut self.life,
            ModeTag::Pulse => &mut self.pulse,
            ModeTag::Image => &mut self.image,
            ModeTag::Maze => &mut self.maze,
            ModeTag::Spectrum => &mut self.spectrum,
            ModeTag::Fire => &mut self.fire,
            ModeTag::Pacman => &mut self.pacman,
            ModeTag::Off => &mut self.off,
        }
    }

    /// Drop the private state of one generator.
    pub fn reset(&mut self, tag: ModeTag) {
        self.get_mut(tag).reset();
    }

    /// Pac-Man score summary, once a game has started.
    pub fn pacman_stats(&self) -> Option<PacmanStats> {
        self.pacman.stats()
    }
}

impl Default for Generators {
    fn default() -> Self {
        Self::new(0)
    }
}
