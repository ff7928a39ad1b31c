#![forbid(unsafe_code)]

//! Self-playing Pac-Man.
//!
//! # Board
//!
//! A hand-authored 16x16 maze built from an 8-column left half mirrored
//! onto the right. Each cell is 4x4 pixels. Panels wide enough for several
//! boards tile the maze horizontally, each copy with its own four ghosts.
//! Row 7 is the tunnel: moving off either edge wraps around.
//!
//! # Rules
//!
//! - Dot: 10 points. Power pellet: 50 points plus [`POWER_STEPS`] steps of
//!   frightened ghosts.
//! - The player keeps going straight while it can. When blocked it takes
//!   the non-reversing move closest (Manhattan) to the nearest dot, and it
//!   only reverses when stuck.
//! - Each ghost carries its own [`GhostMode`] and picks the non-reversing
//!   move closest to its target: the player (chase), its home corner
//!   (scatter), or the player mirrored through the ghost (frightened).
//!   Normal difficulty alternates scatter and chase; Hard always chases;
//!   Easy chases a random cell. A pellet frightens every ghost.
//! - Player and ghost collide at Manhattan distance 1 or less. A frightened
//!   ghost is eaten for 200 points and respawns in the house no longer
//!   frightened; otherwise the player restarts from its spawn.
//! - Eating the last dot starts the next level with the score kept.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use panelfx_core::PacmanDifficulty;
use panelfx_render::{Draw, PixelBuffer, Rgb};

use crate::{Generator, RenderContext};

/// Board size in cells.
pub const BOARD: i32 = 16;
/// Pixels per cell.
pub const CELL_PX: i32 = 4;
/// Board width in pixels; one copy per this many panel columns.
pub const BOARD_PX: u16 = (BOARD * CELL_PX) as u16;

pub const DOT_POINTS: u32 = 10;
pub const PELLET_POINTS: u32 = 50;
pub const GHOST_POINTS: u32 = 200;
/// Steps ghosts stay frightened after a pellet.
pub const POWER_STEPS: u32 = 60;
const SCATTER_STEPS: u32 = 20;
const CHASE_STEPS: u32 = 60;

const TUNNEL_ROW: i32 = 7;
const PLAYER_SPAWN: (i32, i32) = (7, 13);
const GHOST_HOMES: [(i32, i32); 4] = [(7, 7), (8, 7), (6, 7), (9, 7)];
const SCATTER_CORNERS: [(i32, i32); 4] = [(1, 1), (14, 1), (1, 14), (14, 14)];
const GHOST_COLORS: [Rgb; 4] = [
    Rgb::new(255, 0, 0),
    Rgb::new(255, 184, 255),
    Rgb::new(0, 255, 255),
    Rgb::new(255, 184, 82),
];

const WALL_COLOR: Rgb = Rgb::new(33, 33, 200);
const DOT_COLOR: Rgb = Rgb::new(255, 184, 151);
const PLAYER_COLOR: Rgb = Rgb::new(255, 255, 0);
const FRIGHTENED_COLOR: Rgb = Rgb::new(40, 40, 255);

/// Left half of the board. `#` wall, `.` dot, `o` pellet, `G` ghost house,
/// space empty.
const LEFT_HALF: [&str; 16] = [
    "########",
    "#o......",
    "#.##.###",
    "#.......",
    "#.##.#.#",
    "#....#..",
    "####.# #",
    "    .  G",
    "####.# #",
    "#.......",
    "#.##.###",
    "#..#....",
    "##.#.#.#",
    "#....#..",
    "#o......",
    "########",
];

/// One board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Empty,
    Dot,
    Pellet,
    /// Passable for ghosts only.
    House,
}

impl Tile {
    fn from_char(c: char) -> Self {
        match c {
            '#' => Tile::Wall,
            '.' => Tile::Dot,
            'o' => Tile::Pellet,
            'G' => Tile::House,
            _ => Tile::Empty,
        }
    }
}

/// Movement direction. Declaration order is the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Up,
    Left,
    Down,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Left, Dir::Down, Dir::Right];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Left => (-1, 0),
            Dir::Down => (0, 1),
            Dir::Right => (1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Dir::Up => Dir::Down,
            Dir::Left => Dir::Right,
            Dir::Down => Dir::Up,
            Dir::Right => Dir::Left,
        }
    }
}

/// What a ghost is currently aiming for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostMode {
    Chase,
    Scatter,
    Frightened,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ghost {
    pub pos: (i32, i32),
    pub dir: Dir,
    pub color: Rgb,
    pub mode: GhostMode,
    home: (i32, i32),
    corner: (i32, i32),
}

/// Score summary, exposed through engine status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PacmanStats {
    pub score: u32,
    pub level: u32,
    pub dots_remaining: u32,
}

fn manhattan(a: (i32, i32), b: (i32, i32)) -> i32 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

// ---------------------------------------------------------------------------
// Game logic
// ---------------------------------------------------------------------------

/// Board, actors and score. Pure game logic, no drawing.
#[derive(Debug, Clone)]
pub struct PacmanGame {
    copies: i32,
    tiles: Vec<Tile>,
    player: (i32, i32),
    dir: Dir,
    ghosts: Vec<Ghost>,
    score: u32,
    level: u32,
    remaining: u32,
    power_steps: u32,
    mode_steps: u32,
    difficulty: PacmanDifficulty,
    rng: StdRng,
}

impl PacmanGame {
    /// New game with `copies` boards side by side (at least one).
    pub fn new(copies: u16, difficulty: PacmanDifficulty, seed: u64) -> Self {
        let copies = i32::from(copies.max(1));
        let mut game = Self {
            copies,
            tiles: Vec::new(),
            player: PLAYER_SPAWN,
            dir: Dir::Left,
            ghosts: Vec::new(),
            score: 0,
            level: 1,
            remaining: 0,
            power_steps: 0,
            mode_steps: 0,
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        };
        game.load_level();
        game
    }

    /// Board width in cells across all copies.
    pub fn columns(&self) -> i32 {
        BOARD * self.copies
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn dots_remaining(&self) -> u32 {
        self.remaining
    }

    pub fn powered(&self) -> bool {
        self.power_steps > 0
    }

    pub fn player(&self) -> (i32, i32) {
        self.player
    }

    pub fn direction(&self) -> Dir {
        self.dir
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn stats(&self) -> PacmanStats {
        PacmanStats {
            score: self.score,
            level: self.level,
            dots_remaining: self.remaining,
        }
    }

    pub fn set_difficulty(&mut self, difficulty: PacmanDifficulty) {
        self.difficulty = difficulty;
    }

    /// Tile at `(x, y)`. Columns wrap; rows outside the board are wall.
    pub fn tile(&self, x: i32, y: i32) -> Tile {
        match self.index(x, y) {
            Some(i) => self.tiles[i],
            None => Tile::Wall,
        }
    }

    /// Move the player without consuming anything.
    pub fn place_player(&mut self, x: i32, y: i32) {
        self.player = (x.rem_euclid(self.columns()), y);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !(0..BOARD).contains(&y) {
            return None;
        }
        let x = x.rem_euclid(self.columns());
        Some((y * self.columns() + x) as usize)
    }

    fn load_level(&mut self) {
        let cols = self.columns();
        self.tiles = Vec::with_capacity((cols * BOARD) as usize);
        for half in LEFT_HALF {
            let row: Vec<Tile> = half
                .chars()
                .chain(half.chars().rev())
                .map(Tile::from_char)
                .collect();
            for _ in 0..self.copies {
                self.tiles.extend_from_slice(&row);
            }
        }

        self.player = PLAYER_SPAWN;
        self.dir = Dir::Left;
        if let Some(i) = self.index(PLAYER_SPAWN.0, PLAYER_SPAWN.1) {
            self.tiles[i] = Tile::Empty;
        }
        self.remaining = self
            .tiles
            .iter()
            .filter(|t| matches!(t, Tile::Dot | Tile::Pellet))
            .count() as u32;

        self.power_steps = 0;
        self.mode_steps = 0;
        let mode = self.scheduled_mode();
        self.ghosts.clear();
        for copy in 0..self.copies {
            let dx = copy * BOARD;
            for i in 0..4 {
                let home = (GHOST_HOMES[i].0 + dx, GHOST_HOMES[i].1);
                self.ghosts.push(Ghost {
                    pos: home,
                    dir: Dir::Up,
                    color: GHOST_COLORS[i],
                    mode,
                    home,
                    corner: (SCATTER_CORNERS[i].0 + dx, SCATTER_CORNERS[i].1),
                });
            }
        }
    }

    /// Eat whatever is at `(x, y)` and return the points scored.
    ///
    /// Eating the last dot starts the next level.
    pub fn consume(&mut self, x: i32, y: i32) -> u32 {
        let Some(i) = self.index(x, y) else {
            return 0;
        };
        let points = match self.tiles[i] {
            Tile::Dot => DOT_POINTS,
            Tile::Pellet => {
                self.power_steps = POWER_STEPS;
                for ghost in &mut self.ghosts {
                    ghost.mode = GhostMode::Frightened;
                }
                PELLET_POINTS
            }
            _ => return 0,
        };
        self.tiles[i] = Tile::Empty;
        self.score += points;
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.level += 1;
            info!(level = self.level, score = self.score, "pacman level complete");
            self.load_level();
        }
        points
    }

    fn passable(&self, x: i32, y: i32, ghost: bool) -> bool {
        match self.tile(x, y) {
            Tile::Wall => false,
            Tile::House => ghost,
            _ => true,
        }
    }

    fn next_pos(&self, pos: (i32, i32), dir: Dir) -> (i32, i32) {
        let (dx, dy) = dir.delta();
        let x = pos.0 + dx;
        if pos.1 == TUNNEL_ROW {
            (x.rem_euclid(self.columns()), pos.1 + dy)
        } else {
            (x, pos.1 + dy)
        }
    }

    /// Legal moves that do not reverse `dir`, in tie-break order.
    fn forward_moves(&self, pos: (i32, i32), dir: Dir, ghost: bool) -> Vec<Dir> {
        Dir::ALL
            .into_iter()
            .filter(|&d| d != dir.opposite())
            .filter(|&d| {
                let (x, y) = self.next_pos(pos, d);
                self.passable(x, y, ghost)
            })
            .collect()
    }

    fn nearest_dot(&self) -> Option<(i32, i32)> {
        let cols = self.columns();
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| matches!(t, Tile::Dot | Tile::Pellet))
            .map(|(i, _)| (i as i32 % cols, i as i32 / cols))
            .min_by_key(|&p| manhattan(self.player, p))
    }

    fn choose_player_dir(&self) -> Option<Dir> {
        let moves = self.forward_moves(self.player, self.dir, false);
        if moves.is_empty() {
            let back = self.dir.opposite();
            let (x, y) = self.next_pos(self.player, back);
            return self.passable(x, y, false).then_some(back);
        }
        if moves.contains(&self.dir) {
            return Some(self.dir);
        }
        let Some(target) = self.nearest_dot() else {
            return moves.first().copied();
        };
        moves
            .into_iter()
            .min_by_key(|&d| manhattan(self.next_pos(self.player, d), target))
    }

    /// Scatter/chase schedule for ghosts that are not frightened.
    fn scheduled_mode(&self) -> GhostMode {
        match self.difficulty {
            PacmanDifficulty::Hard => GhostMode::Chase,
            _ if self.mode_steps % (SCATTER_STEPS + CHASE_STEPS) < SCATTER_STEPS => {
                GhostMode::Scatter
            }
            _ => GhostMode::Chase,
        }
    }

    /// Put ghosts back on the schedule, except those still frightened
    /// while power lasts.
    fn refresh_ghost_modes(&mut self) {
        let scheduled = self.scheduled_mode();
        let powered = self.power_steps > 0;
        for ghost in &mut self.ghosts {
            if !(powered && ghost.mode == GhostMode::Frightened) {
                ghost.mode = scheduled;
            }
        }
    }

    fn move_ghosts(&mut self) {
        let player = self.player;
        let cols = self.columns();
        for i in 0..self.ghosts.len() {
            let ghost = &self.ghosts[i];
            let target = match ghost.mode {
                GhostMode::Chase if self.difficulty == PacmanDifficulty::Easy => (
                    self.rng.random_range(0..cols),
                    self.rng.random_range(0..BOARD),
                ),
                GhostMode::Chase => player,
                GhostMode::Scatter => ghost.corner,
                GhostMode::Frightened => (2 * ghost.pos.0 - player.0, 2 * ghost.pos.1 - player.1),
            };
            let (pos, dir) = (ghost.pos, ghost.dir);
            let moves = self.forward_moves(pos, dir, true);
            let choice = moves
                .into_iter()
                .min_by_key(|&d| manhattan(self.next_pos(pos, d), target))
                .or_else(|| {
                    let (x, y) = self.next_pos(pos, dir.opposite());
                    self.passable(x, y, true).then_some(dir.opposite())
                });
            if let Some(d) = choice {
                let next = self.next_pos(pos, d);
                let ghost = &mut self.ghosts[i];
                ghost.pos = next;
                ghost.dir = d;
            }
        }
    }

    fn resolve_collisions(&mut self) {
        for i in 0..self.ghosts.len() {
            if manhattan(self.ghosts[i].pos, self.player) > 1 {
                continue;
            }
            if self.power_steps > 0 && self.ghosts[i].mode == GhostMode::Frightened {
                self.score += GHOST_POINTS;
                let mode = self.scheduled_mode();
                let ghost = &mut self.ghosts[i];
                ghost.pos = ghost.home;
                ghost.dir = Dir::Up;
                ghost.mode = mode;
                debug!(ghost = i, score = self.score, "ghost eaten");
            } else {
                self.player = PLAYER_SPAWN;
                self.dir = Dir::Left;
                debug!(ghost = i, "player caught");
                return;
            }
        }
    }

    /// Advance the game by one step.
    pub fn step(&mut self) {
        if let Some(d) = self.choose_player_dir() {
            self.player = self.next_pos(self.player, d);
            self.dir = d;
        }
        let (x, y) = self.player;
        self.consume(x, y);
        self.resolve_collisions();
        self.move_ghosts();
        self.resolve_collisions();
        self.power_steps = self.power_steps.saturating_sub(1);
        self.mode_steps = self.mode_steps.wrapping_add(1);
        self.refresh_ghost_modes();
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Pac-Man display mode.
#[derive(Debug, Clone)]
pub struct Pacman {
    width: u16,
    game: Option<PacmanGame>,
    seed: u64,
    games_started: u64,
}

impl Pacman {
    pub fn new(seed: u64) -> Self {
        Self {
            width: 0,
            game: None,
            seed,
            games_started: 0,
        }
    }

    pub fn game(&self) -> Option<&PacmanGame> {
        self.game.as_ref()
    }

    pub fn stats(&self) -> Option<PacmanStats> {
        self.game.as_ref().map(PacmanGame::stats)
    }

    fn ensure(&mut self, width: u16, difficulty: PacmanDifficulty) -> &mut PacmanGame {
        if self.width != width {
            self.game = None;
        }
        self.width = width;
        let seed = self.seed.wrapping_add(self.games_started);
        let started = &mut self.games_started;
        let game = self.game.get_or_insert_with(|| {
            *started += 1;
            let copies = (width / BOARD_PX).max(1);
            debug!(copies, "pacman board initialized");
            PacmanGame::new(copies, difficulty, seed)
        });
        game.set_difficulty(difficulty);
        game
    }
}

impl Default for Pacman {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Fill a 4x4 cell with its corners cut.
fn draw_round(buf: &mut PixelBuffer, px: i32, py: i32, color: Rgb) {
    buf.fill_rect(px + 1, py, 2, CELL_PX, color);
    buf.fill_rect(px, py + 1, CELL_PX, 2, color);
}

impl Generator for Pacman {
    fn name(&self) -> &'static str {
        "Pac-Man"
    }

    fn resize(&mut self, width: u16, _height: u16) {
        if self.width != width {
            self.game = None;
            self.width = width;
        }
    }

    fn reset(&mut self) {
        self.game = None;
        self.width = 0;
    }

    fn render(&mut self, ctx: RenderContext<'_>, buf: &mut PixelBuffer) {
        if ctx.is_empty() {
            return;
        }
        let opts = ctx.options.pacman;
        let game = self.ensure(ctx.width, opts.difficulty);
        if ctx.frame % opts.speed.frames_per_step() == 0 {
            game.step();
        }

        let cols = game.columns();
        let ox = (i32::from(ctx.width) - cols * CELL_PX) / 2;
        let oy = (i32::from(ctx.height) - BOARD * CELL_PX) / 2;
        let wall = ctx.dim(WALL_COLOR);
        let dot = ctx.dim(DOT_COLOR);

        for y in 0..BOARD {
            for x in 0..cols {
                let (px, py) = (ox + x * CELL_PX, oy + y * CELL_PX);
                match game.tile(x, y) {
                    Tile::Wall => buf.fill_rect(px, py, CELL_PX, CELL_PX, wall),
                    Tile::Dot => buf.fill_rect(px + 1, py + 1, 2, 2, dot),
                    Tile::Pellet => draw_round(buf, px, py, dot),
                    Tile::Empty | Tile::House => {}
                }
            }
        }

        for ghost in game.ghosts() {
            let color = if ghost.mode == GhostMode::Frightened {
                FRIGHTENED_COLOR
            } else {
                ghost.color
            };
            let (px, py) = (ox + ghost.pos.0 * CELL_PX, oy + ghost.pos.1 * CELL_PX);
            buf.fill_rect(px, py + 1, CELL_PX, CELL_PX - 1, ctx.dim(color));
            buf.fill_rect(px + 1, py, 2, 1, ctx.dim(color));
        }

        let (x, y) = game.player();
        let (px, py) = (ox + x * CELL_PX, oy + y * CELL_PX);
        draw_round(buf, px, py, ctx.dim(PLAYER_COLOR));
        if ctx.frame % 4 < 2 {
            let mouth = match game.direction() {
                Dir::Up => [(1, 0), (2, 0)],
                Dir::Left => [(0, 1), (0, 2)],
                Dir::Down => [(1, 3), (2, 3)],
                Dir::Right => [(3, 1), (3, 2)],
            };
            for (mx, my) in mouth {
                buf.set_pixel(px + mx, py + my, Rgb::BLACK);
            }
        }
    }
}
