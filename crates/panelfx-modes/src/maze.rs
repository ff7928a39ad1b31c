#![forbid(unsafe_code)]

//! Maze generation and solving, animated.
//!
//! # Layout
//!
//! The maze lives on an odd-sized grid. Rooms sit at odd coordinates and
//! every other cell starts as wall. Each grid cell is drawn as a
//! `thickness x thickness` block centered on the panel.
//!
//! # Phases
//!
//! 1. **Generating**: randomized iterative DFS carves [`CARVE_STEPS_PER_FRAME`]
//!    steps per frame.
//! 2. **Solving**: iterative DFS from room `(1, 1)` to the opposite corner,
//!    one step every `MazeSpeed::frames_per_step()` frames. The path stack
//!    shrinks on backtrack.
//! 3. **Solved**: holds the solution for [`SOLVED_HOLD_FRAMES`].
//! 4. **Paused**: holds for [`PAUSED_HOLD_FRAMES`], then a new maze starts.
//!
//! Changing the panel size or the thickness option starts over.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use panelfx_core::MazeThickness;
use panelfx_render::{Draw, PixelBuffer, Rgb, hsv_to_rgb};

use crate::{Generator, RenderContext};

/// Carve steps taken per frame while generating.
pub const CARVE_STEPS_PER_FRAME: usize = 8;
/// Frames the finished solution stays on screen.
pub const SOLVED_HOLD_FRAMES: u32 = 20;
/// Frames between the solved hold and the next maze.
pub const PAUSED_HOLD_FRAMES: u32 = 5;

const WALL: Rgb = Rgb::new(70, 70, 70);
const OPEN: Rgb = Rgb::new(12, 12, 12);

/// Solver direction order: right, down, left, up.
const SOLVE_DIRS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Current phase of the maze animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MazePhase {
    #[default]
    Generating,
    Solving,
    Solved,
    Paused,
}

/// Wall/open grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGrid {
    width: u16,
    height: u16,
    open: Vec<bool>,
}

impl MazeGrid {
    /// All-wall grid. Dimensions are forced odd and at least 3.
    pub fn new(width: u16, height: u16) -> Self {
        let width = odd_at_least_3(width);
        let height = odd_at_least_3(height);
        Self {
            width,
            height,
            open: vec![false; width as usize * height as usize],
        }
    }

    /// Grid size for a panel at the given thickness.
    pub fn size_for_panel(width: u16, height: u16, thickness: MazeThickness) -> (u16, u16) {
        let t = thickness.pixels();
        (odd_at_least_3(width / t), odd_at_least_3(height / t))
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Whether the cell is carved. Out of range counts as wall.
    pub fn is_open(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.open[i])
    }

    /// Number of carved cells.
    pub fn open_count(&self) -> usize {
        self.open.iter().filter(|&&o| o).count()
    }

    /// Room coordinates (odd x and odd y).
    pub fn rooms(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let w = i32::from(self.width);
        let h = i32::from(self.height);
        (1..h).step_by(2).flat_map(move |y| (1..w).step_by(2).map(move |x| (x, y)))
    }

    /// Room in the corner opposite `(1, 1)`.
    pub fn goal(&self) -> (i32, i32) {
        (i32::from(self.width) - 2, i32::from(self.height) - 2)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn carve(&mut self, x: i32, y: i32) {
        if let Some(i) = self.index(x, y) {
            self.open[i] = true;
        }
    }
}

fn odd_at_least_3(n: u16) -> u16 {
    let n = n.max(3);
    if n % 2 == 0 { n - 1 } else { n }
}

/// Animated maze generator and solver.
#[derive(Debug, Clone)]
pub struct Maze {
    panel: (u16, u16),
    thickness: MazeThickness,
    grid: Option<MazeGrid>,
    carve_stack: Vec<(i32, i32)>,
    path: Vec<(i32, i32)>,
    visited: Vec<bool>,
    phase: MazePhase,
    timer: u32,
    rng: StdRng,
}

impl Maze {
    pub fn new(seed: u64) -> Self {
        Self {
            panel: (0, 0),
            thickness: MazeThickness::default(),
            grid: None,
            carve_stack: Vec::new(),
            path: Vec::new(),
            visited: Vec::new(),
            phase: MazePhase::Generating,
            timer: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A maze on a `grid_width x grid_height` grid, ready to generate.
    pub fn with_grid(grid_width: u16, grid_height: u16, seed: u64) -> Self {
        let mut maze = Self::new(seed);
        maze.ensure(grid_width, grid_height, MazeThickness::Small);
        maze
    }

    pub fn phase(&self) -> MazePhase {
        self.phase
    }

    pub fn grid(&self) -> Option<&MazeGrid> {
        self.grid.as_ref()
    }

    /// Current solver path, start first. Complete once solved.
    pub fn solution(&self) -> &[(i32, i32)] {
        &self.path
    }

    /// Carve until the maze is complete.
    pub fn run_generation(&mut self) {
        while self.phase == MazePhase::Generating && self.grid.is_some() {
            self.carve_step();
        }
    }

    /// Step the solver until it finishes. Returns the number of steps taken.
    pub fn run_solver(&mut self) -> usize {
        self.run_generation();
        let mut steps = 0;
        while self.phase == MazePhase::Solving {
            self.solve_step();
            steps += 1;
        }
        steps
    }

    fn ensure(&mut self, width: u16, height: u16, thickness: MazeThickness) {
        if self.grid.is_some() && self.panel == (width, height) && self.thickness == thickness {
            return;
        }
        self.panel = (width, height);
        self.thickness = thickness;
        self.start_new_maze();
    }

    fn start_new_maze(&mut self) {
        let (gw, gh) = MazeGrid::size_for_panel(self.panel.0, self.panel.1, self.thickness);
        let mut grid = MazeGrid::new(gw, gh);
        grid.carve(1, 1);
        self.visited = vec![false; grid.open.len()];
        self.grid = Some(grid);
        self.carve_stack = vec![(1, 1)];
        self.path.clear();
        self.phase = MazePhase::Generating;
        self.timer = 0;
        debug!(grid_width = gw, grid_height = gh, "maze generation started");
    }

    /// One DFS carve step. Moves to Solving when the stack empties.
    fn carve_step(&mut self) {
        let Some(grid) = self.grid.as_mut() else {
            return;
        };
        let Some(&(x, y)) = self.carve_stack.last() else {
            self.begin_solving();
            return;
        };

        let mut candidates = [(0, 0); 4];
        let mut n = 0;
        for (dx, dy) in SOLVE_DIRS {
            let (nx, ny) = (x + dx * 2, y + dy * 2);
            if grid.index(nx, ny).is_some() && !grid.is_open(nx, ny) {
                candidates[n] = (dx, dy);
                n += 1;
            }
        }

        if n == 0 {
            self.carve_stack.pop();
            if self.carve_stack.is_empty() {
                self.begin_solving();
            }
            return;
        }

        let (dx, dy) = candidates[self.rng.random_range(0..n)];
        grid.carve(x + dx, y + dy);
        grid.carve(x + dx * 2, y + dy * 2);
        self.carve_stack.push((x + dx * 2, y + dy * 2));
    }

    fn begin_solving(&mut self) {
        self.phase = MazePhase::Solving;
        self.timer = 0;
        self.visited.iter_mut().for_each(|v| *v = false);
        self.path = vec![(1, 1)];
        if let Some(i) = self.grid.as_ref().and_then(|g| g.index(1, 1)) {
            self.visited[i] = true;
        }
        debug!("maze solving started");
    }

    /// One solver step: advance to the first unvisited open neighbor, or
    /// backtrack.
    fn solve_step(&mut self) {
        let Some(grid) = self.grid.as_ref() else {
            return;
        };
        let Some(&(x, y)) = self.path.last() else {
            // Goal unreachable; show nothing and move on.
            self.finish_solving();
            return;
        };
        if (x, y) == grid.goal() {
            self.finish_solving();
            return;
        }

        for (dx, dy) in SOLVE_DIRS {
            let (nx, ny) = (x + dx, y + dy);
            if let Some(i) = grid.index(nx, ny)
                && grid.open[i]
                && !self.visited[i]
            {
                self.visited[i] = true;
                self.path.push((nx, ny));
                return;
            }
        }
        self.path.pop();
    }

    fn finish_solving(&mut self) {
        self.phase = MazePhase::Solved;
        self.timer = 0;
        debug!(length = self.path.len(), "maze solved");
    }

    fn advance(&mut self, frame: u64, frames_per_step: u64) {
        match self.phase {
            MazePhase::Generating => {
                for _ in 0..CARVE_STEPS_PER_FRAME {
                    self.carve_step();
                    if self.phase != MazePhase::Generating {
                        break;
                    }
                }
            }
            MazePhase::Solving => {
                if frame % frames_per_step.max(1) == 0 {
                    self.solve_step();
                }
            }
            MazePhase::Solved => {
                self.timer += 1;
                if self.timer >= SOLVED_HOLD_FRAMES {
                    self.phase = MazePhase::Paused;
                    self.timer = 0;
                }
            }
            MazePhase::Paused => {
                self.timer += 1;
                if self.timer >= PAUSED_HOLD_FRAMES {
                    self.start_new_maze();
                }
            }
        }
    }

    fn draw(&self, ctx: &RenderContext<'_>, buf: &mut PixelBuffer) {
        let Some(grid) = self.grid.as_ref() else {
            return;
        };
        let t = i32::from(self.thickness.pixels());
        let ox = (i32::from(ctx.width) - i32::from(grid.width) * t) / 2;
        let oy = (i32::from(ctx.height) - i32::from(grid.height) * t) / 2;
        let wall = ctx.dim(WALL);
        let open = ctx.dim(OPEN);

        for y in 0..i32::from(grid.height) {
            for x in 0..i32::from(grid.width) {
                let color = if grid.is_open(x, y) { open } else { wall };
                buf.fill_rect(ox + x * t, oy + y * t, t, t, color);
            }
        }

        let len = self.path.len().max(1) as f64;
        let v = ctx.value();
        for (i, &(x, y)) in self.path.iter().enumerate() {
            let color = hsv_to_rgb(0.8 * i as f64 / len, 1.0, v);
            buf.fill_rect(ox + x * t, oy + y * t, t, t, color);
        }
    }
}

impl Default for Maze {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Generator for Maze {
    fn name(&self) -> &'static str {
        "Maze"
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.ensure(width, height, self.thickness);
    }

    fn reset(&mut self) {
        self.grid = None;
        self.carve_stack.clear();
        self.path.clear();
        self.phase = MazePhase::Generating;
        self.timer = 0;
    }

    fn render(&mut self, ctx: RenderContext<'_>, buf: &mut PixelBuffer) {
        if ctx.is_empty() {
            return;
        }
        let opts = ctx.options.maze;
        self.ensure(ctx.width, ctx.height, opts.thickness);
        self.advance(ctx.frame, opts.speed.frames_per_step());
        self.draw(&ctx, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use panelfx_core::{MazeSpeed, MazeThickness};

    #[test]
    fn grid_sizes_are_odd() {
        assert_eq!(MazeGrid::size_for_panel(64, 32, MazeThickness::Small), (63, 31));
        assert_eq!(MazeGrid::size_for_panel(64, 64, MazeThickness::Medium), (31, 31));
        assert_eq!(MazeGrid::size_for_panel(64, 64, MazeThickness::Large), (21, 21));
        assert_eq!(MazeGrid::size_for_panel(2, 1, MazeThickness::Large), (3, 3));
    }

    #[test]
    fn generation_opens_every_room() {
        let mut maze = Maze::with_grid(21, 15, 7);
        maze.run_generation();
        assert_eq!(maze.phase(), MazePhase::Solving);
        let grid = maze.grid().unwrap();
        for (x, y) in grid.rooms() {
            assert!(grid.is_open(x, y), "room ({x},{y}) left closed");
        }
        // A spanning tree over the rooms: rooms + (rooms - 1) passages.
        let rooms = grid.rooms().count();
        assert_eq!(grid.open_count(), rooms * 2 - 1);
    }

    #[test]
    fn solver_reaches_goal() {
        let mut maze = Maze::with_grid(15, 15, 3);
        let steps = maze.run_solver();
        assert_eq!(maze.phase(), MazePhase::Solved);
        let grid = maze.grid().unwrap();
        let path = maze.solution();
        assert_eq!(path.first(), Some(&(1, 1)));
        assert_eq!(path.last(), Some(&grid.goal()));
        assert!(steps <= 15 * 15);
        for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_eq!((a.0 - b.0).abs() + (a.1 - b.1).abs(), 1);
        }
    }

    #[test]
    fn phases_cycle_back_to_generating() {
        let mut fx = Fixture::default();
        fx.options.maze.speed = MazeSpeed::Fast;
        let mut maze = Maze::new(1);
        let mut buf = PixelBuffer::new(16, 16);
        let mut seen = Vec::new();
        for frame in 1..2_000 {
            buf.clear();
            maze.render(fx.ctx(16, 16, frame), &mut buf);
            if seen.last() != Some(&maze.phase()) {
                seen.push(maze.phase());
            }
            if seen.len() == 5 {
                break;
            }
        }
        assert_eq!(
            seen,
            vec![
                MazePhase::Generating,
                MazePhase::Solving,
                MazePhase::Solved,
                MazePhase::Paused,
                MazePhase::Generating
            ]
        );
    }

    #[test]
    fn thickness_change_regenerates() {
        let mut fx = Fixture::default();
        let mut maze = Maze::new(5);
        let mut buf = PixelBuffer::new(32, 32);
        for frame in 1..50 {
            maze.render(fx.ctx(32, 32, frame), &mut buf);
        }
        assert_eq!(maze.grid().unwrap().width(), 15);
        fx.options.maze.thickness = MazeThickness::Small;
        maze.render(fx.ctx(32, 32, 50), &mut buf);
        assert_eq!(maze.grid().unwrap().width(), 31);
        assert_eq!(maze.phase(), MazePhase::Generating);
    }

    #[test]
    fn paints_walls_and_open_cells() {
        let fx = Fixture::default();
        let mut maze = Maze::new(2);
        let mut buf = PixelBuffer::new(20, 20);
        maze.render(fx.ctx(20, 20, 1), &mut buf);
        // Medium thickness: 9x9 grid of 2px cells, offset by 1.
        assert_eq!(buf.get(1, 1), Some(WALL));
        assert_eq!(buf.get(3, 3), Some(OPEN));
        assert_eq!(buf.get(0, 0), Some(Rgb::BLACK));
    }
}
