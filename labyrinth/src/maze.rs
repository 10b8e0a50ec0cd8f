//! Logical maze grid and randomized depth-first carving.
//!
//! Carving starts from a single cell and only ever moves two cells at a time,
//! knocking out the wall in between. Every carved cell is therefore reachable
//! from the start and the passages form a spanning tree: there is exactly one
//! simple route between any two of them.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use log::{debug, warn};

use crate::grid::{Grid, GridCoord};

/// A cell of the logical maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Wall,
    Passage,
}

/// The four carving directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

impl Cardinal {
    pub const ALL: [Cardinal; 4] = [Cardinal::North, Cardinal::East, Cardinal::South, Cardinal::West];

    /// Unit offset of this direction; north is row -1.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Cardinal::North => (0, -1),
            Cardinal::East => (1, 0),
            Cardinal::South => (0, 1),
            Cardinal::West => (-1, 0),
        }
    }
}

/// Coarse wall/passage layout of the maze.
#[derive(Clone, Debug, PartialEq)]
pub struct MazeGrid {
    cells: Grid<Cell>,
}

impl MazeGrid {
    /// Create a maze of the given size filled with walls.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: Grid::new(width, height, Cell::Wall),
        }
    }

    pub fn width(&self) -> usize {
        self.cells.width()
    }

    pub fn height(&self) -> usize {
        self.cells.height()
    }

    pub fn is_valid(&self, coord: &GridCoord) -> bool {
        self.cells.is_valid(coord)
    }

    /// Cell at `coord`; out-of-bounds coordinates read as walls.
    pub fn cell(&self, coord: GridCoord) -> Cell {
        self.cells.get(coord).copied().unwrap_or(Cell::Wall)
    }

    pub fn is_passage(&self, coord: GridCoord) -> bool {
        self.cell(coord) == Cell::Passage
    }

    pub fn set(&mut self, coord: GridCoord, cell: Cell) -> bool {
        self.cells.set(coord, cell)
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Iterate over every passage coordinate in row-major order.
    pub fn passages(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.cells
            .iter()
            .filter(|(_, cell)| **cell == Cell::Passage)
            .map(|(coord, _)| coord)
    }

    pub fn passage_count(&self) -> usize {
        self.passages().count()
    }

    /// Flood fill over 4-connected passages starting at `start`.
    ///
    /// Returns an empty set when `start` is not a passage.
    pub fn reachable_from(&self, start: GridCoord) -> HashSet<GridCoord> {
        let mut visited = HashSet::new();
        if !self.is_passage(start) {
            return visited;
        }

        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for neighbor in self.cells.neighbors_4(&current) {
                if self.is_passage(neighbor) && visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        visited
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                let glyph = match self.cell(GridCoord::new(x, y)) {
                    Cell::Wall => '#',
                    Cell::Passage => ' ',
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Counters collected while carving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CarveStats {
    /// Cells carving descended into, including the start.
    pub rooms: usize,
    /// Walls knocked out between a room and the next one.
    pub walls_removed: usize,
}

/// One pending level of the depth-first walk.
struct CarveFrame {
    cell: GridCoord,
    directions: [Cardinal; 4],
    next: usize,
}

/// Randomized depth-first maze generator.
pub struct MazeGenerator {
    rng: fastrand::Rng,
    seed: u64,
}

impl MazeGenerator {
    /// Create a generator. Without a seed one is drawn from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| fastrand::u64(..));
        Self {
            rng: fastrand::Rng::with_seed(seed),
            seed,
        }
    }

    /// Seed the generator was created (or last reseeded) with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the random sequence from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng.seed(seed);
    }

    /// Fill the whole grid with walls.
    pub fn reset(&self, maze: &mut MazeGrid) {
        maze.fill(Cell::Wall);
    }

    /// Carve passages depth-first from `start`.
    ///
    /// Cells are visited in the same order a recursive walk would use; the
    /// pending directions of each level live on an explicit stack instead of
    /// the call stack.
    pub fn carve(&mut self, maze: &mut MazeGrid, start: GridCoord) -> CarveStats {
        let mut stats = CarveStats::default();
        if !maze.is_valid(&start) {
            warn!("carve start {start} is outside the {}x{} maze", maze.width(), maze.height());
            return stats;
        }

        maze.set(start, Cell::Passage);
        stats.rooms = 1;
        let mut stack = vec![CarveFrame {
            cell: start,
            directions: self.shuffled_directions(),
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.directions.len() {
                stack.pop();
                continue;
            }
            let (dx, dy) = frame.directions[frame.next].delta();
            frame.next += 1;
            let cell = frame.cell;

            let target = cell.offset(dx * 2, dy * 2);
            if maze.is_valid(&target) && maze.cell(target) == Cell::Wall {
                maze.set(cell.offset(dx, dy), Cell::Passage);
                maze.set(target, Cell::Passage);
                stats.walls_removed += 1;
                stats.rooms += 1;
                stack.push(CarveFrame {
                    cell: target,
                    directions: self.shuffled_directions(),
                    next: 0,
                });
            }
        }

        debug!(
            "carved {} rooms ({} walls removed) from {start}",
            stats.rooms, stats.walls_removed
        );
        stats
    }

    /// Build a fresh maze: reset to walls, then carve from `start`.
    pub fn generate(&mut self, width: usize, height: usize, start: GridCoord) -> (MazeGrid, CarveStats) {
        let mut maze = MazeGrid::new(width, height);
        self.reset(&mut maze);
        let stats = self.carve(&mut maze, start);
        (maze, stats)
    }

    // Swap shuffle driven by a two-bit draw per slot. Not uniform.
    fn shuffled_directions(&mut self) -> [Cardinal; 4] {
        let mut directions = Cardinal::ALL;
        for i in 0..directions.len() {
            let r = self.rng.usize(..4);
            directions.swap(i, r);
        }
        directions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_fills_walls() {
        let mut maze = MazeGrid::new(5, 5);
        maze.set(GridCoord::new(1, 1), Cell::Passage);
        MazeGenerator::new(Some(1)).reset(&mut maze);
        assert_eq!(maze.passage_count(), 0);
    }

    #[test]
    fn carving_covers_every_odd_cell() {
        let mut generator = MazeGenerator::new(Some(42));
        let (maze, stats) = generator.generate(11, 9, GridCoord::new(1, 1));
        // 5 odd columns x 4 odd rows.
        assert_eq!(stats.rooms, 20);
        for y in (1..9).step_by(2) {
            for x in (1..11).step_by(2) {
                assert!(maze.is_passage(GridCoord::new(x, y)), "({x}, {y}) not carved");
            }
        }
        // Even/even cells are pillars and never carved.
        assert!(!maze.is_passage(GridCoord::new(2, 2)));
    }

    #[test]
    fn out_of_bounds_start_leaves_grid_alone() {
        let mut generator = MazeGenerator::new(Some(3));
        let mut maze = MazeGrid::new(7, 7);
        let stats = generator.carve(&mut maze, GridCoord::new(9, 1));
        assert_eq!(stats, CarveStats::default());
        assert_eq!(maze.passage_count(), 0);
    }

    #[test]
    fn display_prints_one_line_per_row() {
        let (maze, _) = MazeGenerator::new(Some(5)).generate(7, 5, GridCoord::new(1, 1));
        let text = maze.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|line| line.chars().count() == 7));
        assert_eq!(lines[0], "#######");
        assert_eq!(&lines[1][1..2], " ");
    }

    #[test]
    fn reachable_from_wall_is_empty() {
        let maze = MazeGrid::new(3, 3);
        assert!(maze.reachable_from(GridCoord::new(1, 1)).is_empty());
    }
}
