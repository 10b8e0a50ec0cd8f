//! A* pathfinding over the fine occupancy grid.
//!
//! Movement is 8-directional (cardinal steps cost 1, diagonal steps √2) with a
//! Euclidean heuristic. The open list is an ordered set keyed by
//! `(f, row, col)`. A neighbour is checked against the destination as soon as
//! it is generated, before any closed/open bookkeeping, and the search stops
//! right there.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::f64::consts::SQRT_2;

use log::{debug, trace};
use thiserror::Error;

use crate::grid::{Grid, GridCoord};
use crate::occupancy::OccupancyGrid;

/// Anything the pathfinder can search over.
pub trait Walkable {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Check if a coordinate lies inside the grid.
    fn in_bounds(&self, coord: &GridCoord) -> bool {
        coord.x >= 0
            && coord.x < self.width() as i32
            && coord.y >= 0
            && coord.y < self.height() as i32
    }

    /// Check if a cell is walkable/passable. Out-of-bounds cells are not.
    fn is_walkable(&self, coord: &GridCoord) -> bool;
}

impl Walkable for OccupancyGrid {
    fn width(&self) -> usize {
        OccupancyGrid::width(self)
    }

    fn height(&self) -> usize {
        OccupancyGrid::height(self)
    }

    fn is_walkable(&self, coord: &GridCoord) -> bool {
        self.is_free(*coord)
    }
}

/// Boolean grids count `true` as walkable.
impl Walkable for Grid<bool> {
    fn width(&self) -> usize {
        Grid::width(self)
    }

    fn height(&self) -> usize {
        Grid::height(self)
    }

    fn is_walkable(&self, coord: &GridCoord) -> bool {
        self.get(*coord).copied().unwrap_or(false)
    }
}

/// Why a search produced no path.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("coordinate {coord} is outside the grid")]
    OutOfBounds { coord: GridCoord },
    #[error("source cell is blocked")]
    BlockedSource,
    #[error("destination cell is blocked and no earlier destination is usable")]
    BlockedDestination,
    #[error("source and destination are the same cell")]
    Degenerate,
    #[error("open list exhausted before reaching the destination")]
    Exhausted,
}

/// Per-cell working state of a search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellRecord {
    pub g: f64,
    pub h: f64,
    pub f: f64,
    pub parent: Option<GridCoord>,
}

impl CellRecord {
    const UNVISITED: Self = Self {
        g: f64::INFINITY,
        h: f64::INFINITY,
        f: f64::INFINITY,
        parent: None,
    };
}

impl Default for CellRecord {
    fn default() -> Self {
        Self::UNVISITED
    }
}

/// A route through the fine grid, stored as a stack.
///
/// The top is the next cell to visit (initially the source) and the bottom
/// is the destination.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    // Bottom of the stack first, so `last()` is the top.
    cells: Vec<GridCoord>,
}

impl Path {
    /// Build a path from cells listed in walking order (source first).
    pub fn from_steps(steps: impl IntoIterator<Item = GridCoord>) -> Self {
        let mut cells: Vec<_> = steps.into_iter().collect();
        cells.reverse();
        Self { cells }
    }

    pub fn peek(&self) -> Option<GridCoord> {
        self.cells.last().copied()
    }

    pub fn pop(&mut self) -> Option<GridCoord> {
        self.cells.pop()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Final cell of the route.
    pub fn destination(&self) -> Option<GridCoord> {
        self.cells.first().copied()
    }

    /// Cells from the top of the stack down to the destination.
    pub fn steps(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.cells.iter().rev().copied()
    }

    /// Total length of the remaining route.
    pub fn cost(&self) -> f64 {
        self.cells
            .windows(2)
            .map(|pair| pair[0].distance(&pair[1]))
            .sum()
    }
}

/// Open list entry. Ordered by `f`, then row, then column.
#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    f: f64,
    coord: GridCoord,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then_with(|| self.coord.y.cmp(&other.coord.y))
            .then_with(|| self.coord.x.cmp(&other.coord.x))
    }
}

/// Neighbour offsets in generation order: N, S, E, W, NE, NW, SE, SW.
const SUCCESSORS: [(i32, i32, f64); 8] = [
    (0, -1, 1.0),
    (0, 1, 1.0),
    (1, 0, 1.0),
    (-1, 0, 1.0),
    (1, -1, SQRT_2),
    (-1, -1, SQRT_2),
    (1, 1, SQRT_2),
    (-1, 1, SQRT_2),
];

/// A* search with a one-slot memory of the last successful route.
///
/// Each agent should own its own pathfinder so that fallbacks never leak
/// between agents.
#[derive(Clone, Debug, Default)]
pub struct AStarPathfinder {
    records: Vec<CellRecord>,
    closed: Vec<bool>,
    last_path: Option<Path>,
    last_destination: Option<GridCoord>,
}

impl AStarPathfinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent successful route, possibly already partly walked.
    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_ref()
    }

    pub fn last_path_mut(&mut self) -> Option<&mut Path> {
        self.last_path.as_mut()
    }

    /// Destination of the most recent successful search.
    pub fn last_destination(&self) -> Option<GridCoord> {
        self.last_destination
    }

    /// Forget the last route and destination.
    pub fn clear(&mut self) {
        self.last_path = None;
        self.last_destination = None;
    }

    /// Find a route from `source` to `destination`.
    ///
    /// When the destination is blocked the destination of the last successful
    /// search is used instead. On success the route becomes the last known
    /// path and is returned by reference.
    pub fn find_path<W: Walkable>(
        &mut self,
        grid: &W,
        source: GridCoord,
        destination: GridCoord,
    ) -> Result<&Path, PathError> {
        for coord in [source, destination] {
            if !grid.in_bounds(&coord) {
                self.last_path = None;
                return Err(PathError::OutOfBounds { coord });
            }
        }

        if !grid.is_walkable(&source) {
            return Err(PathError::BlockedSource);
        }

        let destination = if grid.is_walkable(&destination) {
            destination
        } else {
            match self.last_destination {
                Some(previous) if grid.in_bounds(&previous) && grid.is_walkable(&previous) => {
                    trace!("destination {destination} blocked, falling back to {previous}");
                    previous
                }
                _ => return Err(PathError::BlockedDestination),
            }
        };

        if source == destination {
            return Err(PathError::Degenerate);
        }

        let path = self.search(grid, source, destination)?;
        self.last_destination = Some(destination);
        Ok(&*self.last_path.insert(path))
    }

    fn search<W: Walkable>(
        &mut self,
        grid: &W,
        source: GridCoord,
        destination: GridCoord,
    ) -> Result<Path, PathError> {
        let width = grid.width();
        let cell_count = width * grid.height();
        let index = |coord: GridCoord| (coord.y as usize) * width + (coord.x as usize);

        self.records.clear();
        self.records.resize(cell_count, CellRecord::UNVISITED);
        self.closed.clear();
        self.closed.resize(cell_count, false);

        self.records[index(source)] = CellRecord {
            g: 0.0,
            h: 0.0,
            f: 0.0,
            parent: Some(source),
        };

        let mut open = BTreeSet::new();
        open.insert(OpenEntry { f: 0.0, coord: source });

        while let Some(OpenEntry { coord: current, .. }) = open.pop_first() {
            self.closed[index(current)] = true;
            let current_g = self.records[index(current)].g;

            for &(dx, dy, step_cost) in SUCCESSORS.iter() {
                let neighbor = current.offset(dx, dy);
                if !grid.in_bounds(&neighbor) {
                    continue;
                }

                if neighbor == destination {
                    self.records[index(neighbor)].parent = Some(current);
                    return Ok(self.trace(source, destination, width));
                }

                let slot = index(neighbor);
                if self.closed[slot] || !grid.is_walkable(&neighbor) {
                    continue;
                }

                let g = current_g + step_cost;
                let h = neighbor.distance(&destination);
                let f = g + h;

                let record = &mut self.records[slot];
                if record.f == f64::INFINITY || record.f > f {
                    open.insert(OpenEntry { f, coord: neighbor });
                    *record = CellRecord {
                        g,
                        h,
                        f,
                        parent: Some(current),
                    };
                }
            }
        }

        debug!("no route from {source} to {destination}");
        Err(PathError::Exhausted)
    }

    // Walk parent links back from the destination. The source is its own
    // parent.
    fn trace(&self, source: GridCoord, destination: GridCoord, width: usize) -> Path {
        let mut cells = Vec::new();
        let mut current = destination;
        loop {
            cells.push(current);
            let parent = self.records[(current.y as usize) * width + (current.x as usize)].parent;
            match parent {
                Some(parent) if parent != current => current = parent,
                _ => break,
            }
        }
        debug_assert_eq!(cells.last(), Some(&source));
        Path { cells }
    }
}
