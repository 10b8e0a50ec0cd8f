//! Row-major grid storage shared by the logical maze and the fine occupancy grid.
//!
//! Coordinates are signed so that neighbour arithmetic can step outside the
//! grid and be rejected by `is_valid` instead of wrapping.

use serde::{Deserialize, Serialize};

/// A cell position in a grid (column `x`, row `y`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate shifted by `(dx, dy)`.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to another coordinate.
    pub fn distance(&self, other: &GridCoord) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Fixed-size grid storing one value per cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>, // Row-major: [y * width + x]
}

impl<T: Clone> Grid<T> {
    /// Create a new grid with every cell set to `default`.
    pub fn new(width: usize, height: usize, default: T) -> Self {
        Self {
            width,
            height,
            cells: vec![default; width * height],
        }
    }

    /// Overwrite every cell with `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if a grid coordinate is within bounds.
    pub fn is_valid(&self, coord: &GridCoord) -> bool {
        coord.x >= 0
            && coord.x < self.width as i32
            && coord.y >= 0
            && coord.y < self.height as i32
    }

    /// Row-major index of `coord`, or `None` when it is out of bounds.
    pub fn index_of(&self, coord: GridCoord) -> Option<usize> {
        if !self.is_valid(&coord) {
            return None;
        }
        Some((coord.y as usize) * self.width + (coord.x as usize))
    }

    /// Get the cell data at the given coordinate.
    /// Returns `None` if the coordinate is out of bounds.
    pub fn get(&self, coord: GridCoord) -> Option<&T> {
        self.index_of(coord).and_then(|index| self.cells.get(index))
    }

    /// Get mutable access to the cell data at the given coordinate.
    pub fn get_mut(&mut self, coord: GridCoord) -> Option<&mut T> {
        let index = self.index_of(coord)?;
        self.cells.get_mut(index)
    }

    /// Set the cell data at the given coordinate.
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, coord: GridCoord, value: T) -> bool {
        if let Some(cell) = self.get_mut(coord) {
            *cell = value;
            true
        } else {
            false
        }
    }

    /// In-bounds neighbours of a coordinate (north, east, south, west).
    pub fn neighbors_4(&self, coord: &GridCoord) -> Vec<GridCoord> {
        let directions = [(0, -1), (1, 0), (0, 1), (-1, 0)];
        directions
            .iter()
            .map(|&(dx, dy)| coord.offset(dx, dy))
            .filter(|neighbor| self.is_valid(neighbor))
            .collect()
    }

    /// Iterate over all coordinates in row-major order.
    pub fn iter_coords(&self) -> impl Iterator<Item = GridCoord> {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| GridCoord::new(x, y)))
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &T)> {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let coord = GridCoord::new((index % width) as i32, (index / width) as i32);
            (coord, cell)
        })
    }
}
