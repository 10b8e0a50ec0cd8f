//! Fine occupancy grid derived from the logical maze.
//!
//! Each logical cell `(x, y)` owns the 3×3 block of fine cells centred on
//! `(3x, 3y)`. One fine cell is one world unit, so the block centre is also the
//! world position of the logical cell on the X/Z plane.

use crate::grid::{Grid, GridCoord};
use crate::math::Vec3;
use crate::maze::MazeGrid;

/// Fine cells per logical cell along each axis.
pub const SCALE: i32 = 3;

/// Occupancy of a single fine cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Occupancy {
    Wall,
    Free,
}

/// Walkable/blocked grid at three times the logical resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct OccupancyGrid {
    cells: Grid<Occupancy>,
}

impl OccupancyGrid {
    /// Expand a finished logical maze into its fine grid.
    ///
    /// Every passage frees the width-3 cross through its block centre: the
    /// centre row band and the centre column band. Fine cells outside the grid
    /// are skipped.
    pub fn build(maze: &MazeGrid) -> Self {
        let width = maze.width() * SCALE as usize;
        let height = maze.height() * SCALE as usize;
        let mut cells = Grid::new(width, height, Occupancy::Wall);

        for cell in maze.passages() {
            let center = GridCoord::new(cell.x * SCALE, cell.y * SCALE);
            for along in -1..=1 {
                for across in -1..=1 {
                    // Row band and column band of the cross.
                    cells.set(center.offset(along, across), Occupancy::Free);
                    cells.set(center.offset(across, along), Occupancy::Free);
                }
            }
        }

        Self { cells }
    }

    /// An obstacle-free grid.
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            cells: Grid::new(width, height, Occupancy::Free),
        }
    }

    /// Parse a grid from text rows: `#` is a wall, anything else is free.
    ///
    /// Rows shorter than the longest one are padded with walls.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut cells = Grid::new(width, rows.len(), Occupancy::Wall);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch != '#' {
                    cells.set(GridCoord::new(x as i32, y as i32), Occupancy::Free);
                }
            }
        }
        Self { cells }
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

    /// True when `coord` is inside the grid and free.
    pub fn is_free(&self, coord: GridCoord) -> bool {
        self.cells.get(coord) == Some(&Occupancy::Free)
    }

    pub fn get(&self, coord: GridCoord) -> Option<Occupancy> {
        self.cells.get(coord).copied()
    }

    pub fn set(&mut self, coord: GridCoord, occupancy: Occupancy) -> bool {
        self.cells.set(coord, occupancy)
    }

    pub fn free_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|(_, cell)| **cell == Occupancy::Free)
            .count()
    }

    /// Fine cell containing a world position (ceiling rounding on X and Z).
    ///
    /// Near corridor edges this can land an agent on a wall cell; pursuers
    /// then keep to their remembered route until they are back on free cells.
    pub fn world_to_fine(position: Vec3) -> GridCoord {
        GridCoord::new(position.x.ceil() as i32, position.z.ceil() as i32)
    }

    /// World position of a fine cell at height `y`.
    pub fn fine_to_world(coord: GridCoord, y: f32) -> Vec3 {
        Vec3::new(coord.x as f32, y, coord.y as f32)
    }

    /// Logical cell containing a world position.
    pub fn world_to_logical(position: Vec3) -> GridCoord {
        let scale = SCALE as f32;
        GridCoord::new(
            (position.x / scale).round() as i32,
            (position.z / scale).round() as i32,
        )
    }

    /// World position of a logical cell centre at height `y`.
    pub fn logical_to_world(cell: GridCoord, y: f32) -> Vec3 {
        Self::fine_to_world(GridCoord::new(cell.x * SCALE, cell.y * SCALE), y)
    }
}

impl std::fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                let glyph = if self.is_free(GridCoord::new(x, y)) { '.' } else { '#' };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Cell;

    #[test]
    fn single_passage_frees_its_block() {
        let mut maze = MazeGrid::new(3, 3);
        maze.set(GridCoord::new(1, 1), Cell::Passage);
        let fine = OccupancyGrid::build(&maze);

        assert_eq!(fine.width(), 9);
        assert_eq!(fine.height(), 9);
        assert_eq!(fine.free_count(), 9);
        for y in 2..=4 {
            for x in 2..=4 {
                assert!(fine.is_free(GridCoord::new(x, y)));
            }
        }
        assert!(!fine.is_free(GridCoord::new(1, 3)));
        assert!(!fine.is_free(GridCoord::new(5, 3)));
    }

    #[test]
    fn edge_passage_clips_to_grid() {
        let mut maze = MazeGrid::new(2, 2);
        maze.set(GridCoord::new(0, 0), Cell::Passage);
        let fine = OccupancyGrid::build(&maze);
        // Only the in-bounds quarter of the block survives.
        assert_eq!(fine.free_count(), 4);
    }

    #[test]
    fn world_conversion_rounds_up() {
        assert_eq!(OccupancyGrid::world_to_fine(Vec3::new(2.1, 0.0, 3.0)), GridCoord::new(3, 3));
        assert_eq!(OccupancyGrid::world_to_fine(Vec3::new(-0.4, 0.0, 0.0)), GridCoord::new(0, 0));
        assert_eq!(OccupancyGrid::world_to_logical(Vec3::new(4.4, 0.0, 2.0)), GridCoord::new(1, 1));
        assert_eq!(OccupancyGrid::logical_to_world(GridCoord::new(2, 1), 0.5), Vec3::new(6.0, 0.5, 3.0));
    }

    #[test]
    fn rows_parse_walls() {
        let fine = OccupancyGrid::from_rows(&["#..", ".#"]);
        assert_eq!(fine.width(), 3);
        assert!(!fine.is_free(GridCoord::new(0, 0)));
        assert!(fine.is_free(GridCoord::new(1, 0)));
        assert!(!fine.is_free(GridCoord::new(2, 1)));
    }
}
