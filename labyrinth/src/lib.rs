//! Labyrinth - maze generation, occupancy indexing and A* pursuit.
//!
//! A [`MazeGenerator`] carves a perfect maze into a logical [`MazeGrid`]. The
//! maze is expanded into a three-times finer [`OccupancyGrid`] that pursuers
//! search with [`AStarPathfinder`], and compiled into floor and wall
//! [`Placement`]s for drawing and collision. [`MazeWorld`] ties it together.

pub mod collision;
pub mod compiler;
pub mod config;
pub mod error;
pub mod grid;
pub mod math;
pub mod maze;
pub mod occupancy;
pub mod pathfinding;
pub mod pursuit;
pub mod world;

pub use crate::collision::{check_collision, Direction, Heading};
pub use crate::compiler::{compile, Placement, PlacementKind};
pub use crate::config::MazeConfig;
pub use crate::error::ConfigError;
pub use crate::grid::{Grid, GridCoord};
pub use crate::math::Vec3;
pub use crate::maze::{CarveStats, Cell, MazeGenerator, MazeGrid};
pub use crate::occupancy::{Occupancy, OccupancyGrid};
pub use crate::pathfinding::{AStarPathfinder, Path, PathError, Walkable};
pub use crate::pursuit::{Pursuer, PursuitMode, PursuitStep};
pub use crate::world::{FrameReport, MazeWorld, PursuerId};
