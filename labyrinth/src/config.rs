//! Maze and pursuit configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::GridCoord;
use crate::pursuit::DEFAULT_CATCH_RADIUS;

/// Configuration values for maze generation and the pursuers living in it.
///
/// Every field has a default, so a JSON file only needs the values it changes:
///
/// ```
/// use labyrinth::MazeConfig;
///
/// let config = MazeConfig::from_json_str(r#"{ "width": 21, "height": 11, "seed": 7 }"#).unwrap();
/// assert_eq!(config.width, 21);
/// assert_eq!(config.start, [1, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Logical maze width in cells.
    pub width: usize,
    /// Logical maze height in cells.
    pub height: usize,
    /// Logical cell carving starts from; also the player's start.
    pub start: [i32; 2],
    /// Logical goal cell. Defaults to the carved cell furthest right and down.
    pub goal: Option<[i32; 2]>,
    /// Random seed. `None` draws one from entropy.
    pub seed: Option<u64>,
    /// Pursuer speed in world units per second.
    pub pursuer_speed: f32,
    /// Planar distance at which a pursuer catches the player.
    pub catch_radius: f32,
    /// Logical cells pursuers spawn in. `None` spawns one pursuer on the goal.
    pub pursuer_spawns: Option<Vec<[i32; 2]>>,
    /// Height (world Y) agents move at.
    pub floor_level: f32,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 15,
            start: [1, 1],
            goal: None,
            seed: None,
            pursuer_speed: 3.0,
            catch_radius: DEFAULT_CATCH_RADIUS,
            pursuer_spawns: None,
            floor_level: 0.0,
        }
    }
}

impl MazeConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid maze configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("failed to load {}", path.display()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Override the logical maze size.
    #[must_use]
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_start(mut self, x: i32, y: i32) -> Self {
        self.start = [x, y];
        self
    }

    #[must_use]
    pub fn with_goal(mut self, x: i32, y: i32) -> Self {
        self.goal = Some([x, y]);
        self
    }

    #[must_use]
    pub fn with_pursuer_speed(mut self, speed: f32) -> Self {
        self.pursuer_speed = speed;
        self
    }

    #[must_use]
    pub fn with_catch_radius(mut self, radius: f32) -> Self {
        self.catch_radius = radius;
        self
    }

    /// Replace the pursuer spawn cells. An empty list spawns no pursuers.
    #[must_use]
    pub fn with_pursuer_spawns(mut self, spawns: Vec<[i32; 2]>) -> Self {
        self.pursuer_spawns = Some(spawns);
        self
    }

    #[must_use]
    pub fn with_floor_level(mut self, y: f32) -> Self {
        self.floor_level = y;
        self
    }

    pub fn start_cell(&self) -> GridCoord {
        GridCoord::new(self.start[0], self.start[1])
    }

    /// Goal cell, defaulting to the carved cell with the largest coordinates.
    pub fn goal_cell(&self) -> GridCoord {
        if let Some([x, y]) = self.goal {
            return GridCoord::new(x, y);
        }
        let [sx, sy] = self.start;
        let last_x = self.width as i32 - 1;
        let last_y = self.height as i32 - 1;
        GridCoord::new(sx + (last_x - sx) / 2 * 2, sy + (last_y - sy) / 2 * 2)
    }

    /// Logical cells pursuers spawn in.
    pub fn spawn_cells(&self) -> Vec<GridCoord> {
        match &self.pursuer_spawns {
            Some(spawns) => spawns.iter().map(|&[x, y]| GridCoord::new(x, y)).collect(),
            None => vec![self.goal_cell()],
        }
    }

    /// True when carving from the start cell is guaranteed to open `cell`.
    ///
    /// Carving moves two cells at a time, so it reaches every in-bounds cell
    /// whose offsets from the start are both even.
    pub fn is_carved_cell(&self, cell: GridCoord) -> bool {
        let [sx, sy] = self.start;
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.width
            && (cell.y as usize) < self.height
            && (cell.x - sx) % 2 == 0
            && (cell.y - sy) % 2 == 0
    }

    /// Check the configuration for values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 3 || self.height < 3 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let [sx, sy] = self.start;
        if sx < 0 || sy < 0 || sx as usize >= self.width || sy as usize >= self.height {
            return Err(ConfigError::StartOutOfBounds { x: sx, y: sy });
        }

        let goal = self.goal_cell();
        if !self.is_carved_cell(goal) {
            return Err(ConfigError::NotCarvable {
                what: "goal",
                x: goal.x,
                y: goal.y,
            });
        }

        if let Some(spawn) = self.spawn_cells().into_iter().find(|&cell| !self.is_carved_cell(cell)) {
            return Err(ConfigError::NotCarvable {
                what: "pursuer spawn",
                x: spawn.x,
                y: spawn.y,
            });
        }

        if !self.pursuer_speed.is_finite() || self.pursuer_speed <= 0.0 {
            return Err(ConfigError::InvalidSpeed(self.pursuer_speed));
        }

        if !self.catch_radius.is_finite() || self.catch_radius < 0.0 {
            return Err(ConfigError::InvalidCatchRadius(self.catch_radius));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_goal_is_far_corner() {
        let config = MazeConfig::default();
        assert_eq!(config.goal_cell(), GridCoord::new(29, 13));
        assert_eq!(config.spawn_cells(), vec![GridCoord::new(29, 13)]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_tiny_maze() {
        let config = MazeConfig::default().with_size(2, 10);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDimensions { width: 2, height: 10 })
        );
    }

    #[test]
    fn rejects_goal_off_the_carving_lattice() {
        let config = MazeConfig::default().with_goal(4, 3);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotCarvable { what: "goal", x: 4, y: 3 })
        ));
    }

    #[test]
    fn goal_follows_the_start_lattice() {
        let config = MazeConfig::default().with_size(11, 9).with_start(3, 3);
        assert_eq!(config.goal_cell(), GridCoord::new(9, 7));
        assert!(config.is_carved_cell(GridCoord::new(5, 1)));
        assert!(!config.is_carved_cell(GridCoord::new(1, 2)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_speed() {
        let config = MazeConfig::default().with_pursuer_speed(f32::NAN);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSpeed(_))));
    }

    #[test]
    fn json_fills_in_defaults() {
        let config = MazeConfig::from_json_str(r#"{ "seed": 99, "pursuer_spawns": [[1, 13], [29, 1]] }"#)
            .unwrap();
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.width, 30);
        assert_eq!(config.spawn_cells().len(), 2);

        let round_trip = MazeConfig::from_json_str(&config.to_json_pretty().unwrap()).unwrap();
        assert_eq!(round_trip, config);
    }

    #[test]
    fn json_validation_errors_surface() {
        let err = MazeConfig::from_json_str(r#"{ "start": [50, 1] }"#).unwrap_err();
        assert!(err.to_string().contains("outside the maze"));
    }
}
