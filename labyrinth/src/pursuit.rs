//! Per-frame pursuit of the player.
//!
//! A pursuer within one step of the player catches it outright. Otherwise
//! it searches from scratch every frame. When the search fails it
//! keeps walking its last known path, and when there is nothing to walk it
//! heads straight for the player, ignoring walls.

use log::{debug, trace};

use crate::math::Vec3;
use crate::occupancy::OccupancyGrid;
use crate::pathfinding::{AStarPathfinder, PathError, Walkable};

/// Catch distance used when none is configured.
pub const DEFAULT_CATCH_RADIUS: f32 = 0.3;

/// How a pursuer moved during one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PursuitMode {
    /// Followed a path found this frame.
    Tracking,
    /// Search failed; followed the route from an earlier frame.
    LastKnownPath,
    /// No usable route; stepped straight toward the player.
    Direct,
    /// Already in the player's cell; closing the remaining gap.
    FinalApproach,
    /// Reached the player.
    Caught,
}

/// Result of advancing a pursuer by one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PursuitStep {
    pub position: Vec3,
    pub mode: PursuitMode,
}

/// An NPC that chases the player through the fine grid.
#[derive(Clone, Debug)]
pub struct Pursuer {
    position: Vec3,
    speed: f32,
    catch_radius: f32,
    pathfinder: AStarPathfinder,
}

impl Pursuer {
    /// Create a pursuer at `position` moving `speed` world units per second.
    pub fn new(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            speed,
            catch_radius: DEFAULT_CATCH_RADIUS,
            pathfinder: AStarPathfinder::new(),
        }
    }

    #[must_use]
    pub fn with_catch_radius(mut self, radius: f32) -> Self {
        self.catch_radius = radius;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn catch_radius(&self) -> f32 {
        self.catch_radius
    }

    pub fn pathfinder(&self) -> &AStarPathfinder {
        &self.pathfinder
    }

    /// Teleport to `position` and forget any remembered route.
    pub fn reset(&mut self, position: Vec3) {
        self.position = position;
        self.pathfinder.clear();
    }

    /// True when the player is within the catch radius on the X/Z plane.
    pub fn has_caught(&self, player: Vec3) -> bool {
        self.position.planar_distance(player) <= self.catch_radius
    }

    /// Move one frame toward `player` and report where the pursuer ended up.
    pub fn advance<W: Walkable>(&mut self, grid: &W, player: Vec3, dt: f32) -> PursuitStep {
        let step = (self.speed * dt).max(0.0);
        if self.position.planar_distance(player) <= step {
            return self.snap_to(player);
        }

        let current = OccupancyGrid::world_to_fine(self.position);
        let target = OccupancyGrid::world_to_fine(player);

        let mode = match self.pathfinder.find_path(grid, current, target) {
            Ok(_) => PursuitMode::Tracking,
            Err(PathError::Degenerate) => {
                return self.approach(player, step, PursuitMode::FinalApproach);
            }
            Err(err @ PathError::OutOfBounds { .. }) => {
                debug!("pursuer at {current}: {err}, moving directly");
                return self.approach(player, step, PursuitMode::Direct);
            }
            Err(err) => {
                let remembered = self.pathfinder.last_path().is_some_and(|path| !path.is_empty());
                if !remembered {
                    debug!("pursuer at {current}: {err}, no route to fall back on");
                    return self.approach(player, step, PursuitMode::Direct);
                }
                trace!("pursuer at {current}: {err}, keeping last known path");
                PursuitMode::LastKnownPath
            }
        };

        let next = self.pathfinder.last_path_mut().and_then(|path| {
            while path.peek() == Some(current) {
                path.pop();
            }
            path.peek()
        });
        let Some(next) = next else {
            return self.approach(player, step, PursuitMode::FinalApproach);
        };

        let direction = Vec3::new(
            (next.x - current.x).signum() as f32,
            0.0,
            (next.y - current.y).signum() as f32,
        );
        self.position += direction.normalized() * step;
        PursuitStep {
            position: self.position,
            mode,
        }
    }

    fn snap_to(&mut self, target: Vec3) -> PursuitStep {
        self.position.x = target.x;
        self.position.z = target.z;
        PursuitStep {
            position: self.position,
            mode: PursuitMode::Caught,
        }
    }

    // Straight-line 8-way step toward `target`. Axes closer than half a step
    // are left alone so the pursuer does not zig-zag around the target, and
    // no axis moves past it.
    fn approach(&mut self, target: Vec3, step: f32, mode: PursuitMode) -> PursuitStep {
        let dead_zone = step * 0.5;
        let axis = |delta: f32| {
            if delta > dead_zone {
                1.0
            } else if delta < -dead_zone {
                -1.0
            } else {
                0.0
            }
        };
        let direction = Vec3::new(
            axis(target.x - self.position.x),
            0.0,
            axis(target.z - self.position.z),
        );
        let delta = direction.normalized() * step;
        self.position.x = clamp_toward(self.position.x, delta.x, target.x);
        self.position.z = clamp_toward(self.position.z, delta.z, target.z);
        PursuitStep {
            position: self.position,
            mode,
        }
    }
}

// `from + delta`, stopping at `target` if the move would cross it.
fn clamp_toward(from: f32, delta: f32, target: f32) -> f32 {
    let to = from + delta;
    if (delta > 0.0 && to > target) || (delta < 0.0 && to < target) {
        target
    } else {
        to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridCoord;
    use crate::occupancy::Occupancy;

    #[test]
    fn tracking_moves_diagonally_at_speed() {
        let grid = OccupancyGrid::open(8, 8);
        let mut spider = Pursuer::new(Vec3::ZERO, 2.0);
        let step = spider.advance(&grid, Vec3::new(5.0, 0.0, 5.0), 0.5);

        assert_eq!(step.mode, PursuitMode::Tracking);
        assert!((step.position.length() - 1.0).abs() < 1e-5);
        assert!((step.position.x - step.position.z).abs() < 1e-6);
        assert_eq!(step.position.y, 0.0);
    }

    #[test]
    fn height_is_preserved() {
        let grid = OccupancyGrid::open(8, 8);
        let mut spider = Pursuer::new(Vec3::new(0.0, 0.75, 0.0), 1.0);
        let step = spider.advance(&grid, Vec3::new(6.0, 0.0, 0.0), 0.1);
        assert_eq!(step.position.y, 0.75);
        assert!(step.position.x > 0.0);
    }

    #[test]
    fn blocked_destination_without_memory_moves_directly() {
        let grid = OccupancyGrid::from_rows(&[
            "......",
            "......",
            ".....#",
        ]);
        let mut spider = Pursuer::new(Vec3::ZERO, 1.0);
        let step = spider.advance(&grid, Vec3::new(5.0, 0.0, 2.0), 0.1);
        assert_eq!(step.mode, PursuitMode::Direct);
    }

    #[test]
    fn falls_back_to_remembered_route() {
        let grid = OccupancyGrid::from_rows(&[
            ".......",
            ".......",
            "......#",
        ]);
        let mut spider = Pursuer::new(Vec3::ZERO, 1.0);
        let first = spider.advance(&grid, Vec3::new(6.0, 0.0, 0.0), 0.1);
        assert_eq!(first.mode, PursuitMode::Tracking);

        // The spider is now in a fine cell that no longer connects to anything.
        let mut sealed = grid.clone();
        for x in 0..7 {
            for y in 0..3 {
                if (x, y) != (1, 0) {
                    sealed.set(GridCoord::new(x, y), Occupancy::Wall);
                }
            }
        }
        sealed.set(GridCoord::new(6, 0), Occupancy::Free);
        let second = spider.advance(&sealed, Vec3::new(6.0, 0.0, 0.0), 0.1);
        assert_eq!(second.mode, PursuitMode::LastKnownPath);
        assert!(second.position.x > first.position.x);
    }

    #[test]
    fn out_of_bounds_player_is_approached_directly() {
        let grid = OccupancyGrid::open(4, 4);
        let mut spider = Pursuer::new(Vec3::new(1.0, 0.0, 1.0), 1.0);
        let step = spider.advance(&grid, Vec3::new(20.0, 0.0, 1.0), 0.5);
        assert_eq!(step.mode, PursuitMode::Direct);
        assert!((step.position.x - 1.5).abs() < 1e-6);
        assert!(spider.pathfinder().last_path().is_none());
    }

    #[test]
    fn snaps_onto_player_when_within_a_step() {
        let grid = OccupancyGrid::open(4, 4);
        let mut spider = Pursuer::new(Vec3::new(1.9, 0.0, 2.0), 3.0);
        let player = Vec3::new(2.0, 0.0, 2.0);
        let step = spider.advance(&grid, player, 0.1);
        assert_eq!(step.mode, PursuitMode::Caught);
        assert!(spider.has_caught(player));
    }

    #[test]
    fn large_step_next_to_player_catches() {
        let grid = OccupancyGrid::open(11, 11);
        let player = Vec3::new(3.0, 0.0, 3.0);
        let mut spider = Pursuer::new(Vec3::new(3.02, 0.0, 2.69), 7.0);

        let step = spider.advance(&grid, player, 0.1);
        assert_eq!(step.mode, PursuitMode::Caught);
        assert_eq!(step.position, player);
    }

    #[test]
    fn large_step_from_neighbor_cell_does_not_oscillate() {
        let grid = OccupancyGrid::open(11, 11);
        let player = Vec3::new(3.0, 0.0, 3.0);
        // Fine cell (4, 3), next to the player's, but more than a step away.
        let mut spider = Pursuer::new(Vec3::new(3.9, 0.0, 2.69), 7.0);

        let modes: Vec<_> = (0..4).map(|_| spider.advance(&grid, player, 0.1).mode).collect();
        assert!(modes.contains(&PursuitMode::Caught), "{modes:?}");
        assert!(spider.has_caught(player));
    }

    #[test]
    fn final_approach_does_not_overshoot() {
        let grid = OccupancyGrid::open(6, 6);
        let player = Vec3::new(3.0, 0.0, 3.0);
        let mut spider = Pursuer::new(Vec3::new(2.2, 0.0, 2.6), 7.0);

        let step = spider.advance(&grid, player, 0.1);
        assert_eq!(step.mode, PursuitMode::FinalApproach);
        assert_eq!(step.position.z, 3.0);
        assert!(step.position.x < 3.0);
    }

    #[test]
    fn reset_forgets_route() {
        let grid = OccupancyGrid::open(5, 5);
        let mut spider = Pursuer::new(Vec3::ZERO, 1.0);
        spider.advance(&grid, Vec3::new(4.0, 0.0, 4.0), 0.1);
        assert!(spider.pathfinder().last_path().is_some());

        spider.reset(Vec3::new(2.0, 0.0, 2.0));
        assert!(spider.pathfinder().last_path().is_none());
        assert!(spider.pathfinder().last_destination().is_none());
        assert_eq!(spider.position(), Vec3::new(2.0, 0.0, 2.0));
    }
}
