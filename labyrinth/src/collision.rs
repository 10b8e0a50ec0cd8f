//! Probe-point collision against compiled maze placements.
//!
//! Before the player moves in a direction, a point a short distance ahead in
//! that direction is tested against every placement's box.

use crate::compiler::Placement;
use crate::math::Vec3;

/// Probe distance for horizontal moves.
pub const HORIZONTAL_PROBE: f32 = 0.25;
/// Probe distance for vertical moves.
pub const VERTICAL_PROBE: f32 = 1.0;

/// Movement direction relative to the viewer's heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Front,
    Back,
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// How far ahead to probe before moving this way.
    pub fn probe_distance(self) -> f32 {
        match self {
            Direction::Up | Direction::Down => VERTICAL_PROBE,
            _ => HORIZONTAL_PROBE,
        }
    }
}

/// Orthonormal basis describing where the viewer is facing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heading {
    pub front: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Heading {
    /// Level heading for a yaw angle in degrees (0° faces +X, -90° faces -Z).
    pub fn from_yaw(yaw_degrees: f32) -> Self {
        let yaw = yaw_degrees.to_radians();
        let front = glam::Vec3::new(yaw.cos(), 0.0, yaw.sin()).normalize();
        let right = front.cross(glam::Vec3::Y).normalize();
        let up = right.cross(front).normalize();
        Self {
            front: front.into(),
            right: right.into(),
            up: up.into(),
        }
    }

    /// Unit vector for `direction` in this heading.
    pub fn axis(&self, direction: Direction) -> Vec3 {
        match direction {
            Direction::Front => self.front,
            Direction::Back => -self.front,
            Direction::Right => self.right,
            Direction::Left => -self.right,
            Direction::Up => self.up,
            Direction::Down => -self.up,
        }
    }
}

impl Default for Heading {
    fn default() -> Self {
        Self::from_yaw(-90.0)
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// True when `point` is strictly inside the box. Touching a face does not count.
    pub fn contains(&self, point: Vec3) -> bool {
        point.x > self.min.x
            && point.x < self.max.x
            && point.y > self.min.y
            && point.y < self.max.y
            && point.z > self.min.z
            && point.z < self.max.z
    }
}

/// Point `distance` away from `position` in `direction`.
pub fn probe_point(position: Vec3, heading: &Heading, direction: Direction, distance: f32) -> Vec3 {
    position + heading.axis(direction) * distance
}

/// True when the probe point in `direction` hits any placement.
pub fn check_collision(
    placements: &[Placement],
    position: Vec3,
    heading: &Heading,
    direction: Direction,
    distance: f32,
) -> bool {
    let probe = probe_point(position, heading, direction, distance);
    placements.iter().any(|placement| placement.aabb().contains(probe))
}
