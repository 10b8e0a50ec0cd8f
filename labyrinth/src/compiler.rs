//! Turns the logical maze into floor and wall placements for a renderer.
//!
//! Every passage gets a 3×3 floor of unit tiles one unit below the agents.
//! Each side that faces a non-passage neighbour gets a wall three panels wide
//! and two panels high, standing on the edge of the cell's block.

use glam::{Mat4, Quat};

use crate::collision::Aabb;
use crate::grid::GridCoord;
use crate::math::Vec3;
use crate::maze::{Cardinal, MazeGrid};
use crate::occupancy::SCALE;

/// World Y of floor tiles.
pub const FLOOR_Y: f32 = -1.0;
/// World Y of the wall panel rows.
pub const WALL_ROWS: [f32; 2] = [0.0, 1.0];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlacementKind {
    Floor,
    Wall,
}

/// One unit quad to draw, positioned and rotated in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    /// Rotation about `axis`, in degrees.
    pub rotation_deg: f32,
    pub axis: Vec3,
    pub size: Vec3,
    pub kind: PlacementKind,
}

impl Placement {
    /// A floor tile lying flat (quad rotated 90° about X).
    pub fn floor(position: Vec3) -> Self {
        Self {
            position,
            rotation_deg: 90.0,
            axis: Vec3::X,
            size: Vec3::ONE,
            kind: PlacementKind::Floor,
        }
    }

    pub fn wall(position: Vec3, rotation_deg: f32, axis: Vec3) -> Self {
        Self {
            position,
            rotation_deg,
            axis,
            size: Vec3::ONE,
            kind: PlacementKind::Wall,
        }
    }

    /// Model matrix: translate, then rotate about `axis`.
    pub fn model_matrix(&self) -> Mat4 {
        let translation = Mat4::from_translation(self.position.to_glam());
        let axis = self.axis.to_glam();
        if axis.length_squared() == 0.0 {
            return translation;
        }
        let rotation = Mat4::from_quat(Quat::from_axis_angle(axis.normalize(), self.rotation_deg.to_radians()));
        translation * rotation
    }

    /// Collision box: `size` centred on `position`.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.size)
    }
}

/// Rotation and axis of the wall closing off `side` of a cell.
fn wall_orientation(side: Cardinal) -> (f32, Vec3) {
    match side {
        Cardinal::South => (0.0, Vec3::Z),
        Cardinal::North => (180.0, Vec3::Y),
        Cardinal::East => (90.0, Vec3::Y),
        Cardinal::West => (270.0, Vec3::Y),
    }
}

fn push_walls(placements: &mut Vec<Placement>, center: Vec3, side: Cardinal) {
    let (dx, dz) = side.delta();
    let (rotation, axis) = wall_orientation(side);
    let edge = center + Vec3::new((dx * 2) as f32, 0.0, (dz * 2) as f32);
    for y in WALL_ROWS {
        for along in [0.0, 1.0, -1.0] {
            // Spread the panels across the side, perpendicular to its normal.
            let offset = if dx == 0 {
                Vec3::new(along, 0.0, 0.0)
            } else {
                Vec3::new(0.0, 0.0, along)
            };
            placements.push(Placement::wall((edge + offset).with_y(y), rotation, axis));
        }
    }
}

/// Placements for every passage of `maze`. Out-of-bounds neighbours count as walls.
pub fn compile(maze: &MazeGrid) -> Vec<Placement> {
    let mut placements = Vec::new();

    for cell in maze.passages() {
        let center = Vec3::new((cell.x * SCALE) as f32, 0.0, (cell.y * SCALE) as f32);

        for dz in -1..=1 {
            for dx in -1..=1 {
                let tile = center + Vec3::new(dx as f32, 0.0, dz as f32);
                placements.push(Placement::floor(tile.with_y(FLOOR_Y)));
            }
        }

        for side in Cardinal::ALL {
            let (dx, dy) = side.delta();
            if !maze.is_passage(GridCoord::new(cell.x + dx, cell.y + dy)) {
                push_walls(&mut placements, center, side);
            }
        }
    }

    placements
}
