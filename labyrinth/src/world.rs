use std::collections::BTreeMap;

use log::{info, trace};

use crate::collision::{check_collision, Direction, Heading};
use crate::compiler::{compile, Placement};
use crate::config::MazeConfig;
use crate::error::ConfigError;
use crate::grid::GridCoord;
use crate::math::Vec3;
use crate::maze::{CarveStats, MazeGenerator, MazeGrid};
use crate::occupancy::OccupancyGrid;
use crate::pursuit::{Pursuer, PursuitStep};

/// Unique identifier for a pursuer in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PursuerId(u32);

impl PursuerId {
    /// Get the underlying integer ID (useful for debugging or serialization).
    pub fn to_u32(self) -> u32 {
        self.0
    }
}

/// Everything derived from one carved maze. Built off to the side and swapped
/// in whole, so readers never see a half-regenerated maze.
struct Layout {
    maze: MazeGrid,
    occupancy: OccupancyGrid,
    placements: Vec<Placement>,
    stats: CarveStats,
}

impl Layout {
    fn generate(generator: &mut MazeGenerator, config: &MazeConfig) -> Self {
        let (maze, stats) = generator.generate(config.width, config.height, config.start_cell());
        let occupancy = OccupancyGrid::build(&maze);
        let placements = compile(&maze);
        Self {
            maze,
            occupancy,
            placements,
            stats,
        }
    }
}

struct PursuerSlot {
    spawn: Vec3,
    pursuer: Pursuer,
}

/// What happened during one call to [`MazeWorld::tick`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Movement of every pursuer, in id order.
    pub steps: Vec<(PursuerId, PursuitStep)>,
    /// True when any pursuer ended the frame within its catch radius.
    pub caught: bool,
}

/// The maze, its derived grids and the pursuers chasing the player.
///
/// A world owns everything a frame needs:
/// - the logical maze and the fine occupancy grid built from it
/// - the compiled floor and wall placements used for drawing and collision
/// - every pursuer, each with its own path memory
pub struct MazeWorld {
    config: MazeConfig,
    generator: MazeGenerator,
    layout: Layout,
    generation: u64,
    next_id: u32,
    pursuers: BTreeMap<PursuerId, PursuerSlot>,
}

impl MazeWorld {
    /// Validate `config`, carve the first maze and spawn the configured pursuers.
    pub fn new(config: MazeConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut generator = MazeGenerator::new(config.seed);
        let layout = Layout::generate(&mut generator, &config);
        info!(
            "created {}x{} maze (seed {}, {} passages)",
            config.width,
            config.height,
            generator.seed(),
            layout.maze.passage_count()
        );

        let mut world = Self {
            config,
            generator,
            layout,
            generation: 0,
            next_id: 1,
            pursuers: BTreeMap::new(),
        };
        for cell in world.config.spawn_cells() {
            let position = world.cell_position(cell);
            world.spawn_pursuer(position);
        }
        Ok(world)
    }

    /// Carve a new maze and send every pursuer back to its spawn.
    ///
    /// The new logical grid, fine grid and placements replace the old ones
    /// together, after all of them are built.
    pub fn regenerate(&mut self) {
        let layout = Layout::generate(&mut self.generator, &self.config);
        self.layout = layout;
        for slot in self.pursuers.values_mut() {
            slot.pursuer.reset(slot.spawn);
        }
        self.generation += 1;
        info!(
            "regenerated maze (generation {}, {} passages)",
            self.generation,
            self.layout.maze.passage_count()
        );
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    pub fn maze(&self) -> &MazeGrid {
        &self.layout.maze
    }

    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.layout.occupancy
    }

    pub fn placements(&self) -> &[Placement] {
        &self.layout.placements
    }

    /// Number of regenerations since the world was created.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn carve_stats(&self) -> CarveStats {
        self.layout.stats
    }

    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    pub fn goal_cell(&self) -> GridCoord {
        self.config.goal_cell()
    }

    pub fn goal_position(&self) -> Vec3 {
        self.cell_position(self.goal_cell())
    }

    /// Where the player starts: the centre of the carve start cell.
    pub fn player_start(&self) -> Vec3 {
        self.cell_position(self.config.start_cell())
    }

    /// True when `player` stands in the goal's logical cell.
    pub fn reached_goal(&self, player: Vec3) -> bool {
        OccupancyGrid::world_to_logical(player) == self.goal_cell()
    }

    /// True when the fine cell under `position` is free.
    pub fn is_walkable(&self, position: Vec3) -> bool {
        self.layout
            .occupancy
            .is_free(OccupancyGrid::world_to_fine(position))
    }

    /// True when nothing blocks a move from `position` in `direction`.
    pub fn can_move(&self, position: Vec3, heading: &Heading, direction: Direction) -> bool {
        !check_collision(
            &self.layout.placements,
            position,
            heading,
            direction,
            direction.probe_distance(),
        )
    }

    /// Add a pursuer at `position`. Regeneration returns it there.
    pub fn spawn_pursuer(&mut self, position: Vec3) -> PursuerId {
        let id = PursuerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        let pursuer = Pursuer::new(position, self.config.pursuer_speed)
            .with_catch_radius(self.config.catch_radius);
        self.pursuers.insert(
            id,
            PursuerSlot {
                spawn: position,
                pursuer,
            },
        );
        id
    }

    /// Remove a pursuer. Returns false when `id` is unknown.
    pub fn despawn_pursuer(&mut self, id: PursuerId) -> bool {
        self.pursuers.remove(&id).is_some()
    }

    pub fn pursuer(&self, id: PursuerId) -> Option<&Pursuer> {
        self.pursuers.get(&id).map(|slot| &slot.pursuer)
    }

    /// All pursuers in id order.
    pub fn pursuers(&self) -> impl Iterator<Item = (PursuerId, &Pursuer)> + '_ {
        self.pursuers.iter().map(|(&id, slot)| (id, &slot.pursuer))
    }

    /// Advance every pursuer one frame toward `player`.
    pub fn tick(&mut self, player: Vec3, dt: f32) -> FrameReport {
        let mut report = FrameReport::default();
        for (&id, slot) in self.pursuers.iter_mut() {
            let step = slot.pursuer.advance(&self.layout.occupancy, player, dt);
            trace!("pursuer {} {:?} at {:?}", id.to_u32(), step.mode, step.position);
            report.caught |= slot.pursuer.has_caught(player);
            report.steps.push((id, step));
        }
        report
    }

    fn cell_position(&self, cell: GridCoord) -> Vec3 {
        OccupancyGrid::logical_to_world(cell, self.config.floor_level)
    }
}
