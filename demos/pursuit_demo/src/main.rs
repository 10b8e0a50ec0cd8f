use anyhow::{Context, Result};
use labyrinth::{MazeConfig, MazeWorld, Pursuer, PursuitMode, Vec3};
use log::{info, warn};
use tracing_subscriber::EnvFilter;

const DT: f32 = 1.0 / 60.0;
const MAX_FRAMES: u32 = 60 * 300;
const ROUNDS: u32 = 3;
const RUNNER_SPEED: f32 = 2.5;

/// Scripted player: walks the same fine grid the pursuers search, heading
/// for the goal instead of another agent.
struct Runner {
    agent: Pursuer,
}

impl Runner {
    fn new(world: &MazeWorld) -> Self {
        Self {
            agent: Pursuer::new(world.player_start(), RUNNER_SPEED).with_catch_radius(0.0),
        }
    }

    fn restart(&mut self, world: &MazeWorld) {
        self.agent.reset(world.player_start());
    }

    fn step(&mut self, world: &MazeWorld) -> Vec3 {
        self.agent.advance(world.occupancy(), world.goal_position(), DT).position
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match std::env::args().nth(1) {
        Some(path) => MazeConfig::load(&path).with_context(|| format!("loading config {path}"))?,
        None => MazeConfig::default(),
    };
    let mut world = MazeWorld::new(config).context("building maze world")?;
    println!("{}", world.maze());

    let mut runner = Runner::new(&world);
    let mut escapes = 0;
    let mut catches = 0;

    for frame in 0..MAX_FRAMES {
        let player = runner.step(&world);

        if world.reached_goal(player) {
            escapes += 1;
            info!("frame {frame}: reached the goal ({escapes}/{ROUNDS})");
            if escapes + catches >= ROUNDS {
                break;
            }
            world.regenerate();
            runner.restart(&world);
            println!("{}", world.maze());
            continue;
        }

        let report = world.tick(player, DT);
        for (id, step) in &report.steps {
            if step.mode == PursuitMode::Direct {
                warn!("frame {frame}: pursuer {} has no route, moving directly", id.to_u32());
            }
        }
        if report.caught {
            catches += 1;
            info!("frame {frame}: caught at {:?}", player);
            if escapes + catches >= ROUNDS {
                break;
            }
            world.regenerate();
            runner.restart(&world);
        }
    }

    info!(
        "done after {} regenerations: {escapes} escapes, {catches} catches",
        world.generation()
    );
    Ok(())
}
