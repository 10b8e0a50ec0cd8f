use labyrinth::{GridCoord, MazeConfig, MazeWorld, Vec3};

#[test]
fn worlds_with_the_same_seed_match() {
    let config = MazeConfig::default().with_seed(99);
    let mut a = MazeWorld::new(config.clone()).unwrap();
    let mut b = MazeWorld::new(config).unwrap();
    assert_eq!(a.maze(), b.maze());
    assert_eq!(a.placements(), b.placements());

    a.regenerate();
    b.regenerate();
    assert_eq!(a.maze(), b.maze());
    assert_eq!(a.generation(), 1);
}

#[test]
fn regeneration_swaps_every_layer() {
    let mut world = MazeWorld::new(MazeConfig::default().with_seed(12)).unwrap();
    let before = world.maze().clone();
    world.regenerate();

    assert_ne!(world.maze(), &before);
    let fine = world.occupancy();
    for cell in world.maze().passages() {
        assert!(fine.is_free(GridCoord::new(cell.x * 3, cell.y * 3)));
    }
    assert!(world.is_walkable(world.player_start()));
    assert!(world.is_walkable(world.goal_position()));
}

#[test]
fn extra_spawns_from_config() {
    let config = MazeConfig::default()
        .with_seed(3)
        .with_pursuer_spawns(vec![[1, 13], [29, 1]]);
    let world = MazeWorld::new(config).unwrap();
    let positions: Vec<_> = world.pursuers().map(|(_, p)| p.position()).collect();
    assert_eq!(positions, vec![Vec3::new(3.0, 0.0, 39.0), Vec3::new(87.0, 0.0, 3.0)]);
}

#[test]
fn agents_move_at_the_floor_level() {
    let config = MazeConfig::default().with_seed(8).with_floor_level(0.5);
    let mut world = MazeWorld::new(config).unwrap();
    assert_eq!(world.player_start().y, 0.5);
    assert_eq!(world.goal_position().y, 0.5);

    let report = world.tick(world.player_start(), 0.1);
    assert!(report.steps.iter().all(|(_, step)| step.position.y == 0.5));
    assert!(world.is_walkable(world.player_start()));
}

#[test]
fn config_file_round_trip() {
    let dir = std::env::temp_dir().join(format!("labyrinth-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("maze.json");
    std::fs::write(&path, r#"{ "width": 21, "height": 11, "seed": 5, "pursuer_speed": 2.5 }"#).unwrap();

    let config = MazeConfig::load(&path).unwrap();
    assert_eq!(config.pursuer_speed, 2.5);
    let world = MazeWorld::new(config).unwrap();
    assert_eq!(world.maze().width(), 21);

    let missing = MazeConfig::load(dir.join("missing.json")).unwrap_err();
    assert!(missing.to_string().contains("failed to read"));
    std::fs::remove_dir_all(&dir).unwrap();
}
