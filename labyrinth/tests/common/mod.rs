#![allow(dead_code)]

use labyrinth::{GridCoord, MazeGenerator, MazeGrid, Walkable};

/// Carve a seeded maze starting from (1, 1).
pub fn seeded_maze(width: usize, height: usize, seed: u64) -> MazeGrid {
    MazeGenerator::new(Some(seed))
        .generate(width, height, GridCoord::new(1, 1))
        .0
}

/// Exhaustive Dijkstra over the same 8-connected moves the pathfinder uses.
///
/// Quadratic in the cell count; only meant for small grids.
pub fn brute_force_cost<W: Walkable>(grid: &W, source: GridCoord, destination: GridCoord) -> Option<f64> {
    let width = grid.width();
    let count = width * grid.height();
    let index = |c: GridCoord| c.y as usize * width + c.x as usize;
    let coord = |i: usize| GridCoord::new((i % width) as i32, (i / width) as i32);

    let mut dist = vec![f64::INFINITY; count];
    let mut done = vec![false; count];
    dist[index(source)] = 0.0;

    loop {
        let current = (0..count)
            .filter(|&i| !done[i] && dist[i].is_finite())
            .min_by(|&a, &b| dist[a].total_cmp(&dist[b]))?;
        if current == index(destination) {
            return Some(dist[current]);
        }
        done[current] = true;

        let here = coord(current);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let next = here.offset(dx, dy);
                if !grid.in_bounds(&next) || !grid.is_walkable(&next) {
                    continue;
                }
                let cost = dist[current] + here.distance(&next);
                let slot = index(next);
                if cost < dist[slot] {
                    dist[slot] = cost;
                }
            }
        }
    }
}
