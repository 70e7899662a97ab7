use labyrinth_core::{CellCoord, Maze};
use labyrinth_system_generation::generate;
use labyrinth_system_pathfinding::{shortest_path, shortest_path_length, DistanceField};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn seeded_maze(size: u32, seed: u64) -> Maze {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate(size, &mut rng).expect("valid size")
}

/// Enumerates every simple path from `from` to `to`, returning each length in moves.
fn enumerate_simple_paths(maze: &Maze, from: CellCoord, to: CellCoord) -> Vec<u32> {
    fn walk(
        maze: &Maze,
        cell: CellCoord,
        to: CellCoord,
        trail: &mut Vec<CellCoord>,
        found: &mut Vec<u32>,
    ) {
        if cell == to {
            found.push(trail.len() as u32 - 1);
            return;
        }

        let neighbors: Vec<_> = maze.open_neighbors(cell).collect();
        for neighbor in neighbors {
            if trail.contains(&neighbor) {
                continue;
            }
            trail.push(neighbor);
            walk(maze, neighbor, to, trail, found);
            let _ = trail.pop();
        }
    }

    let mut found = Vec::new();
    let mut trail = vec![from];
    walk(maze, from, to, &mut trail, &mut found);
    found
}

#[test]
fn path_and_length_agree_for_every_pair() {
    for seed in 0..4 {
        let maze = seeded_maze(4, seed);
        for start in maze.cells() {
            for end in maze.cells() {
                let path = shortest_path(&maze, start, end);
                assert_eq!(
                    Some(path.moves()),
                    shortest_path_length(&maze, start, end),
                    "seed {seed}: disagreement between {start} and {end}"
                );
                assert_eq!(path.start(), Some(start));
                assert_eq!(path.end(), Some(end));
            }
        }
    }
}

#[test]
fn bfs_matches_brute_force_minimum_and_path_is_unique() {
    for seed in 10..13 {
        let maze = seeded_maze(4, seed);
        for start in maze.cells() {
            for end in maze.cells() {
                let lengths = enumerate_simple_paths(&maze, start, end);
                assert_eq!(
                    lengths.len(),
                    1,
                    "seed {seed}: a perfect maze has exactly one simple path {start} -> {end}"
                );
                let minimum = lengths.iter().copied().min().expect("one path");
                assert_eq!(shortest_path_length(&maze, start, end), Some(minimum));
            }
        }
    }
}

#[test]
fn consecutive_path_cells_share_open_passages() {
    let maze = seeded_maze(12, 99);
    let path = shortest_path(&maze, maze.entrance(), maze.exit());

    assert!(!path.is_empty());
    for pair in path.cells().windows(2) {
        assert!(
            maze.open_neighbors(pair[0]).any(|neighbor| neighbor == pair[1]),
            "{} and {} are not connected",
            pair[0],
            pair[1]
        );
    }
    assert_eq!(path.directions().count() as u32, path.moves());
}

#[test]
fn distance_field_reaches_every_cell_of_a_perfect_maze() {
    let maze = seeded_maze(9, 5);
    let field = DistanceField::from_source(&maze, maze.exit());

    assert_eq!(field.reachable_count(), 81);
    assert_eq!(field.distance(maze.exit()), Some(0));
    assert_eq!(
        field.distance(maze.entrance()),
        shortest_path_length(&maze, maze.entrance(), maze.exit())
    );
}

#[test]
fn two_by_two_optimal_length_is_two_or_three() {
    for seed in 0..16 {
        let maze = seeded_maze(2, seed);
        let length = shortest_path_length(&maze, maze.entrance(), maze.exit())
            .expect("perfect maze connects entrance and exit");
        assert!((2..=3).contains(&length), "seed {seed} produced {length}");
    }
}
