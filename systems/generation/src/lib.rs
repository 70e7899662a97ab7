#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized depth-first maze carving.
//!
//! The generator walks the grid with an explicit backtracking stack, carving a
//! passage into a random unvisited neighbour whenever one exists and stepping
//! back otherwise. Every cell is visited exactly once, so the carved passages
//! always form a spanning tree: the resulting maze is perfect.

use labyrinth_core::{CellCoord, Maze, MazeBuilder, MazeError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform "pick one of N" provider injected into maze generation.
pub trait RandomSource {
    /// Returns an index in `0..len`. Callers never pass `len == 0`.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Seeded maze factory used by adapters to start new sessions.
#[derive(Clone, Debug)]
pub struct Generator {
    rng: ChaCha8Rng,
}

impl Generator {
    /// Creates a generator whose mazes are reproducible from `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a generator seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Carves the next maze of the requested size.
    pub fn generate(&mut self, size: u32) -> Result<Maze, MazeError> {
        generate(size, &mut self.rng)
    }
}

/// Carves a perfect `size`×`size` maze using the recursive backtracker.
///
/// Carving starts from a uniformly random cell rather than the entrance; the
/// entrance and exit stay fixed regardless. Fails with
/// [`MazeError::InvalidSize`] when `size` is zero.
pub fn generate<R>(size: u32, rng: &mut R) -> Result<Maze, MazeError>
where
    R: RandomSource + ?Sized,
{
    let mut builder = MazeBuilder::new(size)?;
    let total = builder.cell_count();
    let mut visited = vec![false; total];

    let start = cell_at(rng.pick(total), size);
    let Some(start_index) = builder.index_of(start) else {
        return Err(MazeError::InvalidSize { size });
    };
    visited[start_index] = true;
    let mut visited_count = 1;

    let mut stack = vec![start];
    let mut current = start;
    let mut candidates = Vec::with_capacity(4);

    while visited_count < total {
        candidates.clear();
        candidates.extend(builder.neighbors_of(current).filter(|(neighbor, _)| {
            builder
                .index_of(*neighbor)
                .map_or(false, |index| !visited[index])
        }));

        if candidates.is_empty() {
            let _ = stack.pop();
            match stack.last() {
                Some(previous) => current = *previous,
                None => break,
            }
            continue;
        }

        let (next, direction) = candidates[rng.pick(candidates.len())];
        let _ = builder.carve(current, direction)?;
        if let Some(index) = builder.index_of(next) {
            visited[index] = true;
        }
        visited_count += 1;
        stack.push(next);
        current = next;
    }

    log::debug!("carved {size}x{size} maze starting from {start}");

    Ok(builder.finish())
}

fn cell_at(index: usize, size: u32) -> CellCoord {
    let width = usize::try_from(size).unwrap_or(usize::MAX);
    let column = u32::try_from(index % width).unwrap_or(0);
    let row = u32::try_from(index / width).unwrap_or(0);
    CellCoord::new(column, row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_core::Direction;

    /// Always picks the first candidate.
    struct FirstChoice;

    impl RandomSource for FirstChoice {
        fn pick(&mut self, _len: usize) -> usize {
            0
        }
    }

    #[test]
    fn first_choice_carves_serpentine_from_origin() {
        let maze = generate(2, &mut FirstChoice).expect("valid size");

        // Start (0,0); first candidate is East, then South, then West.
        assert_eq!(maze.open_towards(CellCoord::new(0, 0), Direction::East), Ok(true));
        assert_eq!(maze.open_towards(CellCoord::new(1, 0), Direction::South), Ok(true));
        assert_eq!(maze.open_towards(CellCoord::new(1, 1), Direction::West), Ok(true));
        assert_eq!(maze.open_towards(CellCoord::new(0, 0), Direction::South), Ok(false));
        assert_eq!(maze.passage_count(), 3);
    }

    #[test]
    fn cell_at_maps_row_major() {
        assert_eq!(cell_at(0, 4), CellCoord::new(0, 0));
        assert_eq!(cell_at(5, 4), CellCoord::new(1, 1));
        assert_eq!(cell_at(15, 4), CellCoord::new(3, 3));
    }

    #[test]
    fn zero_size_is_rejected() {
        assert_eq!(
            generate(0, &mut FirstChoice),
            Err(MazeError::InvalidSize { size: 0 })
        );
    }

    #[test]
    fn seeded_generators_agree() {
        let mut first = Generator::from_seed(7);
        let mut second = Generator::from_seed(7);

        assert_eq!(first.generate(9), second.generate(9));
    }
}
