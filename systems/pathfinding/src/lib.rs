#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first path solving over a maze's passage graph.
//!
//! Only open passages count as edges. In a perfect maze the passage graph is a
//! tree, so the shortest path between two cells is also the only simple path.

use std::collections::VecDeque;

use labyrinth_core::{CellCoord, Direction, Maze};

const UNREACHABLE: u32 = u32::MAX;

/// Ordered sequence of cells where each consecutive pair shares an open passage.
///
/// An empty path means the end cell could not be reached.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Cells visited by the path, start and end included.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Reports whether the path holds no cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves needed to walk the path.
    #[must_use]
    pub fn moves(&self) -> u32 {
        u32::try_from(self.cells.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    /// First cell of the path.
    #[must_use]
    pub fn start(&self) -> Option<CellCoord> {
        self.cells.first().copied()
    }

    /// Last cell of the path.
    #[must_use]
    pub fn end(&self) -> Option<CellCoord> {
        self.cells.last().copied()
    }

    /// Reports whether the path passes through `cell`.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Directions to press, in order, to walk the path from its start.
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.cells
            .windows(2)
            .filter_map(|pair| Direction::between(pair[0], pair[1]))
    }
}

/// Dense distance grid seeded from a single source cell.
///
/// Distances are measured in moves through open passages. Cells that cannot
/// be reached keep a sentinel so callers can tell them apart from reachable
/// ones.
#[derive(Clone, Debug, Default)]
pub struct DistanceField {
    size: u32,
    distances: Vec<u32>,
}

impl DistanceField {
    /// Builds the distance field of `maze` rooted at `source`.
    #[must_use]
    pub fn from_source(maze: &Maze, source: CellCoord) -> Self {
        let mut field = Self::default();
        field.rebuild(maze, source);
        field
    }

    /// Recomputes distances in place using a breadth-first search.
    pub fn rebuild(&mut self, maze: &Maze, source: CellCoord) {
        let size = maze.size();
        let width = usize::try_from(size).unwrap_or(0);
        let cell_count = width.checked_mul(width).unwrap_or(0);

        self.size = size;
        if self.distances.len() != cell_count {
            self.distances = vec![UNREACHABLE; cell_count];
        } else {
            self.distances.fill(UNREACHABLE);
        }

        let Some(source_index) = maze.index_of(source) else {
            return;
        };
        self.distances[source_index] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(source);

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = maze.index_of(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for neighbor in maze.open_neighbors(cell) {
                let Some(neighbor_index) = maze.index_of(neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] != UNREACHABLE {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Distance from the source to `cell`, or `None` if it is unreachable.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        cell.grid_index(self.size)
            .and_then(|offset| self.distances.get(offset).copied())
            .filter(|distance| *distance != UNREACHABLE)
    }

    /// Number of cells reachable from the source, the source included.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.distances
            .iter()
            .filter(|distance| **distance != UNREACHABLE)
            .count()
    }
}

/// Shortest path from `start` to `end` through open passages.
///
/// Returns an empty [`Path`] when either cell lies outside the maze or `end`
/// cannot be reached from `start`.
#[must_use]
pub fn shortest_path(maze: &Maze, start: CellCoord, end: CellCoord) -> Path {
    let size = maze.size();
    let (Some(start_index), Some(_)) = (maze.index_of(start), maze.index_of(end)) else {
        return Path::default();
    };

    let width = usize::try_from(size).unwrap_or(0);
    let mut previous: Vec<Option<CellCoord>> = vec![None; width * width];
    let mut visited = vec![false; width * width];
    visited[start_index] = true;

    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        if cell == end {
            return trace_back(maze, end, &previous);
        }

        for neighbor in maze.open_neighbors(cell) {
            let Some(neighbor_index) = maze.index_of(neighbor) else {
                continue;
            };

            if visited[neighbor_index] {
                continue;
            }

            visited[neighbor_index] = true;
            previous[neighbor_index] = Some(cell);
            queue.push_back(neighbor);
        }
    }

    Path::default()
}

/// Number of moves on the shortest path from `start` to `end`.
///
/// Agrees with [`shortest_path`]`(..).moves()` whenever a path exists and
/// returns `None` exactly when that path is empty.
#[must_use]
pub fn shortest_path_length(maze: &Maze, start: CellCoord, end: CellCoord) -> Option<u32> {
    if !maze.contains(end) {
        return None;
    }
    DistanceField::from_source(maze, start).distance(end)
}

fn trace_back(maze: &Maze, end: CellCoord, previous: &[Option<CellCoord>]) -> Path {
    let mut cells = vec![end];
    let mut current = end;

    while let Some(before) = maze.index_of(current).and_then(|offset| previous[offset]) {
        cells.push(before);
        current = before;
    }

    cells.reverse();
    Path { cells }
}
