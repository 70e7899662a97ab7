//! Square grid of cells connected by carved passages.

use serde::{Deserialize, Serialize};

use crate::{CellCoord, Direction, MazeError};

/// Open flags of a single cell, one per cardinal direction.
///
/// `true` means a passage leads to the neighbour in that direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Passages {
    north: bool,
    east: bool,
    south: bool,
    west: bool,
}

impl Passages {
    /// Whether a passage leads out of the cell in `direction`.
    #[must_use]
    pub const fn is_open(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Number of open sides.
    #[must_use]
    pub fn open_count(&self) -> usize {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.is_open(*direction))
            .count()
    }

    fn open(&mut self, direction: Direction) {
        match direction {
            Direction::North => self.north = true,
            Direction::East => self.east = true,
            Direction::South => self.south = true,
            Direction::West => self.west = true,
        }
    }
}

/// Immutable square maze with its entrance at the top-left corner and its
/// exit at the bottom-right corner.
///
/// Values are produced by [`MazeBuilder::finish`]; once built the passage
/// layout never changes. Every passage is bidirectional.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Maze {
    size: u32,
    cells: Vec<Passages>,
}

impl Maze {
    /// Number of cells along each edge.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Cell where every traversal starts.
    #[must_use]
    pub const fn entrance(&self) -> CellCoord {
        CellCoord::new(0, 0)
    }

    /// Cell that completes a traversal when reached.
    #[must_use]
    pub const fn exit(&self) -> CellCoord {
        CellCoord::new(self.size - 1, self.size - 1)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.size && cell.row() < self.size
    }

    /// Open flags of the provided cell, if it lies inside the grid.
    #[must_use]
    pub fn passages(&self, cell: CellCoord) -> Option<Passages> {
        self.index_of(cell)
            .and_then(|offset| self.cells.get(offset).copied())
    }

    /// Dense row-major index of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index_of(&self, cell: CellCoord) -> Option<usize> {
        cell.grid_index(self.size)
    }

    /// Whether a passage leads from `cell` toward `direction`.
    ///
    /// Fails with [`MazeError::OutOfBounds`] when `cell` or the neighbour in
    /// `direction` lies outside the grid.
    pub fn open_towards(&self, cell: CellCoord, direction: Direction) -> Result<bool, MazeError> {
        let out_of_bounds = MazeError::OutOfBounds { cell, direction };
        let passages = self.passages(cell).ok_or(out_of_bounds)?;
        let _ = cell.step(direction, self.size).ok_or(out_of_bounds)?;
        Ok(passages.is_open(direction))
    }

    /// Every in-bounds neighbour of `cell`, regardless of walls.
    pub fn neighbors_of(&self, cell: CellCoord) -> impl Iterator<Item = (CellCoord, Direction)> {
        neighbors(cell, self.size)
    }

    /// Neighbours of `cell` reachable through an open passage.
    pub fn open_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        let passages = self.passages(cell).unwrap_or_default();
        neighbors(cell, self.size)
            .filter(move |(_, direction)| passages.is_open(*direction))
            .map(|(neighbor, _)| neighbor)
    }

    /// Total number of carved passages, counting each connection once.
    #[must_use]
    pub fn passage_count(&self) -> usize {
        self.cells
            .iter()
            .map(|passages| {
                usize::from(passages.is_open(Direction::East))
                    + usize::from(passages.is_open(Direction::South))
            })
            .sum()
    }

    /// Iterator over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        cells(self.size)
    }
}

/// Mutable grid used while carving a maze.
///
/// Starts fully walled. Carving always opens both sides of a wall, so any
/// [`Maze`] obtained from [`MazeBuilder::finish`] keeps passages symmetric.
#[derive(Clone, Debug)]
pub struct MazeBuilder {
    size: u32,
    cells: Vec<Passages>,
}

impl MazeBuilder {
    /// Creates a fully walled `size`×`size` grid.
    pub fn new(size: u32) -> Result<Self, MazeError> {
        if size == 0 {
            return Err(MazeError::InvalidSize { size });
        }

        let count = usize::try_from(u64::from(size) * u64::from(size))
            .map_err(|_| MazeError::InvalidSize { size })?;

        Ok(Self {
            size,
            cells: vec![Passages::default(); count],
        })
    }

    /// Number of cells along each edge.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Dense row-major index of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index_of(&self, cell: CellCoord) -> Option<usize> {
        cell.grid_index(self.size)
    }

    /// Every in-bounds neighbour of `cell`, regardless of walls.
    pub fn neighbors_of(&self, cell: CellCoord) -> impl Iterator<Item = (CellCoord, Direction)> {
        neighbors(cell, self.size)
    }

    /// Removes the wall between `cell` and its neighbour in `direction`.
    ///
    /// Returns the neighbour that is now connected to `cell`.
    pub fn carve(&mut self, cell: CellCoord, direction: Direction) -> Result<CellCoord, MazeError> {
        let out_of_bounds = MazeError::OutOfBounds { cell, direction };
        let from = self.index_of(cell).ok_or(out_of_bounds)?;
        let neighbor = cell.step(direction, self.size).ok_or(out_of_bounds)?;
        let to = self.index_of(neighbor).ok_or(out_of_bounds)?;

        self.cells[from].open(direction);
        self.cells[to].open(direction.opposite());
        Ok(neighbor)
    }

    /// Freezes the carved layout into an immutable [`Maze`].
    #[must_use]
    pub fn finish(self) -> Maze {
        Maze {
            size: self.size,
            cells: self.cells,
        }
    }
}

fn neighbors(cell: CellCoord, size: u32) -> impl Iterator<Item = (CellCoord, Direction)> {
    Direction::ALL
        .into_iter()
        .filter_map(move |direction| cell.step(direction, size).map(|next| (next, direction)))
}

fn cells(size: u32) -> impl Iterator<Item = CellCoord> {
    (0..size).flat_map(move |row| (0..size).map(move |column| CellCoord::new(column, row)))
}
