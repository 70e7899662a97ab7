//! Live player position and history for a single traversal.

use std::time::Duration;

use labyrinth_core::{CellCoord, Direction, Maze};

/// Records the walk a player takes through a maze.
///
/// The tracker starts on the maze entrance. Only moves through open passages
/// are accepted; rejected moves leave every field untouched. Elapsed time is
/// accumulated from explicit [`Traversal::advance`] calls and is frozen while
/// paused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Traversal {
    current: CellCoord,
    exit: CellCoord,
    path: Vec<CellCoord>,
    moves: u32,
    elapsed: Duration,
    paused: bool,
}

impl Traversal {
    /// Places a fresh tracker on the entrance of `maze`.
    #[must_use]
    pub fn new(maze: &Maze) -> Self {
        Self {
            current: maze.entrance(),
            exit: maze.exit(),
            path: vec![maze.entrance()],
            moves: 0,
            elapsed: Duration::ZERO,
            paused: false,
        }
    }

    /// Moves one cell in `direction` if a passage leads that way.
    ///
    /// Returns whether the move was accepted.
    pub fn attempt_move(&mut self, maze: &Maze, direction: Direction) -> bool {
        if !matches!(maze.open_towards(self.current, direction), Ok(true)) {
            return false;
        }

        let Some(next) = self.current.step(direction, maze.size()) else {
            return false;
        };

        self.current = next;
        self.path.push(next);
        self.moves = self.moves.saturating_add(1);
        true
    }

    /// Reports whether the player stands on the exit.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current == self.exit
    }

    /// Cell the player currently occupies.
    #[must_use]
    pub fn current(&self) -> CellCoord {
        self.current
    }

    /// Every cell the player stood on, in order, repeats included.
    #[must_use]
    pub fn path(&self) -> &[CellCoord] {
        &self.path
    }

    /// Number of accepted moves.
    #[must_use]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Accumulates `dt` into the elapsed time unless paused.
    pub fn advance(&mut self, dt: Duration) {
        if !self.paused {
            self.elapsed = self.elapsed.saturating_add(dt);
        }
    }

    /// Time spent walking, paused intervals excluded.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Whole seconds spent walking, paused intervals excluded.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed.as_secs()
    }

    /// Freezes time accumulation.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes time accumulation.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Reports whether time accumulation is frozen.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
