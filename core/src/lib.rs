#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Labyrinth engine.
//!
//! This crate defines the grid model and the message surface that connects
//! adapters, the authoritative session world, and pure systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod grid;

pub use grid::{Maze, MazeBuilder, Passages};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Labyrinth. Find your way to the exit.";

/// Maze edge length used when nothing else is configured.
pub const DEFAULT_MAZE_SIZE: u32 = 12;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Discards any running session and starts a new one on the provided maze.
    StartSession {
        /// Freshly generated maze the new session is played on.
        maze: Maze,
    },
    /// Advances the session clock by the provided delta time.
    Tick {
        /// Duration of wall-clock time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player advance a single cell in the specified direction.
    MovePlayer {
        /// Direction of travel for the attempted move.
        direction: Direction,
    },
    /// Toggles the paused substate of a session in progress.
    SetPaused {
        /// Whether time accumulation should be frozen.
        paused: bool,
    },
    /// Submits the player's answer to the comprehension question.
    AnswerQuiz {
        /// Search strategy the player claims guarantees the shortest path.
        strategy: SearchStrategy,
    },
    /// Stores the final score computed for a completed session.
    RecordScore {
        /// Session the score belongs to.
        session: SessionId,
        /// Score record derived from the traversal and the quiz answer.
        report: ScoreReport,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a new session replaced any previous one.
    SessionStarted {
        /// Identifier allocated to the new session.
        session: SessionId,
        /// Edge length of the session's maze.
        size: u32,
        /// Number of moves on the shortest entrance-to-exit path.
        optimal_moves: u32,
    },
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after the move.
        to: CellCoord,
        /// Number of accepted moves including this one.
        moves: u32,
    },
    /// Reports that a move request was not applied.
    MoveRejected {
        /// Cell the player occupied when the move was attempted.
        at: CellCoord,
        /// Direction of the rejected move.
        direction: Direction,
        /// Specific reason the move failed.
        reason: MoveRejection,
    },
    /// Announces that the session entered or left the paused substate.
    PauseChanged {
        /// Whether the session is now paused.
        paused: bool,
    },
    /// Announces that the player reached the exit for the first time.
    MazeCompleted {
        /// Session that was completed.
        session: SessionId,
        /// Edge length of the completed maze.
        size: u32,
        /// Number of accepted moves the player made.
        moves: u32,
        /// Number of moves on the shortest entrance-to-exit path.
        optimal_moves: u32,
        /// Whole seconds the traversal took, excluding paused intervals.
        elapsed_seconds: u64,
    },
    /// Confirms that the comprehension question was answered.
    QuizAnswered {
        /// Session the answer belongs to.
        session: SessionId,
        /// Strategy chosen by the player.
        strategy: SearchStrategy,
        /// Whether the chosen strategy is the correct answer.
        correct: bool,
    },
    /// Reports that a quiz answer arrived outside the completed phase.
    QuizRejected {
        /// Phase the session was in when the answer arrived.
        phase: SessionPhase,
    },
    /// Confirms that the final score of a session was stored.
    ScoreRecorded {
        /// Session the score belongs to.
        session: SessionId,
        /// Stored score record.
        report: ScoreReport,
    },
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices ("up").
    North,
    /// Movement toward increasing column indices ("right").
    East,
    /// Movement toward increasing row indices ("down").
    South,
    /// Movement toward decreasing column indices ("left").
    West,
}

impl Direction {
    /// Every direction in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Direction of a single step from `from` to `to`, if the cells are adjacent.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());

        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Self::East)
            } else {
                Some(Self::West)
            }
        } else if to.row() > from.row() {
            Some(Self::South)
        } else {
            Some(Self::North)
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Dense row-major offset of the cell inside a `size`×`size` grid.
    #[must_use]
    pub fn grid_index(self, size: u32) -> Option<usize> {
        if self.column >= size || self.row >= size {
            return None;
        }

        let width = usize::try_from(size).ok()?;
        let column = usize::try_from(self.column).ok()?;
        let row = usize::try_from(self.row).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Neighbouring cell in `direction`, provided it stays inside a `size`×`size` grid.
    #[must_use]
    pub fn step(self, direction: Direction, size: u32) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::North => (Some(self.column), self.row.checked_sub(1)),
            Direction::East => (self.column.checked_add(1), Some(self.row)),
            Direction::South => (Some(self.column), self.row.checked_add(1)),
            Direction::West => (self.column.checked_sub(1), Some(self.row)),
        };
        let (column, row) = (column?, row?);

        if column < size && row < size {
            Some(CellCoord::new(column, row))
        } else {
            None
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Unique identifier assigned to a play session.
///
/// Identifiers increase monotonically so that restarting yields a new session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(u32);

impl SessionId {
    /// Creates a new session identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Identifier that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Lifecycle of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No maze has been started yet.
    NotStarted,
    /// The player is walking the maze.
    InProgress,
    /// The player is walking the maze but the clock is frozen.
    Paused,
    /// The player reached the exit and the quiz is pending.
    Completed,
    /// The quiz was answered and the final score is known.
    Scored,
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// A wall separates the current cell from the requested neighbour.
    Wall,
    /// The session does not accept moves in its current phase.
    NotInProgress,
}

/// Graph-search strategies offered as answers to the comprehension question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchStrategy {
    /// Explores every node at distance `k` before any node at distance `k + 1`.
    BreadthFirst,
    /// Follows one branch as deep as possible before backtracking.
    DepthFirst,
}

impl SearchStrategy {
    /// Whether the strategy always finds a shortest path in an unweighted graph.
    #[must_use]
    pub const fn guarantees_shortest_path(self) -> bool {
        matches!(self, Self::BreadthFirst)
    }
}

/// Star rating awarded for a final score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StarRating {
    /// Awarded for any completed session.
    One,
    /// Awarded for a good final score.
    Two,
    /// Awarded for an excellent final score.
    Three,
}

impl StarRating {
    /// Number of stars as an integer.
    #[must_use]
    pub const fn count(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

/// Score record derived from a completed traversal and the quiz answer.
///
/// Every score lies in `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Efficiency of the walked path compared with the optimal one.
    pub movement: u32,
    /// Speed of the traversal compared with the time budget.
    pub time: u32,
    /// Rounded mean of the movement and time scores.
    pub game: u32,
    /// Points awarded for the comprehension question.
    pub comprehension: u32,
    /// Rounded mean of the game and comprehension scores.
    pub final_score: u32,
    /// Star rating derived from the final score.
    pub stars: StarRating,
    /// Edge length of the maze that was played.
    pub size: u32,
    /// Number of accepted moves the player made.
    pub moves: u32,
    /// Number of moves on the shortest entrance-to-exit path.
    pub optimal_moves: u32,
    /// Whole seconds the traversal took, excluding paused intervals.
    pub elapsed_seconds: u64,
}

/// Errors raised by grid construction and adjacency queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum MazeError {
    /// A maze must have at least one cell per edge.
    #[error("maze size must be at least 1, got {size}")]
    InvalidSize {
        /// Requested edge length.
        size: u32,
    },
    /// An adjacency query stepped outside the grid.
    #[error("moving {direction:?} from {cell} leaves the grid")]
    OutOfBounds {
        /// Cell the query started from.
        cell: CellCoord,
        /// Direction that left the grid.
        direction: Direction,
    },
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Direction, MazeError, ScoreReport, SearchStrategy, StarRating};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn grid_index_is_row_major_and_bounded() {
        assert_eq!(CellCoord::new(0, 0).grid_index(3), Some(0));
        assert_eq!(CellCoord::new(2, 0).grid_index(3), Some(2));
        assert_eq!(CellCoord::new(1, 2).grid_index(3), Some(7));
        assert_eq!(CellCoord::new(3, 0).grid_index(3), None);
        assert_eq!(CellCoord::new(0, 3).grid_index(3), None);
        assert_eq!(CellCoord::new(0, 0).grid_index(0), None);
    }

    #[test]
    fn step_stays_inside_grid() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::North, 3), None);
        assert_eq!(corner.step(Direction::West, 3), None);
        assert_eq!(corner.step(Direction::East, 3), Some(CellCoord::new(1, 0)));
        assert_eq!(corner.step(Direction::South, 3), Some(CellCoord::new(0, 1)));

        let far = CellCoord::new(2, 2);
        assert_eq!(far.step(Direction::East, 3), None);
        assert_eq!(far.step(Direction::South, 3), None);
    }

    #[test]
    fn between_inverts_step() {
        let origin = CellCoord::new(2, 2);
        for direction in Direction::ALL {
            let neighbor = origin.step(direction, 5).expect("neighbor inside grid");
            assert_eq!(Direction::between(origin, neighbor), Some(direction));
            assert_eq!(
                Direction::between(neighbor, origin),
                Some(direction.opposite())
            );
        }
        assert_eq!(Direction::between(origin, CellCoord::new(3, 3)), None);
        assert_eq!(Direction::between(origin, origin), None);
    }

    #[test]
    fn breadth_first_is_the_correct_answer() {
        assert!(SearchStrategy::BreadthFirst.guarantees_shortest_path());
        assert!(!SearchStrategy::DepthFirst.guarantees_shortest_path());
    }

    #[test]
    fn invalid_size_message_mentions_size() {
        let error = MazeError::InvalidSize { size: 0 };
        assert_eq!(error.to_string(), "maze size must be at least 1, got 0");
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn score_report_round_trips_through_bincode() {
        assert_round_trip(&ScoreReport {
            movement: 80,
            time: 64,
            game: 72,
            comprehension: 100,
            final_score: 86,
            stars: StarRating::Two,
            size: 12,
            moves: 40,
            optimal_moves: 32,
            elapsed_seconds: 250,
        });
    }

    #[test]
    fn maze_error_round_trips_through_bincode() {
        assert_round_trip(&MazeError::OutOfBounds {
            cell: CellCoord::new(0, 4),
            direction: Direction::West,
        });
    }
}
