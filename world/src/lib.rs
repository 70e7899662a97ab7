#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Labyrinth.

mod traversal;

pub use traversal::Traversal;

use labyrinth_core::{
    CellCoord, Command, Event, Maze, MoveRejection, ScoreReport, SearchStrategy, SessionId,
    SessionPhase, WELCOME_BANNER,
};
use labyrinth_system_pathfinding::{shortest_path, Path};

/// Represents the authoritative Labyrinth world state.
///
/// Holds at most one session. Starting a new session discards the previous
/// maze, tracker and score.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    last_session: SessionId,
    session: Option<Session>,
}

impl World {
    /// Creates a world with no session in progress.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            last_session: SessionId::new(0),
            session: None,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Walking,
    Completed,
    Scored,
}

#[derive(Debug)]
struct Session {
    id: SessionId,
    maze: Maze,
    solution: Path,
    traversal: Traversal,
    stage: Stage,
    answer: Option<SearchStrategy>,
    report: Option<ScoreReport>,
}

impl Session {
    fn phase(&self) -> SessionPhase {
        match self.stage {
            Stage::Walking if self.traversal.is_paused() => SessionPhase::Paused,
            Stage::Walking => SessionPhase::InProgress,
            Stage::Completed => SessionPhase::Completed,
            Stage::Scored => SessionPhase::Scored,
        }
    }

    fn complete_if_at_exit(&mut self, out_events: &mut Vec<Event>) {
        if self.stage != Stage::Walking || !self.traversal.is_complete() {
            return;
        }

        self.stage = Stage::Completed;
        log::debug!(
            "session {} completed in {} moves (optimal {})",
            self.id.get(),
            self.traversal.moves(),
            self.solution.moves()
        );
        out_events.push(Event::MazeCompleted {
            session: self.id,
            size: self.maze.size(),
            moves: self.traversal.moves(),
            optimal_moves: self.solution.moves(),
            elapsed_seconds: self.traversal.elapsed_seconds(),
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartSession { maze } => {
            let id = world.last_session.next();
            world.last_session = id;

            let solution = shortest_path(&maze, maze.entrance(), maze.exit());
            let traversal = Traversal::new(&maze);
            log::debug!(
                "session {} started on {}x{} maze, optimal path {} moves",
                id.get(),
                maze.size(),
                maze.size(),
                solution.moves()
            );
            out_events.push(Event::SessionStarted {
                session: id,
                size: maze.size(),
                optimal_moves: solution.moves(),
            });

            let session = world.session.insert(Session {
                id,
                maze,
                solution,
                traversal,
                stage: Stage::Walking,
                answer: None,
                report: None,
            });
            session.complete_if_at_exit(out_events);
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });

            if let Some(session) = world.session.as_mut() {
                if session.stage == Stage::Walking {
                    session.traversal.advance(dt);
                }
            }
        }
        Command::MovePlayer { direction } => {
            let Some(session) = world.session.as_mut() else {
                out_events.push(Event::MoveRejected {
                    at: CellCoord::new(0, 0),
                    direction,
                    reason: MoveRejection::NotInProgress,
                });
                return;
            };

            let from = session.traversal.current();
            if session.phase() != SessionPhase::InProgress {
                out_events.push(Event::MoveRejected {
                    at: from,
                    direction,
                    reason: MoveRejection::NotInProgress,
                });
                return;
            }

            if !session.traversal.attempt_move(&session.maze, direction) {
                out_events.push(Event::MoveRejected {
                    at: from,
                    direction,
                    reason: MoveRejection::Wall,
                });
                return;
            }

            out_events.push(Event::PlayerMoved {
                from,
                to: session.traversal.current(),
                moves: session.traversal.moves(),
            });
            session.complete_if_at_exit(out_events);
        }
        Command::SetPaused { paused } => {
            let Some(session) = world.session.as_mut() else {
                return;
            };

            if session.stage != Stage::Walking || session.traversal.is_paused() == paused {
                return;
            }

            if paused {
                session.traversal.pause();
            } else {
                session.traversal.resume();
            }
            out_events.push(Event::PauseChanged { paused });
        }
        Command::AnswerQuiz { strategy } => {
            let phase = query::phase(world);
            match world.session.as_mut() {
                Some(session) if session.stage == Stage::Completed && session.answer.is_none() => {
                    session.answer = Some(strategy);
                    out_events.push(Event::QuizAnswered {
                        session: session.id,
                        strategy,
                        correct: strategy.guarantees_shortest_path(),
                    });
                }
                _ => out_events.push(Event::QuizRejected { phase }),
            }
        }
        Command::RecordScore { session, report } => {
            let Some(current) = world.session.as_mut() else {
                return;
            };

            if current.id != session || current.stage != Stage::Completed || current.answer.is_none()
            {
                log::debug!("ignoring score for stale session {}", session.get());
                return;
            }

            current.report = Some(report);
            current.stage = Stage::Scored;
            out_events.push(Event::ScoreRecorded { session, report });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use labyrinth_core::{CellCoord, Maze, ScoreReport, SessionId, SessionPhase};
    use labyrinth_system_pathfinding::{shortest_path, Path};

    use super::{Traversal, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Current lifecycle phase of the session.
    #[must_use]
    pub fn phase(world: &World) -> SessionPhase {
        world
            .session
            .as_ref()
            .map_or(SessionPhase::NotStarted, |session| session.phase())
    }

    /// Identifier of the running session, if any.
    #[must_use]
    pub fn session_id(world: &World) -> Option<SessionId> {
        world.session.as_ref().map(|session| session.id)
    }

    /// Maze of the running session.
    #[must_use]
    pub fn maze(world: &World) -> Option<&Maze> {
        world.session.as_ref().map(|session| &session.maze)
    }

    /// Tracker of the running session.
    #[must_use]
    pub fn traversal(world: &World) -> Option<&Traversal> {
        world.session.as_ref().map(|session| &session.traversal)
    }

    /// Cell the player currently occupies.
    #[must_use]
    pub fn player_cell(world: &World) -> Option<CellCoord> {
        traversal(world).map(Traversal::current)
    }

    /// Every cell the player stood on, in order.
    #[must_use]
    pub fn player_path(world: &World) -> &[CellCoord] {
        match traversal(world) {
            Some(traversal) => traversal.path(),
            None => &[],
        }
    }

    /// Number of accepted moves in the running session.
    #[must_use]
    pub fn move_count(world: &World) -> u32 {
        traversal(world).map_or(0, Traversal::moves)
    }

    /// Whole seconds spent walking, paused intervals excluded.
    #[must_use]
    pub fn elapsed_seconds(world: &World) -> u64 {
        traversal(world).map_or(0, Traversal::elapsed_seconds)
    }

    /// Reports whether the running session is paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        phase(world) == SessionPhase::Paused
    }

    /// Optimal entrance-to-exit path used for the cheat overlay and scoring.
    #[must_use]
    pub fn solution(world: &World) -> Option<&Path> {
        world.session.as_ref().map(|session| &session.solution)
    }

    /// Shortest path from the player's current cell to the exit.
    #[must_use]
    pub fn hint(world: &World) -> Option<Path> {
        world.session.as_ref().map(|session| {
            shortest_path(
                &session.maze,
                session.traversal.current(),
                session.maze.exit(),
            )
        })
    }

    /// Final score of the session once it has been recorded.
    #[must_use]
    pub fn score(world: &World) -> Option<&ScoreReport> {
        world
            .session
            .as_ref()
            .and_then(|session| session.report.as_ref())
    }
}
