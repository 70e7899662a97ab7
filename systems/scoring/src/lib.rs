#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Score evaluation for completed traversals.
//!
//! A session is scored on two axes. The game score compares the player's walk
//! with the optimal solution, both in moves and in time. The comprehension
//! score rewards a correct answer to the closing quiz. The final score is the
//! rounded mean of the two and always lies in `[0, 100]`.

use labyrinth_core::{Command, Event, ScoreReport, SearchStrategy, SessionId, StarRating};
use serde::Deserialize;

/// Highest score any component can reach.
pub const MAX_SCORE: u32 = 100;

/// Time budget granted for each move of the optimal path.
pub const DEFAULT_SECONDS_PER_MOVE: u32 = 5;

/// Score thresholds that award extra stars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StarThresholds {
    /// Minimum final score for three stars.
    pub three: u32,
    /// Minimum final score for two stars.
    pub two: u32,
}

impl Default for StarThresholds {
    fn default() -> Self {
        Self { three: 90, two: 70 }
    }
}

impl StarThresholds {
    /// Star rating earned by `final_score`.
    #[must_use]
    pub fn rating(&self, final_score: u32) -> StarRating {
        if final_score >= self.three {
            StarRating::Three
        } else if final_score >= self.two {
            StarRating::Two
        } else {
            StarRating::One
        }
    }
}

/// Tunable scoring parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Seconds budgeted per optimal move when computing the time score.
    pub seconds_per_move: u32,
    /// Points awarded for a correct quiz answer, capped at [`MAX_SCORE`].
    pub comprehension_points: u32,
    /// Thresholds used to derive the star rating.
    pub stars: StarThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            seconds_per_move: DEFAULT_SECONDS_PER_MOVE,
            comprehension_points: MAX_SCORE,
            stars: StarThresholds::default(),
        }
    }
}

/// Traversal statistics captured when a session reaches its exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Session that was completed.
    pub session: SessionId,
    /// Edge length of the maze.
    pub size: u32,
    /// Number of accepted moves.
    pub moves: u32,
    /// Number of moves on the optimal path.
    pub optimal_moves: u32,
    /// Whole seconds spent walking.
    pub elapsed_seconds: u64,
}

/// Efficiency of the walk: `round(100 * optimal / taken)`, clamped to `[0, 100]`.
///
/// A walk with no moves can only happen when entrance and exit coincide and
/// scores full marks.
#[must_use]
pub fn movement_score(optimal_moves: u32, moves_taken: u32) -> u32 {
    if moves_taken == 0 {
        return MAX_SCORE;
    }
    ratio_score(u64::from(optimal_moves), u64::from(moves_taken))
}

/// Speed of the walk: `round(100 * optimal * seconds_per_move / seconds)`,
/// clamped to `[0, 100]`.
///
/// Elapsed time is treated as at least one second. A maze whose optimal path
/// has no moves (size 1) scores full marks on purpose rather than the 0 the
/// ratio would give, since the exit is reached without moving.
#[must_use]
pub fn time_score(optimal_moves: u32, seconds_elapsed: u64, seconds_per_move: u32) -> u32 {
    if optimal_moves == 0 {
        return MAX_SCORE;
    }
    let budget = u64::from(optimal_moves).saturating_mul(u64::from(seconds_per_move));
    ratio_score(budget, seconds_elapsed.max(1))
}

/// Rounded mean of the movement and time scores.
#[must_use]
pub fn game_score(movement: u32, time: u32) -> u32 {
    rounded_mean(movement, time)
}

/// Points for the quiz: full marks for breadth-first search, nothing otherwise.
#[must_use]
pub fn comprehension_score(strategy: SearchStrategy, full_points: u32) -> u32 {
    if strategy.guarantees_shortest_path() {
        full_points.min(MAX_SCORE)
    } else {
        0
    }
}

/// Rounded mean of the game and comprehension scores.
#[must_use]
pub fn final_score(game: u32, comprehension: u32) -> u32 {
    rounded_mean(game, comprehension)
}

/// Builds the full score record for a completed session and quiz answer.
#[must_use]
pub fn evaluate(
    config: &ScoringConfig,
    completion: &Completion,
    strategy: SearchStrategy,
) -> ScoreReport {
    let movement = movement_score(completion.optimal_moves, completion.moves);
    let time = time_score(
        completion.optimal_moves,
        completion.elapsed_seconds,
        config.seconds_per_move,
    );
    let game = game_score(movement, time);
    let comprehension = comprehension_score(strategy, config.comprehension_points);
    let final_score = final_score(game, comprehension);

    ScoreReport {
        movement,
        time,
        game,
        comprehension,
        final_score,
        stars: config.stars.rating(final_score),
        size: completion.size,
        moves: completion.moves,
        optimal_moves: completion.optimal_moves,
        elapsed_seconds: completion.elapsed_seconds,
    }
}

/// Pure system that turns a completed session and its quiz answer into a
/// score command.
#[derive(Debug, Default)]
pub struct Scoring {
    config: ScoringConfig,
    completion: Option<Completion>,
}

impl Scoring {
    /// Creates a scoring system with the provided parameters.
    #[must_use]
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            completion: None,
        }
    }

    /// Parameters used to evaluate sessions.
    #[must_use]
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Consumes world events and emits a `RecordScore` command once both the
    /// completion and the quiz answer of a session have been observed.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match *event {
                Event::SessionStarted { .. } => self.completion = None,
                Event::MazeCompleted {
                    session,
                    size,
                    moves,
                    optimal_moves,
                    elapsed_seconds,
                } => {
                    self.completion = Some(Completion {
                        session,
                        size,
                        moves,
                        optimal_moves,
                        elapsed_seconds,
                    });
                }
                Event::QuizAnswered {
                    session, strategy, ..
                } => {
                    let Some(completion) = self.completion.take() else {
                        continue;
                    };
                    if completion.session != session {
                        self.completion = Some(completion);
                        continue;
                    }

                    let report = evaluate(&self.config, &completion, strategy);
                    log::debug!(
                        "session {} scored {} ({} stars)",
                        session.get(),
                        report.final_score,
                        report.stars.count()
                    );
                    out.push(Command::RecordScore { session, report });
                }
                _ => {}
            }
        }
    }
}

fn ratio_score(numerator: u64, denominator: u64) -> u32 {
    let numerator = u128::from(numerator);
    let denominator = u128::from(denominator.max(1));
    let rounded = (numerator * u128::from(MAX_SCORE) * 2 + denominator) / (denominator * 2);
    u32::try_from(rounded.min(u128::from(MAX_SCORE))).unwrap_or(MAX_SCORE)
}

fn rounded_mean(first: u32, second: u32) -> u32 {
    let sum = u64::from(first.min(MAX_SCORE)) + u64::from(second.min(MAX_SCORE));
    u32::try_from((sum + 1) / 2).unwrap_or(MAX_SCORE)
}
