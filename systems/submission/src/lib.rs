#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Best-effort hand-off of final scores to an external collaborator.
//!
//! The collaborator accepts a level identifier and an integer score and
//! answers with success or failure. Failures are logged and remembered but
//! never fed back into the world: a lost submission must not block or corrupt
//! the session.

use labyrinth_core::{Event, SessionId};
use serde::Serialize;
use thiserror::Error;

/// Payload handed to the score collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreSubmission {
    /// Level the score belongs to.
    pub level: String,
    /// Final score in `[0, 100]`.
    pub score: u32,
    /// Edge length of the maze, for display.
    pub size: u32,
    /// Number of moves the player made, for display.
    pub moves: u32,
}

/// Reasons a submission may fail.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The collaborator could not be reached.
    #[error("score transport failed: {0}")]
    Transport(String),
    /// The collaborator answered with an error status. Produced by sinks that
    /// talk to a remote score service, such as an HTTP client.
    #[error("score rejected with status {status}: {message}")]
    Rejected {
        /// Status code returned by the collaborator.
        status: u16,
        /// Human readable reason supplied by the collaborator.
        message: String,
    },
}

/// External collaborator that stores final scores.
pub trait ScoreSink {
    /// Delivers a single submission.
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), SubmissionError>;
}

/// Result of the most recent submission attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The collaborator accepted the score.
    Delivered {
        /// Session whose score was delivered.
        session: SessionId,
    },
    /// The collaborator could not store the score.
    Failed {
        /// Session whose score was lost.
        session: SessionId,
        /// Failure reported by the sink.
        error: SubmissionError,
    },
}

/// Pure system that forwards recorded scores to a [`ScoreSink`].
#[derive(Debug)]
pub struct Submission {
    level: String,
    last_submitted: Option<SessionId>,
    last_outcome: Option<SubmissionOutcome>,
}

impl Submission {
    /// Creates a submission system reporting scores under `level`.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            last_submitted: None,
            last_outcome: None,
        }
    }

    /// Result of the most recent submission attempt, if any.
    #[must_use]
    pub fn last_outcome(&self) -> Option<&SubmissionOutcome> {
        self.last_outcome.as_ref()
    }

    /// Consumes world events and submits each recorded score exactly once.
    pub fn handle<S>(&mut self, events: &[Event], sink: &mut S)
    where
        S: ScoreSink + ?Sized,
    {
        for event in events {
            let Event::ScoreRecorded { session, report } = event else {
                continue;
            };

            if self.last_submitted == Some(*session) {
                continue;
            }
            self.last_submitted = Some(*session);

            let submission = ScoreSubmission {
                level: self.level.clone(),
                score: report.final_score,
                size: report.size,
                moves: report.moves,
            };

            let outcome = match sink.submit(&submission) {
                Ok(()) => {
                    log::info!(
                        "submitted score {} for level {}",
                        submission.score,
                        submission.level
                    );
                    SubmissionOutcome::Delivered { session: *session }
                }
                Err(error) => {
                    log::warn!(
                        "could not submit score for session {}: {error}",
                        session.get()
                    );
                    SubmissionOutcome::Failed {
                        session: *session,
                        error,
                    }
                }
            };
            self.last_outcome = Some(outcome);
        }
    }
}
