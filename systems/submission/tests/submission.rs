use labyrinth_core::{Event, ScoreReport, SessionId, StarRating};
use labyrinth_system_submission::{
    ScoreSink, ScoreSubmission, Submission, SubmissionError, SubmissionOutcome,
};

#[derive(Default)]
struct RecordingSink {
    received: Vec<ScoreSubmission>,
    fail_with: Option<SubmissionError>,
}

impl ScoreSink for RecordingSink {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), SubmissionError> {
        self.received.push(submission.clone());
        match &self.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn recorded(session: u32, final_score: u32) -> Event {
    Event::ScoreRecorded {
        session: SessionId::new(session),
        report: ScoreReport {
            movement: final_score,
            time: final_score,
            game: final_score,
            comprehension: 100,
            final_score,
            stars: StarRating::Two,
            size: 12,
            moves: 31,
            optimal_moves: 25,
            elapsed_seconds: 140,
        },
    }
}

#[test]
fn recorded_scores_reach_the_sink() {
    let mut submission = Submission::new("maze");
    let mut sink = RecordingSink::default();

    submission.handle(&[recorded(1, 82)], &mut sink);

    assert_eq!(
        sink.received,
        vec![ScoreSubmission {
            level: "maze".to_owned(),
            score: 82,
            size: 12,
            moves: 31,
        }]
    );
    assert_eq!(
        submission.last_outcome(),
        Some(&SubmissionOutcome::Delivered {
            session: SessionId::new(1),
        })
    );
}

#[test]
fn each_session_is_submitted_once() {
    let mut submission = Submission::new("maze");
    let mut sink = RecordingSink::default();

    submission.handle(&[recorded(4, 90)], &mut sink);
    submission.handle(&[recorded(4, 90)], &mut sink);
    submission.handle(&[recorded(5, 70)], &mut sink);

    assert_eq!(sink.received.len(), 2);
}

#[test]
fn failures_are_remembered_not_raised() {
    let mut submission = Submission::new("maze");
    let error = SubmissionError::Rejected {
        status: 401,
        message: "session expired".to_owned(),
    };
    let mut sink = RecordingSink {
        fail_with: Some(error.clone()),
        ..RecordingSink::default()
    };

    submission.handle(&[recorded(2, 40)], &mut sink);

    assert_eq!(
        submission.last_outcome(),
        Some(&SubmissionOutcome::Failed {
            session: SessionId::new(2),
            error,
        })
    );
}

#[test]
fn unrelated_events_are_ignored() {
    let mut submission = Submission::new("maze");
    let mut sink = RecordingSink::default();

    submission.handle(
        &[Event::SessionStarted {
            session: SessionId::new(1),
            size: 12,
            optimal_moves: 30,
        }],
        &mut sink,
    );

    assert!(sink.received.is_empty());
    assert!(submission.last_outcome().is_none());
}

#[test]
fn submission_serializes_as_flat_json() {
    let payload = ScoreSubmission {
        level: "maze".to_owned(),
        score: 77,
        size: 12,
        moves: 40,
    };

    let json = serde_json::to_string(&payload).expect("serialize");
    assert_eq!(json, r#"{"level":"maze","score":77,"size":12,"moves":40}"#);
}
