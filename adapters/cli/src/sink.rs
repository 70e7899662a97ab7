//! Score sinks available to the terminal adapter.

use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use labyrinth_system_submission::{ScoreSink, ScoreSubmission, SubmissionError};

/// Appends every submission as a single JSON line to a file.
#[derive(Debug)]
pub(crate) struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    /// Creates a sink writing to `path`. The file is created on first use.
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreSink for JsonLinesSink {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), SubmissionError> {
        let mut line = serde_json::to_string(submission)
            .map_err(|error| SubmissionError::Transport(error.to_string()))?;
        line.push('\n');

        append(&self.path, line.as_bytes())
            .map_err(|error| SubmissionError::Transport(error.to_string()))
    }
}

fn append(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(bytes)?;
    file.flush()
}

/// Sink used when no submission log is configured; scores only reach the log.
#[derive(Debug, Default)]
pub(crate) struct LogSink;

impl ScoreSink for LogSink {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), SubmissionError> {
        log::debug!(
            "no submission log configured, keeping score {} for {} locally",
            submission.score,
            submission.level
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn submission(score: u32) -> ScoreSubmission {
        ScoreSubmission {
            level: "maze".to_owned(),
            score,
            size: 4,
            moves: 9,
        }
    }

    #[test]
    fn json_lines_sink_appends_one_line_per_score() {
        let path = std::env::temp_dir().join(format!(
            "labyrinth-sink-{}-{}.jsonl",
            std::process::id(),
            line!()
        ));
        let _ = fs::remove_file(&path);
        let mut sink = JsonLinesSink::new(&path);

        sink.submit(&submission(80)).expect("first write");
        sink.submit(&submission(95)).expect("second write");

        let written = fs::read_to_string(&path).expect("log readable");
        let _ = fs::remove_file(&path);
        assert_eq!(
            written,
            "{\"level\":\"maze\",\"score\":80,\"size\":4,\"moves\":9}\n\
             {\"level\":\"maze\",\"score\":95,\"size\":4,\"moves\":9}\n"
        );
    }

    #[test]
    fn unwritable_destination_reports_transport_error() {
        let mut sink = JsonLinesSink::new(std::env::temp_dir());

        let result = sink.submit(&submission(50));

        assert!(matches!(result, Err(SubmissionError::Transport(_))));
    }

    #[test]
    fn log_sink_always_accepts() {
        assert_eq!(LogSink.submit(&submission(10)), Ok(()));
    }
}
