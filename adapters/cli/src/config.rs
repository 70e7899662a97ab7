//! Game settings loaded from an optional TOML file.

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use labyrinth_core::DEFAULT_MAZE_SIZE;
use labyrinth_system_scoring::{ScoringConfig, StarThresholds, DEFAULT_SECONDS_PER_MOVE, MAX_SCORE};
use serde::Deserialize;

/// Settings for a play session, before command-line overrides.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    /// Level identifier reported alongside submitted scores.
    pub(crate) level: String,
    /// Edge length of generated mazes.
    pub(crate) size: u32,
    /// Seed for maze generation; entropy when absent.
    pub(crate) seed: Option<u64>,
    /// Time budget per optimal move.
    pub(crate) seconds_per_move: u32,
    /// Points for a correct quiz answer.
    pub(crate) comprehension_points: u32,
    /// File receiving one JSON line per submitted score.
    pub(crate) submission_log: Option<PathBuf>,
    /// Star rating cut-offs.
    pub(crate) stars: StarThresholds,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            level: "maze".to_owned(),
            size: DEFAULT_MAZE_SIZE,
            seed: None,
            seconds_per_move: DEFAULT_SECONDS_PER_MOVE,
            comprehension_points: MAX_SCORE,
            submission_log: None,
            stars: StarThresholds::default(),
        }
    }
}

impl GameConfig {
    /// Reads the configuration at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parses configuration from TOML text.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("failed to parse TOML")
    }

    /// Scoring parameters derived from these settings.
    #[must_use]
    pub(crate) fn scoring(&self) -> ScoringConfig {
        ScoringConfig {
            seconds_per_move: self.seconds_per_move,
            comprehension_points: self.comprehension_points,
            stars: self.stars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = GameConfig::parse("").expect("empty config is valid");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.size, 12);
        assert_eq!(config.level, "maze");
        assert_eq!(config.scoring(), ScoringConfig::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let config = GameConfig::parse(
            r#"
            level = "maze-hard"
            size = 20
            seed = 42
            seconds_per_move = 3
            submission_log = "scores.jsonl"

            [stars]
            three = 95
            two = 75
            "#,
        )
        .expect("valid config");

        assert_eq!(config.level, "maze-hard");
        assert_eq!(config.size, 20);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.submission_log, Some(PathBuf::from("scores.jsonl")));
        assert_eq!(config.comprehension_points, 100);

        let scoring = config.scoring();
        assert_eq!(scoring.seconds_per_move, 3);
        assert_eq!(scoring.stars, StarThresholds { three: 95, two: 75 });
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(GameConfig::parse("colour = \"red\"").is_err());
    }
}
