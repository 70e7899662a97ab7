//! Terminal session driver.
//!
//! Reads player input, turns it into commands and pumps them through the
//! world, the scoring system and the submission system until no follow-up
//! commands remain.

use std::{
    io::{BufRead, Write},
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use labyrinth_core::{
    Command, Direction, Event, MoveRejection, ScoreReport, SearchStrategy, SessionPhase,
};
use labyrinth_system_generation::Generator;
use labyrinth_system_scoring::Scoring;
use labyrinth_system_submission::{ScoreSink, Submission, SubmissionOutcome};
use labyrinth_world::{self as world, query, World};

use crate::{
    config::GameConfig,
    render::{render, status_line},
};

const CONTROLS: &str =
    "move with w/a/s/d (or north/east/south/west), p pause, h hint, r restart, q quit";
const QUIZ: &str =
    "Which search always finds the shortest way out of a maze? [bfs/dfs]";

/// A single line of player input while walking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    /// Step in a direction.
    Move(Direction),
    /// Pause or resume the clock.
    TogglePause,
    /// Show or hide the path to the exit.
    ToggleHint,
    /// Abandon the current maze and generate a new one.
    Restart,
    /// Leave the game.
    Quit,
}

/// Interprets a line typed by the player.
#[must_use]
pub(crate) fn parse_input(line: &str) -> Option<Input> {
    let input = match line.trim().to_ascii_lowercase().as_str() {
        "w" | "north" | "up" => Input::Move(Direction::North),
        "d" | "east" | "right" => Input::Move(Direction::East),
        "s" | "south" | "down" => Input::Move(Direction::South),
        "a" | "west" | "left" => Input::Move(Direction::West),
        "p" | "pause" => Input::TogglePause,
        "h" | "hint" => Input::ToggleHint,
        "r" | "restart" => Input::Restart,
        "q" | "quit" | "exit" => Input::Quit,
        _ => return None,
    };
    Some(input)
}

/// Interprets an answer to the search strategy question.
#[must_use]
pub(crate) fn parse_answer(line: &str) -> Option<SearchStrategy> {
    match line.trim().to_ascii_lowercase().as_str() {
        "b" | "bfs" | "breadth" | "breadth-first" => Some(SearchStrategy::BreadthFirst),
        "d" | "dfs" | "depth" | "depth-first" => Some(SearchStrategy::DepthFirst),
        _ => None,
    }
}

/// Owns the world and the systems for one terminal run.
pub(crate) struct Game {
    world: World,
    scoring: Scoring,
    submission: Submission,
    sink: Box<dyn ScoreSink>,
    generator: Generator,
    size: u32,
    seconds_per_move: u32,
    show_hint: bool,
}

impl Game {
    /// Prepares a game and starts its first maze.
    pub(crate) fn new(config: &GameConfig, sink: Box<dyn ScoreSink>) -> Result<Self> {
        let generator = match config.seed {
            Some(seed) => Generator::from_seed(seed),
            None => Generator::from_entropy(),
        };

        let mut game = Self {
            world: World::new(),
            scoring: Scoring::new(config.scoring()),
            submission: Submission::new(config.level.clone()),
            sink,
            generator,
            size: config.size,
            seconds_per_move: config.seconds_per_move,
            show_hint: false,
        };
        let _ = game.start()?;
        Ok(game)
    }

    /// Plays interactively, reading one command per line from `input`.
    pub(crate) fn play<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(out, "{}", query::welcome_banner(&self.world))?;
        writeln!(out, "{CONTROLS}")?;
        self.draw(out)?;

        let mut last_input = Instant::now();
        for line in input.lines() {
            let line = line.context("failed to read player input")?;
            let now = Instant::now();
            let _ = self.send(Command::Tick {
                dt: now.duration_since(last_input),
            });
            last_input = now;

            match query::phase(&self.world) {
                SessionPhase::Completed => {
                    if parse_input(&line) == Some(Input::Quit) {
                        break;
                    }
                    let Some(strategy) = parse_answer(&line) else {
                        writeln!(out, "{QUIZ}")?;
                        continue;
                    };
                    let events = self.send(Command::AnswerQuiz { strategy });
                    self.narrate(&events, out)?;
                    writeln!(out, "Press r for a new maze or q to quit.")?;
                }
                _ => match parse_input(&line) {
                    Some(Input::Quit) => break,
                    Some(Input::Restart) => {
                        let events = self.start()?;
                        self.narrate(&events, out)?;
                        self.draw(out)?;
                    }
                    Some(Input::ToggleHint) => {
                        self.show_hint = !self.show_hint;
                        self.draw(out)?;
                    }
                    Some(Input::TogglePause) => {
                        let paused = !query::is_paused(&self.world);
                        let events = self.send(Command::SetPaused { paused });
                        self.narrate(&events, out)?;
                    }
                    Some(Input::Move(direction)) => {
                        let events = self.send(Command::MovePlayer { direction });
                        self.draw(out)?;
                        self.narrate(&events, out)?;
                    }
                    None => writeln!(out, "Unknown command. {CONTROLS}")?,
                },
            }
        }

        Ok(())
    }

    /// Walks the optimal path at the budgeted pace and answers the quiz.
    pub(crate) fn autoplay<W: Write>(&mut self, out: &mut W) -> Result<()> {
        writeln!(out, "{}", query::welcome_banner(&self.world))?;
        let Some(solution) = query::solution(&self.world).cloned() else {
            bail!("no maze is loaded");
        };
        self.show_hint = true;
        self.draw(out)?;

        let pace = Duration::from_secs(u64::from(self.seconds_per_move));
        for direction in solution.directions() {
            let _ = self.send(Command::Tick { dt: pace });
            let events = self.send(Command::MovePlayer { direction });
            self.narrate(&events, out)?;
        }

        if query::phase(&self.world) != SessionPhase::Completed {
            bail!("autoplay did not reach the exit");
        }
        self.draw(out)?;

        writeln!(out, "> bfs")?;
        let events = self.send(Command::AnswerQuiz {
            strategy: SearchStrategy::BreadthFirst,
        });
        self.narrate(&events, out)
    }

    fn start(&mut self) -> Result<Vec<Event>> {
        let maze = self
            .generator
            .generate(self.size)
            .context("failed to generate maze")?;
        self.show_hint = false;
        Ok(self.send(Command::StartSession { maze }))
    }

    /// Applies `command` and every follow-up command the systems produce.
    fn send(&mut self, command: Command) -> Vec<Event> {
        let mut log = Vec::new();
        let mut pending = vec![command];

        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }

            self.scoring.handle(&events, &mut pending);
            self.submission.handle(&events, &mut *self.sink);
            log.extend(events);
        }

        log
    }

    fn draw<W: Write>(&self, out: &mut W) -> Result<()> {
        let (Some(maze), Some(player)) = (query::maze(&self.world), query::player_cell(&self.world))
        else {
            return Ok(());
        };

        let hint = if self.show_hint {
            query::hint(&self.world).unwrap_or_default()
        } else {
            Default::default()
        };

        write!(out, "{}", render(maze, player, &hint))?;
        writeln!(
            out,
            "{}",
            status_line(
                query::move_count(&self.world),
                query::elapsed_seconds(&self.world),
                query::is_paused(&self.world),
            )
        )?;
        Ok(())
    }

    fn narrate<W: Write>(&self, events: &[Event], out: &mut W) -> Result<()> {
        for event in events {
            match event {
                Event::SessionStarted {
                    size,
                    optimal_moves,
                    ..
                } => writeln!(
                    out,
                    "New {size}x{size} maze. The exit is {optimal_moves} moves away."
                )?,
                Event::MoveRejected { reason, .. } => match reason {
                    MoveRejection::Wall => writeln!(out, "A wall blocks the way.")?,
                    MoveRejection::NotInProgress => {
                        writeln!(out, "You cannot move right now.")?;
                    }
                },
                Event::PauseChanged { paused } => {
                    writeln!(out, "{}", if *paused { "Paused." } else { "Resumed." })?;
                }
                Event::MazeCompleted {
                    moves,
                    optimal_moves,
                    elapsed_seconds,
                    ..
                } => {
                    writeln!(
                        out,
                        "You escaped in {moves} moves (best possible {optimal_moves}) after {elapsed_seconds}s."
                    )?;
                    writeln!(out, "{QUIZ}")?;
                }
                Event::QuizAnswered { correct, .. } => writeln!(
                    out,
                    "{}",
                    if *correct {
                        "Correct: breadth-first search explores level by level."
                    } else {
                        "Not quite: depth-first search may wander down a long branch first."
                    }
                )?,
                Event::ScoreRecorded { report, .. } => {
                    write_report(report, out)?;
                    if let Some(SubmissionOutcome::Failed { error, .. }) =
                        self.submission.last_outcome()
                    {
                        writeln!(out, "Your score could not be submitted: {error}")?;
                    }
                }
                Event::TimeAdvanced { .. }
                | Event::PlayerMoved { .. }
                | Event::QuizRejected { .. } => {}
            }
        }
        Ok(())
    }
}

fn write_report<W: Write>(report: &ScoreReport, out: &mut W) -> Result<()> {
    writeln!(out, "Movement score: {}", report.movement)?;
    writeln!(out, "Time score: {}", report.time)?;
    writeln!(out, "Game score: {}", report.game)?;
    writeln!(out, "Comprehension score: {}", report.comprehension)?;
    writeln!(out, "Final score: {}", report.final_score)?;
    writeln!(out, "Stars: {}", "*".repeat(usize::from(report.stars.count())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use labyrinth_system_submission::{ScoreSubmission, SubmissionError};

    use super::*;

    struct Unreachable;

    impl ScoreSink for Unreachable {
        fn submit(&mut self, _: &ScoreSubmission) -> Result<(), SubmissionError> {
            Err(SubmissionError::Transport("offline".to_owned()))
        }
    }

    fn config(size: u32) -> GameConfig {
        GameConfig {
            size,
            seed: Some(11),
            ..GameConfig::default()
        }
    }

    fn output(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).expect("utf-8 output")
    }

    #[test]
    fn parses_movement_and_controls() {
        assert_eq!(parse_input("w"), Some(Input::Move(Direction::North)));
        assert_eq!(parse_input(" East\n"), Some(Input::Move(Direction::East)));
        assert_eq!(parse_input("s"), Some(Input::Move(Direction::South)));
        assert_eq!(parse_input("a"), Some(Input::Move(Direction::West)));
        assert_eq!(parse_input("p"), Some(Input::TogglePause));
        assert_eq!(parse_input("h"), Some(Input::ToggleHint));
        assert_eq!(parse_input("r"), Some(Input::Restart));
        assert_eq!(parse_input("q"), Some(Input::Quit));
        assert_eq!(parse_input("jump"), None);
    }

    #[test]
    fn parses_quiz_answers() {
        assert_eq!(parse_answer("BFS"), Some(SearchStrategy::BreadthFirst));
        assert_eq!(parse_answer("depth-first"), Some(SearchStrategy::DepthFirst));
        assert_eq!(parse_answer("maybe"), None);
    }

    #[test]
    fn zero_size_is_rejected_before_play() {
        assert!(Game::new(&config(0), Box::new(Unreachable)).is_err());
    }

    #[test]
    fn autoplay_scores_full_marks_even_when_submission_fails() {
        let mut game = Game::new(&config(5), Box::new(Unreachable)).expect("valid config");
        let mut out = Vec::new();

        game.autoplay(&mut out).expect("autoplay succeeds");

        let text = output(out);
        assert!(text.contains("Final score: 100"), "{text}");
        assert!(text.contains("Stars: ***"), "{text}");
        assert!(text.contains("could not be submitted"), "{text}");
        assert_eq!(query::phase(&game.world), SessionPhase::Scored);
    }

    #[test]
    fn interactive_session_walks_and_quits() {
        let mut game = Game::new(&config(4), Box::new(Unreachable)).expect("valid config");
        let solution = query::solution(&game.world).cloned().expect("maze loaded");
        let mut script: Vec<&str> = solution
            .directions()
            .map(|direction| match direction {
                Direction::North => "w",
                Direction::East => "d",
                Direction::South => "s",
                Direction::West => "a",
            })
            .collect();
        script.extend(["bfs", "q"]);
        let input = script.join("\n");
        let mut out = Vec::new();

        game.play(input.as_bytes(), &mut out).expect("session runs");

        let text = output(out);
        assert!(text.contains("You escaped in"), "{text}");
        assert!(text.contains("Correct"), "{text}");
        assert_eq!(query::move_count(&game.world), solution.moves());
        assert_eq!(query::phase(&game.world), SessionPhase::Scored);
    }

    #[test]
    fn paused_players_cannot_move() {
        let mut game = Game::new(&config(4), Box::new(Unreachable)).expect("valid config");
        let mut out = Vec::new();

        game.play("p\nd\ns\n".as_bytes(), &mut out).expect("session runs");

        assert!(query::is_paused(&game.world));
        assert_eq!(query::move_count(&game.world), 0);
        assert!(output(out).contains("You cannot move right now."));
    }

    #[test]
    fn restart_generates_a_fresh_session() {
        let mut game = Game::new(&config(3), Box::new(Unreachable)).expect("valid config");
        let first = query::session_id(&game.world);
        let mut out = Vec::new();

        game.play("r\n".as_bytes(), &mut out).expect("session runs");

        assert_ne!(query::session_id(&game.world), first);
        assert_eq!(query::move_count(&game.world), 0);
    }
}
