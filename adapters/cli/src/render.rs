//! ASCII rendering of a maze and the player's position.

use std::fmt::Write as _;

use labyrinth_core::{CellCoord, Direction, Maze};
use labyrinth_system_pathfinding::Path;

const PLAYER: &str = " @ ";
const EXIT: &str = " E ";
const HINT: &str = " . ";
const EMPTY: &str = "   ";

/// Draws `maze` with the player at `player`, dotting the cells of `hint`.
///
/// Cells are three characters wide, corners are `+`, walls are `|` and `---`.
#[must_use]
pub(crate) fn render(maze: &Maze, player: CellCoord, hint: &Path) -> String {
    let size = maze.size();
    let mut out = String::new();

    out.push('+');
    for _ in 0..size {
        out.push_str("---+");
    }
    out.push('\n');

    for row in 0..size {
        out.push('|');
        for column in 0..size {
            let cell = CellCoord::new(column, row);
            out.push_str(glyph(maze, cell, player, hint));
            out.push(if is_open(maze, cell, Direction::East) {
                ' '
            } else {
                '|'
            });
        }
        out.push('\n');

        out.push('+');
        for column in 0..size {
            let cell = CellCoord::new(column, row);
            out.push_str(if is_open(maze, cell, Direction::South) {
                "   +"
            } else {
                "---+"
            });
        }
        out.push('\n');
    }

    out
}

/// One-line status shown under the maze.
#[must_use]
pub(crate) fn status_line(moves: u32, elapsed_seconds: u64, paused: bool) -> String {
    let mut line = String::new();
    let _ = write!(line, "moves: {moves}  time: {elapsed_seconds}s");
    if paused {
        line.push_str("  [paused]");
    }
    line
}

fn glyph(maze: &Maze, cell: CellCoord, player: CellCoord, hint: &Path) -> &'static str {
    if cell == player {
        PLAYER
    } else if cell == maze.exit() {
        EXIT
    } else if hint.contains(cell) {
        HINT
    } else {
        EMPTY
    }
}

fn is_open(maze: &Maze, cell: CellCoord, direction: Direction) -> bool {
    maze.open_towards(cell, direction).unwrap_or(false)
}
