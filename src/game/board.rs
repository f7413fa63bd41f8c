// Board model: a flat, row-major cell array plus the winning-line rules for
// each supported board size. Everything here is pure and stateless.
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;
use strum_macros::EnumIter;

/// Board sizes a room may be created with
pub const SUPPORTED_SIZES: [usize; 2] = [3, 5];

/// Size used when a client asks for anything unsupported
pub const DEFAULT_SIZE: usize = 3;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single board position; `None` is an empty cell
pub type Cell = Option<Mark>;

/// A completed line of identical marks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinningLine {
    pub mark: Mark,
    pub cells: Vec<usize>,
}

/// Clamps a requested board size to one we support
pub fn normalize_size(requested: i64) -> usize {
    SUPPORTED_SIZES
        .iter()
        .copied()
        .find(|size| *size as i64 == requested)
        .unwrap_or(DEFAULT_SIZE)
}

/// Number of identical marks in a row needed to win
pub fn run_length(size: usize) -> usize {
    if size == 5 {
        4
    } else {
        3
    }
}

/// Returns every winning line for the given board size.
///
/// Lines are ordered rows first, then columns, then down-right diagonals,
/// then down-left diagonals. Within each group they follow row-major order
/// of their first cell. Supported sizes are computed once and cached.
pub fn winning_combinations(size: usize) -> Cow<'static, [Vec<usize>]> {
    static THREE: OnceLock<Vec<Vec<usize>>> = OnceLock::new();
    static FIVE: OnceLock<Vec<Vec<usize>>> = OnceLock::new();

    match size {
        3 => Cow::Borrowed(THREE.get_or_init(|| generate_combinations(3)).as_slice()),
        5 => Cow::Borrowed(FIVE.get_or_init(|| generate_combinations(5)).as_slice()),
        other => Cow::Owned(generate_combinations(other)),
    }
}

fn generate_combinations(size: usize) -> Vec<Vec<usize>> {
    let run = run_length(size);
    if size < run {
        return Vec::new();
    }
    let span = size - run;
    let mut lines = Vec::new();

    for row in 0..size {
        for start in 0..=span {
            lines.push((0..run).map(|i| row * size + start + i).collect());
        }
    }

    for col in 0..size {
        for start in 0..=span {
            lines.push((0..run).map(|i| (start + i) * size + col).collect());
        }
    }

    for row in 0..=span {
        for col in 0..=span {
            lines.push((0..run).map(|i| (row + i) * size + col + i).collect());
        }
    }

    for row in 0..=span {
        for col in (run - 1)..size {
            lines.push((0..run).map(|i| (row + i) * size + col - i).collect());
        }
    }

    lines
}

/// Finds the first completed line on the board, if any.
///
/// When a single move completes several lines at once (possible on 5x5),
/// the earliest line in enumeration order is the one reported.
pub fn evaluate_winner(board: &[Cell], size: usize) -> Option<WinningLine> {
    winning_combinations(size).iter().find_map(|line| {
        let first = board.get(line[0]).copied().flatten()?;
        line.iter()
            .all(|&idx| board.get(idx).copied().flatten() == Some(first))
            .then(|| WinningLine {
                mark: first,
                cells: line.clone(),
            })
    })
}

/// True when no empty cell remains. Only meaningful once
/// `evaluate_winner` has come back empty.
pub fn is_draw(board: &[Cell]) -> bool {
    board.iter().all(Option::is_some)
}
