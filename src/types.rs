use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::grid::Grid;

/// One of the eight unit steps a word can be written along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    pub dr: i32,
    pub dc: i32,
}

impl Direction {
    pub const fn new(dr: i32, dc: i32) -> Self {
        Self { dr, dc }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match (self.dr, self.dc) {
            (0, 1) => "E",
            (0, -1) => "W",
            (1, 0) => "S",
            (-1, 0) => "N",
            (1, 1) => "SE",
            (1, -1) => "SW",
            (-1, 1) => "NE",
            (-1, -1) => "NW",
            _ => "?",
        };
        f.write_str(name)
    }
}

/// Enumeration order matters: candidate ranking is stable with respect to it.
pub const DIRECTIONS: [Direction; 8] = [
    Direction::new(0, 1),
    Direction::new(0, -1),
    Direction::new(1, 0),
    Direction::new(-1, 0),
    Direction::new(1, 1),
    Direction::new(1, -1),
    Direction::new(-1, 1),
    Direction::new(-1, -1),
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordEntry {
    pub text: String,
    #[serde(default)]
    pub required: bool,
}

impl WordEntry {
    pub fn new(text: impl Into<String>, required: bool) -> Self {
        Self {
            text: text.into(),
            required,
        }
    }

    pub fn required(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    pub fn optional(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub word: String,
    pub row: usize,
    pub col: usize,
    pub delta_row: i32,
    pub delta_col: i32,
}

impl Placement {
    pub fn new(word: impl Into<String>, row: usize, col: usize, direction: Direction) -> Self {
        Self {
            word: word.into(),
            row,
            col,
            delta_row: direction.dr,
            delta_col: direction.dc,
        }
    }

    pub fn direction(&self) -> Direction {
        Direction::new(self.delta_row, self.delta_col)
    }

    /// Cells covered by the word, in letter order. Coordinates are signed so
    /// that callers can reject placements that walk off the grid.
    pub fn cells(&self) -> impl Iterator<Item = (isize, isize)> + '_ {
        let (r, c) = (self.row as isize, self.col as isize);
        let (dr, dc) = (self.delta_row as isize, self.delta_col as isize);
        (0..self.word.len() as isize).map(move |k| (r + k * dr, c + k * dc))
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} @ ({}, {}) {}",
            self.word,
            self.row,
            self.col,
            self.direction()
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub nodes: u64,
    pub candidates_tried: u64,
    pub timed_out: bool,
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

#[derive(Debug, Clone)]
pub struct PuzzleResult {
    pub grid: Grid,
    pub placements: Vec<Placement>,
    pub placed_words: Vec<String>,
    pub unplaced_words: Vec<String>,
    pub placed_count: usize,
    pub overlap_score: usize,
    pub stats: SearchStats,
}

impl PuzzleResult {
    pub fn all_placed(&self) -> bool {
        self.unplaced_words.is_empty()
    }

    pub fn report(&self) -> PuzzleReport {
        PuzzleReport {
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            grid: self.grid.to_lines(),
            placements: self.placements.clone(),
            placed_words: self.placed_words.clone(),
            unplaced_words: self.unplaced_words.clone(),
            placed_count: self.placed_count,
            overlap_score: self.overlap_score,
            stats: self.stats,
        }
    }
}

/// Wire shape shared by the CLI and the HTTP service.
#[derive(Debug, Clone, Serialize)]
pub struct PuzzleReport {
    pub rows: usize,
    pub cols: usize,
    pub grid: Vec<String>,
    pub placements: Vec<Placement>,
    pub placed_words: Vec<String>,
    pub unplaced_words: Vec<String>,
    pub placed_count: usize,
    pub overlap_score: usize,
    pub stats: SearchStats,
}
