use crate::types::{DIRECTIONS, Direction, Placement};

/// Sentinel for a cell no word has claimed yet.
pub const EMPTY: u8 = b'.';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

/// A feasible spot for a word together with how many letters it would share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub overlap: usize,
}

impl Candidate {
    /// Manhattan distance of the start cell from the grid center.
    pub fn center_distance(&self, rows: usize, cols: usize) -> usize {
        self.row.abs_diff(rows / 2) + self.col.abs_diff(cols / 2)
    }

    pub fn to_placement(&self, word: &str) -> Placement {
        Placement::new(word, self.row, self.col, self.direction)
    }
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "grid dimensions must be non-zero");
        Self {
            rows,
            cols,
            cells: vec![EMPTY; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, r: isize, c: isize) -> bool {
        r >= 0 && c >= 0 && (r as usize) < self.rows && (c as usize) < self.cols
    }

    fn index(&self, r: usize, c: usize) -> usize {
        assert!(
            r < self.rows && c < self.cols,
            "cell ({r}, {c}) outside {}x{} grid",
            self.rows,
            self.cols
        );
        r * self.cols + c
    }

    pub fn get(&self, r: usize, c: usize) -> u8 {
        self.cells[self.index(r, c)]
    }

    pub fn set(&mut self, r: usize, c: usize, letter: u8) {
        let idx = self.index(r, c);
        self.cells[idx] = letter;
    }

    pub fn empty_cells(&self) -> usize {
        self.cells.iter().filter(|&&b| b == EMPTY).count()
    }

    /// Returns the number of letters the word would share with the grid, or
    /// `None` if it runs off the edge or clashes with a different letter.
    pub fn can_place(&self, word: &[u8], row: usize, col: usize, dir: Direction) -> Option<usize> {
        let (mut r, mut c) = (row as isize, col as isize);
        let mut overlap = 0;
        for &ch in word {
            if !self.in_bounds(r, c) {
                return None;
            }
            let existing = self.cells[r as usize * self.cols + c as usize];
            if existing == ch {
                overlap += 1;
            } else if existing != EMPTY {
                return None;
            }
            r += dir.dr as isize;
            c += dir.dc as isize;
        }
        Some(overlap)
    }

    /// Writes a placement the caller already checked with [`Grid::can_place`].
    pub fn place(&mut self, placement: &Placement) {
        for ((r, c), &ch) in placement.cells().zip(placement.word.as_bytes()) {
            self.set(r as usize, c as usize, ch);
        }
    }

    /// Every feasible (cell, direction) for `word`, most shared letters first,
    /// then closest to the center. The sort is stable, so remaining ties keep
    /// row-major, direction-table order.
    pub fn candidates(&self, word: &[u8]) -> Vec<Candidate> {
        let mut found = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                for &direction in &DIRECTIONS {
                    if let Some(overlap) = self.can_place(word, row, col, direction) {
                        found.push(Candidate {
                            row,
                            col,
                            direction,
                            overlap,
                        });
                    }
                }
            }
        }

        let (rows, cols) = (self.rows, self.cols);
        found.sort_by(|a, b| {
            b.overlap
                .cmp(&a.overlap)
                .then_with(|| a.center_distance(rows, cols).cmp(&b.center_distance(rows, cols)))
        });
        found
    }

    pub fn fill_empty_with(&mut self, mut letter: impl FnMut() -> u8) {
        for cell in self.cells.iter_mut().filter(|c| **c == EMPTY) {
            *cell = letter();
        }
    }

    pub fn to_lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|&b| b as char).collect())
            .collect()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in self.to_lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EAST: Direction = Direction::new(0, 1);
    const SOUTH: Direction = Direction::new(1, 0);

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(3, 4);
        assert_eq!(grid.empty_cells(), 12);
        assert_eq!(grid.to_lines(), vec!["....", "....", "...."]);
    }

    #[test]
    fn test_in_bounds() {
        let grid = Grid::new(2, 3);
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(1, 2));
        assert!(!grid.in_bounds(-1, 0));
        assert!(!grid.in_bounds(0, 3));
        assert!(!grid.in_bounds(2, 0));
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_bounds_panics() {
        let grid = Grid::new(2, 2);
        grid.get(2, 0);
    }

    #[test]
    fn test_place_single_word() {
        let mut grid = Grid::new(3, 3);
        assert_eq!(grid.can_place(b"CAT", 0, 0, EAST), Some(0));
        grid.place(&Placement::new("CAT", 0, 0, EAST));
        assert_eq!(grid.to_lines(), vec!["CAT", "...", "..."]);
    }

    #[test]
    fn test_word_too_long() {
        let grid = Grid::new(3, 3);
        assert_eq!(grid.can_place(b"CATS", 0, 0, EAST), None);
        assert_eq!(grid.can_place(b"CAT", 0, 1, EAST), None);
        assert_eq!(grid.can_place(b"CAT", 1, 0, Direction::new(-1, 0)), None);
    }

    #[test]
    fn test_overlap_and_conflict() {
        let mut grid = Grid::new(3, 3);
        grid.place(&Placement::new("CAT", 0, 0, EAST));
        // Shares the C
        assert_eq!(grid.can_place(b"CAR", 0, 0, SOUTH), Some(1));
        // Lies exactly on top of CAT
        assert_eq!(grid.can_place(b"CAT", 0, 0, EAST), Some(3));
        // D against C
        assert_eq!(grid.can_place(b"DOG", 0, 0, SOUTH), None);
    }

    #[test]
    fn test_can_place_is_pure() {
        let mut grid = Grid::new(4, 4);
        grid.place(&Placement::new("ARC", 1, 0, EAST));
        let before = grid.clone();
        let first = grid.can_place(b"CAR", 1, 2, Direction::new(1, -1));
        let second = grid.can_place(b"CAR", 1, 2, Direction::new(1, -1));
        assert_eq!(first, second);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_candidates_rank_overlap_then_center() {
        let mut grid = Grid::new(5, 5);
        grid.place(&Placement::new("CAT", 2, 1, EAST));
        let cands = grid.candidates(b"CAR");
        assert!(!cands.is_empty());
        for pair in cands.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(a.overlap >= b.overlap);
            if a.overlap == b.overlap {
                assert!(a.center_distance(5, 5) <= b.center_distance(5, 5));
            }
        }
        // CA shared with CAT, continuing east would hit T
        assert!(cands[0].overlap >= 1);
        for c in &cands {
            assert_eq!(grid.can_place(b"CAR", c.row, c.col, c.direction), Some(c.overlap));
        }
    }

    #[test]
    fn test_candidates_ties_keep_enumeration_order() {
        // On a 1x1 grid a one-letter word fits in every direction at distance 0
        let grid = Grid::new(1, 1);
        let cands = grid.candidates(b"A");
        let dirs: Vec<_> = cands.iter().map(|c| c.direction).collect();
        assert_eq!(dirs, DIRECTIONS.to_vec());
    }

    #[test]
    fn test_candidates_empty_when_word_cannot_fit() {
        let grid = Grid::new(3, 3);
        assert!(grid.candidates(b"AAAAAAAAAAAAAAAAAAAAA").is_empty());
    }

    #[test]
    fn test_fill_empty_leaves_letters() {
        let mut grid = Grid::new(2, 2);
        grid.place(&Placement::new("AB", 0, 0, EAST));
        grid.fill_empty_with(|| b'Z');
        assert_eq!(grid.to_lines(), vec!["AB", "ZZ"]);
        assert_eq!(grid.empty_cells(), 0);
    }
}
