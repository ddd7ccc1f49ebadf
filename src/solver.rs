use std::time::{Duration, Instant};

use tracing::{debug, info, info_span};

use crate::grid::Grid;
use crate::scoring::overlap_score;
use crate::types::{Placement, PuzzleResult, SearchStats, WordEntry};

/// Fixed for the lifetime of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    pub rows: usize,
    pub cols: usize,
    pub time_limit: Duration,
}

impl SolverConfig {
    pub fn new(rows: usize, cols: usize, time_limit: Duration) -> Self {
        Self {
            rows,
            cols,
            time_limit,
        }
    }
}

pub struct Solver {
    config: SolverConfig,
    words: Vec<WordEntry>,
}

/// Convenience wrapper around [`Solver`] for callers holding plain values.
pub fn solve(words: &[WordEntry], rows: usize, cols: usize, time_limit: Duration) -> PuzzleResult {
    Solver::new(SolverConfig::new(rows, cols, time_limit), words.to_vec()).solve()
}

impl Solver {
    /// Panics if `words` is empty, any word is not plain `A-Z`, or the grid
    /// has a zero dimension. Input is expected to come through `prep`.
    pub fn new(config: SolverConfig, words: Vec<WordEntry>) -> Self {
        assert!(!words.is_empty(), "at least one word is required");
        assert!(
            config.rows > 0 && config.cols > 0,
            "grid dimensions must be non-zero"
        );
        for w in &words {
            assert!(
                !w.is_empty() && w.text.bytes().all(|b| b.is_ascii_uppercase()),
                "word {:?} is not normalized",
                w.text
            );
        }
        Self { config, words }
    }

    pub fn solve(&self) -> PuzzleResult {
        let span = info_span!(
            "solve",
            rows = self.config.rows,
            cols = self.config.cols,
            words = self.words.len()
        );
        let _enter = span.enter();

        let order = word_order(&self.words);
        let mut search = Search::new(&self.config, &self.words, &order);
        let root = Grid::new(self.config.rows, self.config.cols);
        search.recurse(0, &root, &mut Vec::new(), &mut Vec::new());

        let mut stats = search.stats;
        stats.elapsed = search.start.elapsed();
        let result = self.to_result(search.best, stats);

        info!(
            placed = result.placed_count,
            unplaced = result.unplaced_words.len(),
            overlap = result.overlap_score,
            nodes = stats.nodes,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            timed_out = stats.timed_out,
            "search finished"
        );
        result
    }

    fn to_result(&self, best: Best, stats: SearchStats) -> PuzzleResult {
        let mut placed = vec![false; self.words.len()];
        for &i in &best.word_indices {
            placed[i] = true;
        }

        let (placed_words, unplaced_words) = self
            .words
            .iter()
            .zip(&placed)
            .fold((Vec::new(), Vec::new()), |(mut yes, mut no), (w, &is_placed)| {
                if is_placed {
                    yes.push(w.text.clone());
                } else {
                    no.push(w.text.clone());
                }
                (yes, no)
            });

        PuzzleResult {
            grid: best.grid,
            placements: best.placements,
            placed_words,
            unplaced_words,
            placed_count: best.placed_count,
            overlap_score: best.overlap_score,
            stats,
        }
    }
}

/// Attempt order as indices into `words`: required before optional, longest
/// first within each group. Equal lengths go to the later input index first.
pub fn word_order(words: &[WordEntry]) -> Vec<usize> {
    let mut order = Vec::with_capacity(words.len());
    for required in [true, false] {
        let mut group: Vec<(usize, usize)> = words
            .iter()
            .enumerate()
            .filter(|(_, w)| w.required == required)
            .map(|(i, w)| (w.len(), i))
            .collect();
        group.sort_by(|a, b| b.cmp(a));
        order.extend(group.into_iter().map(|(_, i)| i));
    }
    order
}

/// Best solution seen so far. Owns its own copies so backtracking never
/// touches it.
struct Best {
    grid: Grid,
    placements: Vec<Placement>,
    word_indices: Vec<usize>,
    placed_count: usize,
    overlap_score: usize,
}

struct Search<'a> {
    config: &'a SolverConfig,
    words: &'a [WordEntry],
    order: &'a [usize],
    start: Instant,
    best: Best,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    fn new(config: &'a SolverConfig, words: &'a [WordEntry], order: &'a [usize]) -> Self {
        Self {
            config,
            words,
            order,
            start: Instant::now(),
            best: Best {
                grid: Grid::new(config.rows, config.cols),
                placements: Vec::new(),
                word_indices: Vec::new(),
                placed_count: 0,
                overlap_score: 0,
            },
            stats: SearchStats::default(),
        }
    }

    fn expired(&mut self) -> bool {
        if self.start.elapsed() >= self.config.time_limit {
            self.stats.timed_out = true;
        }
        self.stats.timed_out
    }

    fn recurse(
        &mut self,
        idx: usize,
        grid: &Grid,
        path: &mut Vec<Placement>,
        placed: &mut Vec<usize>,
    ) {
        if self.expired() {
            return;
        }
        self.stats.nodes += 1;

        let placed_count = path.len();
        let overlap = overlap_score(self.config.rows, self.config.cols, path);
        if (placed_count, overlap) > (self.best.placed_count, self.best.overlap_score) {
            debug!(placed = placed_count, overlap, depth = idx, "new best");
            self.best = Best {
                grid: grid.clone(),
                placements: path.clone(),
                word_indices: placed.clone(),
                placed_count,
                overlap_score: overlap,
            };
        }

        if idx >= self.order.len() {
            return;
        }

        // Bound on word count only; overlap is never used to prune.
        let remaining = self.order.len() - idx;
        if placed_count + remaining <= self.best.placed_count {
            return;
        }

        let words = self.words;
        let word_idx = self.order[idx];
        let word = words[word_idx].text.as_str();

        for cand in grid.candidates(word.as_bytes()) {
            if self.expired() {
                return;
            }
            self.stats.candidates_tried += 1;

            let placement = cand.to_placement(word);
            let mut next = grid.clone();
            next.place(&placement);
            path.push(placement);
            placed.push(word_idx);

            self.recurse(idx + 1, &next, path, placed);

            placed.pop();
            path.pop();
        }

        // Leaving the word out is always the last alternative
        if !self.expired() {
            self.recurse(idx + 1, grid, path, placed);
        }
    }
}
