use thiserror::Error;

use crate::types::WordEntry;

/// Smallest side length used when the grid size is estimated.
pub const MIN_ESTIMATED_SIDE: usize = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Provide words one per line. Prefix * for must-include words.")]
    NoInput,
    #[error("No valid words found after normalization.")]
    NoValidWords,
    #[error("grid {rows}x{cols} exceeds the {max}x{max} limit")]
    GridTooLarge { rows: usize, cols: usize, max: usize },
}

pub fn normalize_word(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Parses a single raw line; `None` for blank lines and lines with no letters.
///
/// A leading `*` marks the word as required. Anything that is not an ASCII
/// letter is dropped and the rest uppercased, so `*ice-cream` becomes the
/// required word `ICECREAM`.
pub fn parse_word(line: &str) -> Option<WordEntry> {
    let line = line.trim_matches(|c| c == ' ' || c == '\t' || c == '\r');
    let (required, rest) = match line.strip_prefix('*') {
        Some(rest) => (true, rest),
        None => (false, line),
    };
    let text = normalize_word(rest);
    (!text.is_empty()).then(|| WordEntry::new(text, required))
}

pub fn parse_word_lines(text: &str) -> Result<Vec<WordEntry>, InputError> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return Err(InputError::NoInput);
    }
    dedup_words(lines.into_iter().filter_map(parse_word))
}

/// Merges repeated words, keeping the first position. A word is required if
/// any of its copies was.
pub fn dedup_words(words: impl IntoIterator<Item = WordEntry>) -> Result<Vec<WordEntry>, InputError> {
    let mut out: Vec<WordEntry> = Vec::new();
    for w in words {
        match out.iter_mut().find(|seen| seen.text == w.text) {
            Some(seen) => seen.required |= w.required,
            None => out.push(w),
        }
    }
    if out.is_empty() {
        return Err(InputError::NoValidWords);
    }
    Ok(out)
}

/// Side of a square grid that comfortably holds `words`.
pub fn estimate_grid_size(words: &[WordEntry]) -> usize {
    let longest = words.iter().map(WordEntry::len).max().unwrap_or(0);
    let total: usize = words.iter().map(WordEntry::len).sum();
    let estimated = longest.max((total as f64).sqrt().ceil() as usize + 2);
    estimated.max(MIN_ESTIMATED_SIDE)
}

/// Zero means "not given". Both given are used as-is; if either is missing the
/// grid falls back to a square of [`estimate_grid_size`].
pub fn resolve_dimensions(rows: usize, cols: usize, words: &[WordEntry]) -> (usize, usize) {
    if rows == 0 || cols == 0 {
        let side = estimate_grid_size(words);
        (side, side)
    } else {
        (rows, cols)
    }
}

/// Rejects grids with a side longer than `max`.
pub fn check_grid_size(rows: usize, cols: usize, max: usize) -> Result<(usize, usize), InputError> {
    if rows > max || cols > max {
        return Err(InputError::GridTooLarge { rows, cols, max });
    }
    Ok((rows, cols))
}
