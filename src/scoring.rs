use crate::types::Placement;

/// Counts shared letters across a set of placements: every cell covered by
/// `n > 1` words adds `n - 1`. Rebuilt from scratch on every call.
pub fn overlap_score(rows: usize, cols: usize, placements: &[Placement]) -> usize {
    if placements.is_empty() {
        return 0;
    }

    let mut usage = vec![0usize; rows * cols];
    for p in placements {
        for (r, c) in p.cells() {
            if r >= 0 && c >= 0 && (r as usize) < rows && (c as usize) < cols {
                usage[r as usize * cols + c as usize] += 1;
            }
        }
    }

    usage.iter().map(|&n| n.saturating_sub(1)).sum()
}
