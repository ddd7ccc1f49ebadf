use rand::Rng;

use crate::grid::Grid;

/// Gives every empty cell a uniformly random letter `A`-`Z`.
pub fn fill_random<R: Rng>(grid: &mut Grid, rng: &mut R) {
    grid.fill_empty_with(|| b'A' + rng.gen_range(0..26u8));
}
