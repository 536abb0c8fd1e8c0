use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::StockRow;

pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Up to `n` distinct rows picked uniformly at random, in random order.
pub fn random_sample<R: Rng + ?Sized>(rows: &[StockRow], n: usize, rng: &mut R) -> Vec<StockRow> {
    rows.choose_multiple(rng, n).cloned().collect()
}
