// =============================================================================
// Ranking Analytics
// =============================================================================
//
// Pure functions over snapshots of the stock table. Callers take the snapshot
// from `StockStore` and pass plain slices in, so nothing here holds a lock.

pub mod movers;
pub mod ranking;
pub mod sample;

pub use movers::movers;
pub use ranking::{interval_change_top_k, interval_close_top_k, IntervalWindow};
pub use sample::random_sample;
