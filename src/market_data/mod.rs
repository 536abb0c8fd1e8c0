pub mod mock;
pub mod store;

pub use mock::{seed_store, Listing};
pub use store::StockStore;
