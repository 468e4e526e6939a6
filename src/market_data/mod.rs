pub mod bar;
pub mod provider;
pub mod yahoo;

// Re-export the core types for convenient access (e.g. `use crate::market_data::Series`).
pub use bar::{Bar, Series};
pub use provider::{fetch, BarProvider, FetchOutcome, FetchRequest};
pub use yahoo::YahooClient;
