//! Per-card charge aggregation on a custom open-addressing hash table,
//! benchmarked against a std-style hash map.

pub mod aggregate;
pub mod charge;
pub mod charge_file;
pub mod config;
mod error;
pub mod generator;
pub mod logger;
pub mod map;
pub mod parallel;
mod parser;
pub mod prime;
pub mod summary;

pub use aggregate::{aggregate, aggregate_builtin, Aggregator};
pub use charge::Charge;
pub use config::HarnessConfig;
pub use error::{AggregateError, ChargeFileError, MapError};
pub use map::Map;
pub use parallel::aggregate_partitioned;
pub use prime::next_prime;
pub use summary::{Extreme, SummaryRecord};
