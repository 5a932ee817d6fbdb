//! Error types.

use std::io;

use thiserror::Error;

/// Failures raised by [`Map`](crate::map::Map).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// Probing visited every slot without finding the key or a free slot.
    /// Growth keeps the load factor below 0.7, so this means the table is corrupt.
    #[error("no free slot in a table of {capacity} slots")]
    Full { capacity: usize },
}

/// Failures raised while aggregating charges.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("no data: cannot select extremes from an empty input")]
    NoData,
    #[error(transparent)]
    Table(#[from] MapError),
}

/// Failures raised while reading a charge file.
#[derive(Debug, Error)]
pub enum ChargeFileError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("malformed charge line: {0:?}")]
    Malformed(String),
    #[error("parser task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
