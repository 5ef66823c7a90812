//! Error types for omux.

use thiserror::Error;

/// Errors reported by the collator and task writers.
///
/// Every variant is a usage error raised synchronously at the call that
/// violates the contract. None of them is transient: retrying the same
/// call always fails the same way.
#[derive(Error, Debug)]
pub enum Error {
    /// A task with this name was already registered during this run
    #[error("task already registered: {name}")]
    DuplicateTask { name: String },

    /// Write through a writer that has already been closed
    #[error("write to closed task: {name}")]
    ClosedWriter { name: String },

    /// Close of a writer that has already been closed
    #[error("task already closed: {name}")]
    AlreadyClosed { name: String },
}

/// Result type alias for omux.
pub type Result<T> = std::result::Result<T, Error>;
