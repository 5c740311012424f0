//! Engine errors
//!
//! Input-contract violations fail fast with no partial result. Table gaps
//! are deliberately not errors here: the engine logs and skips the affected
//! rule (see `cascade_tables::ConfigGap`), and every numeric computation is
//! guarded so reductions over empty sets return defined defaults.

use thiserror::Error;

/// Engine result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("vote vector must contain exactly {expected} entries, got {actual}")]
    InvalidVoteCount { expected: usize, actual: usize },

    #[error("invalid vote pattern {pattern:?}: {reason}")]
    InvalidVotePattern { pattern: String, reason: String },

    #[error("projection horizon must be at least 1 month")]
    InvalidHorizon,

    #[error("monte carlo requires at least 1 iteration")]
    InvalidIterations,
}
