//! Error types for squisher-common.

use thiserror::Error;

/// Common error type for squisher operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A fixed-width string field has no NUL in its final byte.
    #[error("{field} is not null terminated")]
    UnterminatedField { field: &'static str },

    /// A string does not fit in a fixed-width field with its terminator.
    #[error("{value:?} does not fit in a {capacity} byte field")]
    FieldTooLong { value: String, capacity: usize },

    /// Not enough bytes follow a checksum window to steer the register.
    #[error("checksum window at {offset} needs 4 bytes but the buffer is {len} bytes")]
    WindowOutOfBounds { offset: usize, len: usize },
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
