//! Error types for suffix tree construction.

use thiserror::Error;

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while feeding symbols into a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// An input symbol converted to the alphabet's reserved terminator.
    #[error("input symbol equals the alphabet terminator")]
    InvalidSymbol,

    /// The tree was already terminated.
    #[error("suffix tree is already terminated")]
    AlreadyTerminated,
}
