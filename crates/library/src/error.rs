// FILE: crates/library/src/error.rs

use thiserror::Error;

/// Failures while loading a book record
///
/// Payloads are plain strings so the error can be cloned and compared when it
/// travels through the player as an action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    #[error("Book not found: {identifier}")]
    NotFound { identifier: String },

    #[error("Failed to decode book: {0}")]
    Decode(String),

    #[error("Invalid book data: {0}")]
    InvalidData(String),
}

pub type LibraryResult<T> = std::result::Result<T, LibraryError>;
