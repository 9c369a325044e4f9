// FILE: crates/media-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("No active player")]
    NoActivePlayer,

    #[error("Audio file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to initialize player: {0}")]
    Initialization(String),

    #[error("Invalid speed: {0}")]
    InvalidSpeed(f64),

    #[error("Invalid position: {0}")]
    InvalidPosition(f64),
}

pub type EngineResult<T> = Result<T, EngineError>;
