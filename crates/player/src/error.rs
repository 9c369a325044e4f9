// FILE: crates/player/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    #[error("Player store has shut down")]
    StoreClosed,
}

pub type PlayerResult<T> = std::result::Result<T, PlayerError>;
