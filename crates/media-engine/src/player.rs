//! The audio engine interface the player drives

use crate::EngineResult;
use async_trait::async_trait;

/// Playback primitives over a single active audio file
///
/// Every operation except `play` requires an active file and fails with
/// [`EngineError::NoActivePlayer`](crate::EngineError::NoActivePlayer) otherwise.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Loads `file_id` and starts it from the beginning at `rate`
    async fn play(&self, file_id: &str, rate: f64) -> EngineResult<()>;

    /// Continues the active file at `rate`
    async fn resume(&self, rate: f64) -> EngineResult<()>;

    async fn pause(&self) -> EngineResult<()>;

    /// Jumps to `fraction` of the file's duration
    async fn seek(&self, fraction: f64) -> EngineResult<()>;

    /// Skips forward, stopping at the end of the file
    async fn fast_forward(&self, seconds: f64) -> EngineResult<()>;

    /// Skips back, stopping at the start of the file
    async fn rewind(&self, seconds: f64) -> EngineResult<()>;

    async fn change_speed(&self, rate: f64) -> EngineResult<()>;

    /// Current position in seconds
    async fn current_time(&self) -> EngineResult<f64>;
}
