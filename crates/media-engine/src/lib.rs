//! Media Engine - audio playback for StoryStream
//!
//! [`AudioPlayer`] is the interface the player state machine drives;
//! [`MediaEngine`] is the live implementation over files in a resource directory.
//! Files are decoded with symphonia on a playback thread, time-stretched to
//! the requested rate and played through cpal.

mod decoder;
mod engine;
mod error;
mod output;
mod playback;
mod player;
mod speed;

pub use decoder::AudioDecoder;
pub use engine::MediaEngine;
pub use playback::OutputTarget;
pub use speed::SpeedProcessor;
pub use error::{EngineError, EngineResult};
pub use player::AudioPlayer;
#[cfg(any(test, feature = "testing"))]
pub use player::MockAudioPlayer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Playing,
    Paused,
    Stopped,
}
