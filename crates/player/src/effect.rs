// FILE: crates/player/src/effect.rs

use crate::action::Action;
use media_engine::{AudioPlayer, EngineResult};

/// Identity of a long-running effect; starting one with the same id replaces it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectId {
    Progress,
}

/// A side effect requested by the reducer, executed by the store runtime
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Ask the loader for a book; completes with `BookLoaded`
    LoadBook { identifier: String },
    /// Run an engine operation; a failure comes back as `PlaybackErrored`
    Engine(EngineCommand),
    /// Start the progress poll loop under `EffectId::Progress`
    StartProgressLoop,
    Cancel(EffectId),
    /// Feed an action straight back in, ahead of anything already queued
    Send(Action),
}

/// One call on the audio engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Play { file_id: String, rate: f64 },
    Resume { rate: f64 },
    Pause,
    Seek(f64),
    FastForward(f64),
    Rewind(f64),
    ChangeSpeed(f64),
}

impl EngineCommand {
    pub async fn run(&self, engine: &dyn AudioPlayer) -> EngineResult<()> {
        match self {
            EngineCommand::Play { file_id, rate } => engine.play(file_id, *rate).await,
            EngineCommand::Resume { rate } => engine.resume(*rate).await,
            EngineCommand::Pause => engine.pause().await,
            EngineCommand::Seek(fraction) => engine.seek(*fraction).await,
            EngineCommand::FastForward(seconds) => engine.fast_forward(*seconds).await,
            EngineCommand::Rewind(seconds) => engine.rewind(*seconds).await,
            EngineCommand::ChangeSpeed(rate) => engine.change_speed(*rate).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_engine::{EngineError, MockAudioPlayer};
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_command_dispatch() {
        let mut engine = MockAudioPlayer::new();
        engine
            .expect_fast_forward()
            .with(eq(10.0))
            .times(1)
            .returning(|_| Ok(()));
        engine
            .expect_pause()
            .times(1)
            .returning(|| Err(EngineError::NoActivePlayer));

        assert!(EngineCommand::FastForward(10.0).run(&engine).await.is_ok());
        assert_eq!(
            EngineCommand::Pause.run(&engine).await,
            Err(EngineError::NoActivePlayer)
        );
    }
}
