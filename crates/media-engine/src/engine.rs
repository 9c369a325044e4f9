//! Live audio engine backed by files in a resource directory

use crate::decoder::AudioDecoder;
use crate::playback::{OutputTarget, PlaybackThread};
use crate::player::AudioPlayer;
use crate::{EngineError, EngineResult, PlaybackStatus};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::Mutex;

struct ActiveTrack {
    file_id: String,
    playback: PlaybackThread,
}

/// Resolves audio file identifiers under `resource_dir` and keeps one track active
///
/// Each active track owns a playback thread that decodes the file and feeds
/// the output; positions come from that thread's decoded-frame counter.
pub struct MediaEngine {
    resource_dir: PathBuf,
    output: OutputTarget,
    active: Mutex<Option<ActiveTrack>>,
}

impl MediaEngine {
    /// Engine playing through the default output device
    pub fn new(resource_dir: impl Into<PathBuf>) -> Self {
        Self::with_output(resource_dir, OutputTarget::Device)
    }

    pub fn with_output(resource_dir: impl Into<PathBuf>, output: OutputTarget) -> Self {
        Self {
            resource_dir: resource_dir.into(),
            output,
            active: Mutex::new(None),
        }
    }

    /// Status of the active track, `Stopped` when nothing is loaded
    pub async fn status(&self) -> PlaybackStatus {
        match self.active.lock().await.as_ref() {
            Some(track) if track.playback.is_playing() => PlaybackStatus::Playing,
            Some(_) => PlaybackStatus::Paused,
            None => PlaybackStatus::Stopped,
        }
    }

    /// Identifier of the active file
    pub async fn active_file(&self) -> Option<String> {
        self.active
            .lock()
            .await
            .as_ref()
            .map(|track| track.file_id.clone())
    }

    /// Duration of the active file in seconds
    pub async fn duration(&self) -> EngineResult<f64> {
        self.with_track(|track| Ok(track.playback.duration()))
            .await
    }

    async fn with_track<T>(
        &self,
        f: impl FnOnce(&ActiveTrack) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let active = self.active.lock().await;
        let track = active.as_ref().ok_or(EngineError::NoActivePlayer)?;
        f(track)
    }
}

fn check_rate(rate: f64) -> EngineResult<()> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidSpeed(rate))
    }
}

fn check_offset(seconds: f64) -> EngineResult<()> {
    if seconds.is_finite() && seconds >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidPosition(seconds))
    }
}

#[async_trait]
impl AudioPlayer for MediaEngine {
    async fn play(&self, file_id: &str, rate: f64) -> EngineResult<()> {
        check_rate(rate)?;

        let path = self.resource_dir.join(file_id);
        if !path.is_file() {
            return Err(EngineError::FileNotFound(file_id.to_string()));
        }

        let output = self.output;
        let playback = tokio::task::spawn_blocking(move || {
            let decoder = AudioDecoder::open(&path)?;
            PlaybackThread::start(decoder, output, rate)
        })
        .await
        .map_err(|e| EngineError::Initialization(format!("Playback start failed: {}", e)))??;

        log::info!(
            "Playing {} ({:.1}s) at {}x",
            file_id,
            playback.duration(),
            rate
        );

        let previous = self.active.lock().await.replace(ActiveTrack {
            file_id: file_id.to_string(),
            playback,
        });

        if let Some(previous) = previous {
            // Joining the old thread can wait on a block in flight
            let _ = tokio::task::spawn_blocking(move || drop(previous)).await;
        }
        Ok(())
    }

    async fn resume(&self, rate: f64) -> EngineResult<()> {
        check_rate(rate)?;
        self.with_track(|track| {
            track.playback.set_speed(rate)?;
            track.playback.set_playing(true);
            Ok(())
        })
        .await
    }

    async fn pause(&self) -> EngineResult<()> {
        self.with_track(|track| {
            track.playback.set_playing(false);
            Ok(())
        })
        .await
    }

    async fn seek(&self, fraction: f64) -> EngineResult<()> {
        if !(fraction.is_finite() && (0.0..=1.0).contains(&fraction)) {
            return Err(EngineError::InvalidPosition(fraction));
        }
        self.with_track(|track| {
            let target = fraction * track.playback.duration();
            track.playback.seek(target)
        })
        .await
    }

    async fn fast_forward(&self, seconds: f64) -> EngineResult<()> {
        check_offset(seconds)?;
        self.with_track(|track| {
            let target = track.playback.position() + seconds;
            track.playback.seek(target)
        })
        .await
    }

    async fn rewind(&self, seconds: f64) -> EngineResult<()> {
        check_offset(seconds)?;
        self.with_track(|track| {
            let target = track.playback.position() - seconds;
            track.playback.seek(target)
        })
        .await
    }

    async fn change_speed(&self, rate: f64) -> EngineResult<()> {
        check_rate(rate)?;
        self.with_track(|track| track.playback.set_speed(rate))
            .await
    }

    async fn current_time(&self) -> EngineResult<f64> {
        self.with_track(|track| Ok(track.playback.position()))
            .await
    }
}
