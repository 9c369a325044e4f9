// FILE: crates/media-engine/src/playback.rs

use crate::decoder::AudioDecoder;
use crate::error::{EngineError, EngineResult};
use crate::output::AudioOutput;
use crate::speed::SpeedProcessor;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Where decoded audio is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputTarget {
    /// The host's default output device
    #[default]
    Device,
    /// Audio is decoded and paced in real time, then dropped. For headless runs.
    Discard,
}

/// Commands sent to the playback thread
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlaybackCommand {
    Seek(f64),
    SetSpeed(f64),
    Stop,
}

/// Handle to the thread decoding one file
///
/// Position is stored as `f64` bits and advances by each decoded block's
/// length in source time, so playback rate never distorts it.
pub(crate) struct PlaybackThread {
    handle: Option<thread::JoinHandle<()>>,
    command_tx: Sender<PlaybackCommand>,
    playing: Arc<AtomicBool>,
    position: Arc<AtomicU64>,
    duration: f64,
}

impl PlaybackThread {
    /// Starts decoding `decoder` into `target` at `rate`, playing immediately
    ///
    /// Blocks until the output is open so device failures surface here.
    pub fn start(decoder: AudioDecoder, target: OutputTarget, rate: f64) -> EngineResult<Self> {
        let duration = decoder.duration();
        let playing = Arc::new(AtomicBool::new(true));
        let position = Arc::new(AtomicU64::new(0f64.to_bits()));
        let (command_tx, command_rx) = bounded(16);
        let (ready_tx, ready_rx) = bounded(1);

        let shared = Shared {
            playing: Arc::clone(&playing),
            position: Arc::clone(&position),
        };

        let handle = thread::Builder::new()
            .name("playback".to_string())
            .spawn(move || {
                let sink = match Sink::open(target, &decoder) {
                    Ok(sink) => {
                        let _ = ready_tx.send(Ok(()));
                        sink
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                playback_loop(decoder, sink, rate, command_rx, shared);
            })
            .map_err(|e| EngineError::Initialization(format!("Failed to spawn playback: {}", e)))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = handle.join();
                return Err(e);
            }
            Err(_) => {
                let _ = handle.join();
                return Err(EngineError::Initialization(
                    "Playback thread exited during startup".to_string(),
                ));
            }
        }

        Ok(Self {
            handle: Some(handle),
            command_tx,
            playing,
            position,
            duration,
        })
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Current position in seconds, clamped to `[0, duration]`
    pub fn position(&self) -> f64 {
        f64::from_bits(self.position.load(Ordering::Acquire)).clamp(0.0, self.duration)
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    pub fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::Release);
    }

    /// Moves to `seconds`, clamped to the track
    ///
    /// The position reads the target right away; the thread repositions the
    /// decoder before its next block.
    pub fn seek(&self, seconds: f64) -> EngineResult<()> {
        let target = seconds.clamp(0.0, self.duration);
        self.position.store(target.to_bits(), Ordering::Release);
        self.send(PlaybackCommand::Seek(target))
    }

    pub fn set_speed(&self, rate: f64) -> EngineResult<()> {
        self.send(PlaybackCommand::SetSpeed(rate))
    }

    fn send(&self, command: PlaybackCommand) -> EngineResult<()> {
        self.command_tx
            .send(command)
            .map_err(|_| EngineError::NoActivePlayer)
    }

    pub fn stop(&mut self) {
        let _ = self.command_tx.send(PlaybackCommand::Stop);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PlaybackThread {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Shared {
    playing: Arc<AtomicBool>,
    position: Arc<AtomicU64>,
}

impl Shared {
    fn advance(&self, seconds: f64) {
        let _ = self
            .position
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some((f64::from_bits(bits) + seconds).to_bits())
            });
    }
}

enum Sink {
    Device {
        _output: AudioOutput,
        tx: Sender<Vec<f32>>,
    },
    Discard {
        sample_rate: u32,
        channels: usize,
    },
}

impl Sink {
    fn open(target: OutputTarget, decoder: &AudioDecoder) -> EngineResult<Self> {
        let spec = decoder.spec();
        match target {
            OutputTarget::Device => {
                let (tx, rx) = bounded(4);
                let output = AudioOutput::open(spec.rate, decoder.channels() as u16, rx)?;
                Ok(Sink::Device {
                    _output: output,
                    tx,
                })
            }
            OutputTarget::Discard => Ok(Sink::Discard {
                sample_rate: spec.rate,
                channels: decoder.channels(),
            }),
        }
    }

    /// Hands a block to the output, waiting while the output is full.
    /// Returns `false` once the output has gone away.
    fn write(&self, samples: Vec<f32>) -> bool {
        match self {
            Sink::Device { tx, .. } => tx.send(samples).is_ok(),
            Sink::Discard {
                sample_rate,
                channels,
            } => {
                let frames = samples.len() / channels;
                thread::sleep(Duration::from_secs_f64(frames as f64 / *sample_rate as f64));
                true
            }
        }
    }
}

fn playback_loop(
    mut decoder: AudioDecoder,
    sink: Sink,
    rate: f64,
    command_rx: Receiver<PlaybackCommand>,
    shared: Shared,
) {
    let sample_rate = decoder.spec().rate as f64;
    let channels = decoder.channels();
    let mut speed = SpeedProcessor::new(decoder.spec().rate, channels);
    speed.set_rate(rate);

    loop {
        while let Ok(command) = command_rx.try_recv() {
            match command {
                PlaybackCommand::Seek(seconds) => {
                    speed.reset();
                    if decoder.seek(seconds).is_err() {
                        // Past the last seekable point counts as finished
                        shared.playing.store(false, Ordering::Release);
                    }
                }
                PlaybackCommand::SetSpeed(rate) => {
                    log::debug!("Playback rate {}x -> {}x", speed.rate(), rate);
                    speed.set_rate(rate);
                }
                PlaybackCommand::Stop => return,
            }
        }

        if !shared.playing.load(Ordering::Acquire) {
            thread::sleep(Duration::from_millis(10));
            continue;
        }

        match decoder.decode_next() {
            Ok(Some(samples)) => {
                let frames = samples.len() / channels;
                shared.advance(frames as f64 / sample_rate);
                if !sink.write(speed.process(&samples)) {
                    log::warn!("Audio output closed, stopping playback");
                    shared.playing.store(false, Ordering::Release);
                    return;
                }
            }
            Ok(None) => {
                log::info!("Playback reached end of track");
                shared.playing.store(false, Ordering::Release);
            }
            Err(e) => {
                log::error!("Playback stopped: {}", e);
                shared.playing.store(false, Ordering::Release);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::tests::write_silent_wav;
    use std::time::Instant;

    fn start(seconds: u32) -> (tempfile::TempDir, PlaybackThread) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ch1.wav");
        write_silent_wav(&path, seconds, 8000);
        let decoder = AudioDecoder::open(&path).unwrap();
        let thread = PlaybackThread::start(decoder, OutputTarget::Discard, 1.0).unwrap();
        (dir, thread)
    }

    fn wait_until(timeout: Duration, check: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if check() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        check()
    }

    #[test]
    fn test_position_advances_while_playing() {
        let (_dir, thread) = start(30);
        assert!(thread.is_playing());
        assert!(wait_until(Duration::from_secs(2), || thread.position() > 0.2));
        assert!(thread.position() < 5.0);
    }

    #[test]
    fn test_position_holds_while_paused() {
        let (_dir, thread) = start(30);
        thread.set_playing(false);
        // Let any block already in flight land
        std::thread::sleep(Duration::from_millis(300));

        let held = thread.position();
        std::thread::sleep(Duration::from_millis(200));
        assert_eq!(thread.position(), held);
    }

    #[test]
    fn test_seek_moves_position() {
        let (_dir, thread) = start(30);
        thread.set_playing(false);
        thread.seek(20.0).unwrap();
        assert!((thread.position() - 20.0).abs() < 0.5);

        thread.seek(100.0).unwrap();
        assert_eq!(thread.position(), 30.0);
    }

    #[test]
    fn test_track_end_stops_playing() {
        let (_dir, thread) = start(1);
        assert!(wait_until(Duration::from_secs(5), || !thread.is_playing()));
        assert!((thread.position() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_faster_rate_consumes_source_faster() {
        let (_dir, thread) = start(60);
        thread.set_speed(3.0).unwrap();

        let began = Instant::now();
        assert!(wait_until(Duration::from_secs(5), || thread.position() >= 3.0));
        // At 1x three seconds of source would take three seconds to play
        assert!(began.elapsed() < Duration::from_millis(2500));
    }

    #[test]
    fn test_stop_joins_thread() {
        let (_dir, mut thread) = start(30);
        thread.stop();
        assert_eq!(
            thread.set_speed(1.0),
            Err(EngineError::NoActivePlayer)
        );
    }
}
