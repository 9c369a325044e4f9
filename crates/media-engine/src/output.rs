// FILE: crates/media-engine/src/output.rs

use crate::error::{EngineError, EngineResult};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, Stream, StreamConfig};
use crossbeam_channel::{Receiver, TryRecvError};

/// An open stream on the default output device
///
/// The stream pulls interleaved blocks from a channel and plays silence
/// whenever the decoder has nothing queued. Dropping it stops playback.
pub struct AudioOutput {
    _stream: Stream,
    device_name: String,
}

impl AudioOutput {
    pub fn open(sample_rate: u32, channels: u16, rx: Receiver<Vec<f32>>) -> EngineResult<Self> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or_else(|| EngineError::Initialization("No output device available".to_string()))?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let config = StreamConfig {
            channels,
            sample_rate: SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let mut buffer: Vec<f32> = Vec::new();
        let mut position = 0;
        let error_device = device_name.clone();

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for sample in data.iter_mut() {
                        if position >= buffer.len() {
                            match rx.try_recv() {
                                Ok(next) => {
                                    buffer = next;
                                    position = 0;
                                }
                                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {
                                    *sample = 0.0;
                                    continue;
                                }
                            }
                        }
                        *sample = buffer.get(position).copied().unwrap_or(0.0);
                        position += 1;
                    }
                },
                move |err| {
                    log::error!("Audio output error on device '{}': {}", error_device, err);
                },
                None,
            )
            .map_err(|e| EngineError::Initialization(format!("Failed to build stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| EngineError::Initialization(format!("Failed to start stream: {}", e)))?;

        log::info!(
            "Audio output open on '{}' ({} Hz, {} ch)",
            device_name,
            sample_rate,
            channels
        );

        Ok(Self {
            _stream: stream,
            device_name,
        })
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        log::debug!("Audio output closed on '{}'", self.device_name);
    }
}
