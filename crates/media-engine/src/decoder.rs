// FILE: crates/media-engine/src/decoder.rs

use crate::error::{EngineError, EngineResult};
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, SampleBuffer, SignalSpec};
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::Time;

/// Decodes the default track of an audio file into interleaved `f32` samples
///
/// Opening decodes the first packet, so a file that probes fine but carries
/// no audio is rejected up front instead of when playback reaches it.
pub struct AudioDecoder {
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    spec: SignalSpec,
    duration: f64,
    pending: Option<Vec<f32>>,
    skip_frames: u64,
}

impl AudioDecoder {
    pub fn open(path: &Path) -> EngineResult<Self> {
        let reader = open_reader(path)?;

        let track = reader
            .default_track()
            .ok_or_else(|| EngineError::Initialization("No audio track found".to_string()))?;

        let track_id = track.id;
        let params = track.codec_params.clone();

        let decoder = symphonia::default::get_codecs()
            .make(&params, &DecoderOptions::default())
            .map_err(|e| EngineError::Initialization(format!("Failed to create decoder: {}", e)))?;

        let channels = params
            .channels
            .filter(|channels| channels.count() > 0)
            .ok_or_else(|| EngineError::Initialization("Channel layout is unknown".to_string()))?;
        let spec = SignalSpec::new(params.sample_rate.unwrap_or(44100), channels);

        let duration = match (params.n_frames, params.time_base) {
            (Some(frames), Some(time_base)) => seconds(time_base.calc_time(frames)),
            (Some(frames), None) => frames as f64 / spec.rate as f64,
            _ => scan_duration(path, track_id, spec.rate)?,
        };

        let mut audio = Self {
            reader,
            decoder,
            track_id,
            spec,
            duration,
            pending: None,
            skip_frames: 0,
        };

        audio.pending = Some(audio.read_packet()?.ok_or_else(|| {
            EngineError::Initialization("File contains no decodable audio".to_string())
        })?);

        Ok(audio)
    }

    pub fn spec(&self) -> SignalSpec {
        self.spec
    }

    pub fn channels(&self) -> usize {
        self.spec.channels.count()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Next block of interleaved samples, `None` at end of stream
    pub fn decode_next(&mut self) -> EngineResult<Option<Vec<f32>>> {
        if let Some(samples) = self.pending.take() {
            return Ok(Some(samples));
        }
        self.read_packet()
    }

    pub fn seek(&mut self, time_secs: f64) -> EngineResult<()> {
        let time = Time::from(time_secs.max(0.0));
        let seeked = self
            .reader
            .seek(
                SeekMode::Accurate,
                SeekTo::Time {
                    time,
                    track_id: Some(self.track_id),
                },
            )
            .map_err(|e| {
                log::warn!("Seek to {:.1}s failed: {}", time_secs, e);
                EngineError::InvalidPosition(time_secs)
            })?;

        // Readers land on a packet boundary at or before the target
        self.decoder.reset();
        self.pending = None;
        self.skip_frames = seeked.required_ts.saturating_sub(seeked.actual_ts);
        Ok(())
    }

    fn read_packet(&mut self) -> EngineResult<Option<Vec<f32>>> {
        loop {
            let packet = match self.reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return Ok(None);
                }
                Err(e) => {
                    return Err(EngineError::Initialization(format!(
                        "Failed to read packet: {}",
                        e
                    )));
                }
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            match self.decoder.decode(&packet) {
                Ok(decoded) => {
                    let frames = decoded.frames() as u64;
                    if frames <= self.skip_frames {
                        self.skip_frames -= frames;
                        continue;
                    }
                    let mut samples = interleave(decoded);
                    let skip = std::mem::take(&mut self.skip_frames) as usize;
                    samples.drain(..skip * self.spec.channels.count());
                    return Ok(Some(samples));
                }
                Err(SymphoniaError::DecodeError(e)) => {
                    log::warn!("Decode error, skipping packet: {}", e);
                }
                Err(e) => {
                    return Err(EngineError::Initialization(format!(
                        "Failed to decode packet: {}",
                        e
                    )));
                }
            }
        }
    }
}

fn open_reader(path: &Path) -> EngineResult<Box<dyn FormatReader>> {
    let file = std::fs::File::open(path)
        .map_err(|e| EngineError::Initialization(format!("Failed to open file: {}", e)))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| EngineError::Initialization(format!("Failed to probe format: {}", e)))?;

    Ok(probed.format)
}

/// Sums packet durations for containers that do not declare a frame count
fn scan_duration(path: &Path, track_id: u32, sample_rate: u32) -> EngineResult<f64> {
    let mut reader = open_reader(path)?;
    let time_base = reader
        .tracks()
        .iter()
        .find(|t| t.id == track_id)
        .and_then(|t| t.codec_params.time_base);

    let mut total: u64 = 0;
    loop {
        match reader.next_packet() {
            Ok(packet) if packet.track_id() == track_id => total += packet.dur(),
            Ok(_) => {}
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(e) => {
                return Err(EngineError::Initialization(format!(
                    "Failed to measure track: {}",
                    e
                )))
            }
        }
    }

    Ok(match time_base {
        Some(time_base) => seconds(time_base.calc_time(total)),
        None => total as f64 / sample_rate as f64,
    })
}

fn seconds(time: Time) -> f64 {
    time.seconds as f64 + time.frac
}

fn interleave(decoded: AudioBufferRef<'_>) -> Vec<f32> {
    let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
    buffer.copy_interleaved_ref(decoded);
    buffer.samples().to_vec()
}
