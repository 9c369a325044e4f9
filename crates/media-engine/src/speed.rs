//! Playback rate processing
//!
//! Rates other than 1.0 are applied with windowed overlap-add so speech keeps
//! its pitch. Overlap that spills past the end of one block is carried into
//! the next, which keeps block boundaries free of amplitude dips.

const NORMAL: f64 = 1.0;

/// Time-stretches interleaved blocks by a playback rate
pub struct SpeedProcessor {
    channels: usize,
    rate: f64,
    window: Vec<f32>,
    tail: Vec<Vec<f32>>,
    carry: f64,
    grain: usize,
}

impl SpeedProcessor {
    pub fn new(sample_rate: u32, channels: usize) -> Self {
        // About 20ms per grain, even length so the half hop sums to unity
        let len = ((sample_rate as usize / 50).max(64) + 1) & !1;
        Self {
            channels: channels.max(1),
            rate: NORMAL,
            window: hann_window(len),
            tail: vec![Vec::new(); channels.max(1)],
            carry: 0.0,
            grain: 0,
        }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Changes the rate, dropping any overlap from the previous rate
    pub fn set_rate(&mut self, rate: f64) {
        if (rate - self.rate).abs() > f64::EPSILON {
            self.rate = rate;
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        self.tail.iter_mut().for_each(|t| t.clear());
        self.carry = 0.0;
        self.grain = 0;
    }

    /// Returns `input` stretched to roughly `input.len() / rate` samples
    pub fn process(&mut self, input: &[f32]) -> Vec<f32> {
        if input.is_empty() || (self.rate - NORMAL).abs() < f64::EPSILON {
            return input.to_vec();
        }

        let in_frames = input.len() / self.channels;
        let exact = in_frames as f64 / self.rate + self.carry;
        let out_frames = exact.floor() as usize;
        self.carry = exact - out_frames as f64;

        let start = self.grain;
        let mut next = start;
        let mut planes = Vec::with_capacity(self.channels);
        for channel in 0..self.channels {
            let plane: Vec<f32> = input
                .iter()
                .skip(channel)
                .step_by(self.channels)
                .copied()
                .collect();
            let (stretched, grain) = self.stretch(channel, &plane, start, out_frames);
            planes.push(stretched);
            next = grain;
        }
        self.grain = next;

        let mut output = Vec::with_capacity(out_frames * self.channels);
        for frame in 0..out_frames {
            for plane in &planes {
                output.push(plane[frame]);
            }
        }
        output
    }

    /// Overlap-adds grains from `start` onward, returning where the next block's grid begins
    fn stretch(
        &mut self,
        channel: usize,
        input: &[f32],
        start: usize,
        out_frames: usize,
    ) -> (Vec<f32>, usize) {
        let hop = self.window.len() / 2;
        let mut out = vec![0.0; out_frames + self.window.len()];

        let tail = std::mem::take(&mut self.tail[channel]);
        for (slot, sample) in out.iter_mut().zip(tail) {
            *slot += sample;
        }

        // Grains never read past the block; short blocks repeat their last sample
        let last = input.len().saturating_sub(1);
        let latest_start = input.len().saturating_sub(self.window.len());

        let mut out_pos = start;
        while out_pos < out_frames {
            let in_pos = ((out_pos as f64 * self.rate) as usize).min(latest_start);
            for (i, weight) in self.window.iter().enumerate() {
                let sample = input.get((in_pos + i).min(last)).copied().unwrap_or(0.0);
                out[out_pos + i] += sample * weight;
            }
            out_pos += hop;
        }

        self.tail[channel] = out.split_off(out_frames);
        (out, out_pos - out_frames)
    }
}

/// Periodic Hann window; copies spaced half a window apart sum to one
fn hann_window(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * i as f32 / len as f32;
            0.5 * (1.0 - phase.cos())
        })
        .collect()
}
