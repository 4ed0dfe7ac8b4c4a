use std::collections::HashMap;
use std::sync::Arc;

use crate::decoder::DecodedClip;
use crate::filter::{Biquad, BiquadCoeffs, LOWPASS_Q};

pub fn db_to_gain(db: f64) -> f32 {
    10f64.powf(db / 20.0) as f32
}

struct Voice {
    clip: Arc<DecodedClip>,
    /// Read position in source frames
    cursor: f64,
    playing: bool,
    gain: f32,
    cutoff_hz: f64,
    /// One per output channel
    filters: Vec<Biquad>,
}

impl Voice {
    /// Source sample for `channel` at the cursor, linearly interpolated
    fn sample_at(&self, channel: usize) -> f32 {
        let clip = &self.clip;
        let frames = clip.frames();
        let index = self.cursor.floor() as usize;
        let frac = (self.cursor - index as f64) as f32;
        let source_channel = channel % clip.channels;

        let current = clip.samples[index * clip.channels + source_channel];
        let next = if index + 1 < frames {
            clip.samples[(index + 1) * clip.channels + source_channel]
        } else {
            current
        };

        current + (next - current) * frac
    }
}

/// Every decoded clip registered with the engine, rendered into one
/// interleaved output buffer
pub struct Mixer {
    voices: HashMap<u64, Voice>,
    output_rate: u32,
    output_channels: usize,
}

impl Mixer {
    pub fn new(output_rate: u32, output_channels: usize) -> Self {
        Self {
            voices: HashMap::new(),
            output_rate: output_rate.max(1),
            output_channels: output_channels.max(1),
        }
    }

    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    pub fn output_channels(&self) -> usize {
        self.output_channels
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn add_voice(&mut self, id: u64, clip: Arc<DecodedClip>) {
        let cutoff_hz = self.output_rate as f64 / 2.0;
        let coeffs = self.coeffs(cutoff_hz);
        self.voices.insert(
            id,
            Voice {
                clip,
                cursor: 0.0,
                playing: false,
                gain: 1.0,
                cutoff_hz,
                filters: vec![Biquad::new(coeffs); self.output_channels],
            },
        );
    }

    pub fn remove_voice(&mut self, id: u64) -> bool {
        self.voices.remove(&id).is_some()
    }

    /// Start the voice at `offset` seconds into its clip
    pub fn play(&mut self, id: u64, offset: f64) -> bool {
        let Some(voice) = self.voices.get_mut(&id) else {
            return false;
        };

        voice.cursor = (offset.max(0.0) * voice.clip.sample_rate as f64)
            .min(voice.clip.frames() as f64);
        voice.playing = voice.clip.frames() > 0;
        voice.filters.iter_mut().for_each(Biquad::reset);
        true
    }

    pub fn stop(&mut self, id: u64) {
        if let Some(voice) = self.voices.get_mut(&id) {
            voice.playing = false;
        }
    }

    pub fn is_playing(&self, id: u64) -> bool {
        self.voices.get(&id).is_some_and(|v| v.playing)
    }

    pub fn set_gain_db(&mut self, id: u64, db: f64) {
        if let Some(voice) = self.voices.get_mut(&id) {
            voice.gain = db_to_gain(db);
        }
    }

    pub fn set_cutoff(&mut self, id: u64, hz: f64) {
        let coeffs = self.coeffs(hz);
        if let Some(voice) = self.voices.get_mut(&id) {
            voice.cutoff_hz = hz;
            voice.filters.iter_mut().for_each(|f| f.set_coeffs(coeffs));
        }
    }

    fn coeffs(&self, cutoff_hz: f64) -> BiquadCoeffs {
        BiquadCoeffs::lowpass(cutoff_hz, LOWPASS_Q, self.output_rate as f64)
    }

    /// Overwrite `out` (interleaved, `output_channels` wide) with the mix of
    /// all playing voices. Voices that run out of frames stop themselves.
    pub fn render(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        let channels = self.output_channels;

        for voice in self.voices.values_mut().filter(|v| v.playing) {
            let frames = voice.clip.frames();
            let step = voice.clip.sample_rate as f64 / self.output_rate as f64;

            for frame in out.chunks_exact_mut(channels) {
                if voice.cursor >= frames as f64 {
                    voice.playing = false;
                    break;
                }

                for (channel, slot) in frame.iter_mut().enumerate() {
                    let sample = voice.sample_at(channel) * voice.gain;
                    *slot += voice.filters[channel].process(sample);
                }
                voice.cursor += step;
            }

            if voice.cursor >= frames as f64 {
                voice.playing = false;
            }
        }
    }
}
