use std::io::Cursor;
use std::io::ErrorKind;

use sonora_playback::EngineError;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Whole clip as interleaved f32 PCM
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

impl DecodedClip {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }

    /// Seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }
}

/// Decode an in-memory file. `extension` helps the format probe.
pub fn decode_bytes(bytes: Vec<u8>, extension: Option<&str>) -> Result<DecodedClip, EngineError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| EngineError::Decode(format!("Failed to probe format: {e}")))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| EngineError::Decode("No audio track found".into()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| EngineError::Decode(format!("Failed to create decoder: {e}")))?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(EngineError::Decode(format!("Failed to read packet: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(buffer) => {
                let spec = *buffer.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count();

                let mut interleaved = SampleBuffer::<f32>::new(buffer.capacity() as u64, spec);
                interleaved.copy_interleaved_ref(buffer);
                samples.extend_from_slice(interleaved.samples());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!("Skipping undecodable packet: {e}");
            }
            Err(e) => return Err(EngineError::Decode(format!("Decode failed: {e}"))),
        }
    }

    if channels == 0 || sample_rate == 0 {
        return Err(EngineError::Decode("Stream has no channels".into()));
    }

    tracing::debug!(
        "Decoded {} frames at {sample_rate} Hz, {channels} channel(s)",
        samples.len() / channels
    );

    Ok(DecodedClip {
        samples,
        sample_rate,
        channels,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 16-bit PCM WAV holding a constant value
    pub(crate) fn wav_bytes(sample_rate: u32, channels: u16, frames: u32, value: i16) -> Vec<u8> {
        let data_len = frames * channels as u32 * 2;
        let mut out = Vec::with_capacity(44 + data_len as usize);

        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * channels as u32 * 2).to_le_bytes());
        out.extend_from_slice(&(channels * 2).to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for _ in 0..frames * channels as u32 {
            out.extend_from_slice(&value.to_le_bytes());
        }

        out
    }

    #[test]
    fn decodes_pcm_wav() {
        let clip = decode_bytes(wav_bytes(8000, 2, 4000, 16384), Some("wav")).unwrap();

        assert_eq!(clip.sample_rate, 8000);
        assert_eq!(clip.channels, 2);
        assert_eq!(clip.frames(), 4000);
        assert!((clip.duration() - 0.5).abs() < 1e-9);
        assert!((clip.samples[0] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode_bytes(b"definitely not audio".to_vec(), Some("wav")).unwrap_err();
        assert!(matches!(err, EngineError::Decode(_)));
    }
}
