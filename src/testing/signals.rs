//! Synthetic waveforms and WAV fixture writing.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::PI;
use std::path::Path;

use crate::audio::Waveform;
use crate::error::AudioError;

/// Pure tone at `amplitude`
pub fn sine(frequency_hz: f32, amplitude: f32, duration_secs: f32, sample_rate: u32) -> Waveform {
    let n = (duration_secs * sample_rate as f32).round() as usize;
    let samples = (0..n)
        .map(|i| amplitude * (2.0 * PI * frequency_hz * i as f32 / sample_rate as f32).sin())
        .collect();
    Waveform::new(samples, sample_rate)
}

pub fn silence(duration_secs: f32, sample_rate: u32) -> Waveform {
    Waveform::silence(duration_secs, sample_rate)
}

/// Uniform white noise in `[-amplitude, amplitude]`, reproducible per seed
pub fn white_noise(amplitude: f32, duration_secs: f32, sample_rate: u32, seed: u64) -> Waveform {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = (duration_secs * sample_rate as f32).round() as usize;
    let samples = (0..n)
        .map(|_| rng.gen_range(-amplitude..=amplitude))
        .collect();
    Waveform::new(samples, sample_rate)
}

/// Write a mono 16-bit PCM WAV file
pub fn write_wav(path: &Path, waveform: &Waveform) -> Result<(), AudioError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let staging = |e: hound::Error| AudioError::StagingFailed {
        reason: e.to_string(),
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(staging)?;
    for &sample in waveform.samples() {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value).map_err(staging)?;
    }
    writer.finalize().map_err(staging)
}

/// MPEG-1 Layer III header: 128 kbps, 48 kHz, mono, no CRC
const MP3_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x94, 0xC0];

/// Bytes per frame at 128 kbps / 48 kHz (144 * bitrate / rate)
const MP3_FRAME_BYTES: usize = 384;

/// Samples decoded from one Layer III frame
pub const MP3_FRAME_SAMPLES: usize = 1152;

/// Write a silent MP3 stream of at least `duration_secs`
///
/// Every frame has zeroed side info and main data: no Huffman-coded values
/// and a global gain of zero, which decodes to digital silence at 48 kHz.
pub fn write_silent_mp3(path: &Path, duration_secs: f32) -> Result<(), AudioError> {
    let n_frames = (duration_secs * 48_000.0 / MP3_FRAME_SAMPLES as f32).ceil() as usize;
    let mut frame = vec![0u8; MP3_FRAME_BYTES];
    frame[..MP3_FRAME_HEADER.len()].copy_from_slice(&MP3_FRAME_HEADER);

    let bytes = frame.repeat(n_frames.max(1));
    std::fs::write(path, bytes).map_err(|e| AudioError::StagingFailed {
        reason: e.to_string(),
    })
}
