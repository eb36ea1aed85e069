// Audio module - decoding uploaded files into analysis-ready waveforms
//
// Pipeline: symphonia decode → mono downmix → rubato resample to the
// processing rate. Both the pitch gate and the feature extractor consume the
// resulting `Waveform`.

pub mod decode;
pub mod resample;

use std::path::Path;

use crate::error::AudioError;

pub use decode::{decode_file, DecodedAudio};
pub use resample::resample;

/// Mono PCM samples at a known sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// All-zero waveform of the given duration
    pub fn silence(duration_secs: f32, sample_rate: u32) -> Self {
        let len = (duration_secs * sample_rate as f32).round() as usize;
        Self::new(vec![0.0; len], sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Load an audio file as a mono waveform at `sample_rate`
///
/// Channels are averaged; the signal is resampled when the source rate
/// differs from the requested one.
///
/// # Errors
/// Any open/probe/decode/resample failure, or a stream with no samples.
pub fn load_waveform(path: &Path, sample_rate: u32) -> Result<Waveform, AudioError> {
    let decoded = decode_file(path)?;
    if decoded.frames() == 0 {
        return Err(AudioError::EmptyStream {
            source_id: path.display().to_string(),
        });
    }

    let mono = decoded.to_mono();
    let samples = if decoded.sample_rate == sample_rate {
        mono
    } else {
        log::debug!(
            "[AudioLoader] Resampling {} frames {} Hz -> {} Hz",
            mono.len(),
            decoded.sample_rate,
            sample_rate
        );
        resample(&mono, decoded.sample_rate, sample_rate)?
    };

    Ok(Waveform::new(samples, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_duration() {
        let wave = Waveform::silence(3.0, 22_050);
        assert_eq!(wave.len(), 66_150);
        assert!((wave.duration_secs() - 3.0).abs() < 1e-6);
        assert!(wave.samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_empty_waveform() {
        let wave = Waveform::new(Vec::new(), 22_050);
        assert!(wave.is_empty());
        assert_eq!(wave.duration_secs(), 0.0);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_waveform(Path::new("no/such/clip.mp3"), 22_050);
        assert!(matches!(result, Err(AudioError::OpenFailed { .. })));
    }
}
