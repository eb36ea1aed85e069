// FeatureExtractor - MFCC extraction for age and emotion classification
//
// Converts a waveform into the fixed 40 × 174 MFCC matrix both classifiers
// were trained on.
//
// Module organization:
// - types: FeatureMatrix and the shape constants
// - fft: centered STFT power spectra
// - mel: mel filterbank and DCT
// - mod.rs: Coordinator (FeatureExtractor)
//
// Pipeline per frame:
// 1. Power spectrum (|STFT|², periodic Hann, n_fft 2048, hop 512)
// 2. Mel projection (128 Slaney bands, 0 Hz to Nyquist)
// 3. Power to dB, clipped to (global max - top_db)
// 4. DCT-II (orthonormal), first 40 coefficients
// Then the frame axis is truncated/padded to 174.

mod fft;
mod mel;
mod types;

pub use fft::FftProcessor;
pub use mel::{hz_to_mel, mel_to_hz};
pub use types::{FeatureMatrix, MAX_FRAMES, N_MFCC};

use ndarray::Array2;

use crate::audio::{resample, Waveform};
use crate::config::FeatureConfig;
use crate::error::{AnalysisError, AudioError};
use mel::{Dct, MelFilterbank};

use super::SAMPLE_RATE;

/// Floor applied to mel power before taking the log
const AMIN: f32 = 1e-10;

/// FeatureExtractor coordinates the MFCC pipeline
pub struct FeatureExtractor {
    fft_processor: FftProcessor,
    mel_filterbank: MelFilterbank,
    dct: Dct,
    hop_length: usize,
    top_db: f32,
}

impl FeatureExtractor {
    /// Create an extractor for the processing sample rate
    ///
    /// # Errors
    /// `InvalidParameters` for an odd or tiny `n_fft`, a zero hop, fewer mel
    /// bands than coefficients, or a negative `top_db`.
    pub fn new(config: &FeatureConfig) -> Result<Self, AnalysisError> {
        let invalid = |reason: String| Err(AnalysisError::InvalidParameters { reason });

        if config.n_fft < 2 || config.n_fft % 2 == 1 {
            return invalid(format!("n_fft must be even and at least 2, got {}", config.n_fft));
        }
        if config.hop_length == 0 {
            return invalid("feature hop_length must be positive".to_string());
        }
        if config.n_mels < N_MFCC {
            return invalid(format!(
                "n_mels must be at least {}, got {}",
                N_MFCC, config.n_mels
            ));
        }
        if config.top_db.is_nan() || config.top_db < 0.0 {
            return invalid(format!("top_db must be non-negative, got {}", config.top_db));
        }

        Ok(Self {
            fft_processor: FftProcessor::new(config.n_fft),
            mel_filterbank: MelFilterbank::new(SAMPLE_RATE, config.n_fft, config.n_mels),
            dct: Dct::new(config.n_mels, N_MFCC),
            hop_length: config.hop_length,
            top_db: config.top_db,
        })
    }

    /// Extract the fixed-shape feature matrix from a waveform
    ///
    /// Waveforms at another rate are resampled to `SAMPLE_RATE` first.
    ///
    /// # Errors
    /// Only resampling can fail; in-memory extraction is infallible.
    pub fn extract(&self, waveform: &Waveform) -> Result<FeatureMatrix, AudioError> {
        let raw = if waveform.sample_rate() == SAMPLE_RATE {
            self.raw_mfcc(waveform.samples())
        } else {
            let samples = resample(waveform.samples(), waveform.sample_rate(), SAMPLE_RATE)?;
            self.raw_mfcc(&samples)
        };

        log::debug!(
            "[FeatureExtractor] {} raw frames -> {} (truncated: {})",
            raw.ncols(),
            MAX_FRAMES,
            raw.ncols() > MAX_FRAMES
        );

        Ok(FeatureMatrix::fix_length(&raw))
    }

    /// Compute MFCCs for every frame, before length fixing
    ///
    /// # Returns
    /// `N_MFCC` × `1 + len / hop` matrix
    pub fn raw_mfcc(&self, samples: &[f32]) -> Array2<f32> {
        let power_frames = self
            .fft_processor
            .power_spectrogram(samples, self.hop_length);

        let mut mel_db: Vec<Vec<f32>> = power_frames
            .iter()
            .map(|power| {
                self.mel_filterbank
                    .apply(power)
                    .into_iter()
                    .map(|p| 10.0 * p.max(AMIN).log10())
                    .collect()
            })
            .collect();

        let max_db = mel_db
            .iter()
            .flatten()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);
        let floor = max_db - self.top_db;
        for value in mel_db.iter_mut().flatten() {
            *value = value.max(floor);
        }

        let n_frames = mel_db.len();
        let mut mfcc = Array2::<f32>::zeros((N_MFCC, n_frames));
        for (t, bands) in mel_db.iter().enumerate() {
            for (k, coeff) in self.dct.apply(bands).into_iter().enumerate() {
                mfcc[[k, t]] = coeff;
            }
        }
        mfcc
    }
}
