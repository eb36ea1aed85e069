// PitchTracker - probabilistic YIN fundamental frequency estimation
//
// Each centered frame yields a YIN curve whose troughs are weighted by a
// Beta prior over thresholds and a Boltzmann prior over trough order. Trough
// probabilities are binned into 10-per-semitone pitch states, and an HMM with
// voiced/unvoiced halves is decoded with Viterbi to obtain a smooth contour.
//
// Module organization:
// - yin: difference function, parabolic refinement, trough picking
// - prior: Beta CDF and Boltzmann pmf
// - hmm: banded transition model and Viterbi decoding
// - mod.rs: Coordinator (PitchTracker)

mod hmm;
mod prior;
mod yin;

use crate::config::GateConfig;
use crate::error::AnalysisError;
use hmm::PitchTransitions;

/// Threshold intervals of the YIN prior
const N_THRESHOLDS: usize = 100;

/// Beta(2, 18) prior over the YIN threshold
const BETA_PARAMETERS: (u32, u32) = (2, 18);

/// Rate of the Boltzmann prior over trough order
const BOLTZMANN_PARAMETER: f64 = 2.0;

/// Pitch bins per semitone (0.1 semitone resolution)
const BINS_PER_SEMITONE: usize = 10;

/// Fastest pitch movement the HMM allows, in octaves per second
const MAX_TRANSITION_RATE: f64 = 35.92;

/// Probability of changing voicing between frames
const SWITCH_PROB: f64 = 0.01;

/// Mass given to the global minimum when no trough clears a threshold
const NO_TROUGH_PROB: f64 = 0.01;

/// Frame-level pitch estimate
#[derive(Debug, Clone, PartialEq)]
pub struct PitchContour {
    /// Decoded pitch per frame in Hz (also set for unvoiced frames)
    pub f0: Vec<f32>,
    /// Whether the decoded state is voiced
    pub voiced: Vec<bool>,
    /// Probability mass assigned to voiced states before decoding
    pub voiced_prob: Vec<f32>,
}

impl PitchContour {
    pub fn len(&self) -> usize {
        self.f0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.f0.is_empty()
    }

    pub fn voiced_count(&self) -> usize {
        self.voiced.iter().filter(|&&v| v).count()
    }

    /// Mean f0 over voiced frames, or `None` when nothing is voiced
    pub fn mean_voiced_f0(&self) -> Option<f32> {
        let voiced: Vec<f32> = self
            .f0
            .iter()
            .zip(&self.voiced)
            .filter(|(_, &v)| v)
            .map(|(&f, _)| f)
            .collect();
        if voiced.is_empty() {
            None
        } else {
            Some(voiced.iter().sum::<f32>() / voiced.len() as f32)
        }
    }
}

/// PitchTracker estimates f0 over centered frames of a mono signal
pub struct PitchTracker {
    sample_rate: f64,
    frame_length: usize,
    win_length: usize,
    hop_length: usize,
    min_period: usize,
    max_period: usize,
    fmin: f64,
    n_bins: usize,
    thresholds: Vec<f64>,
    beta_probs: Vec<f64>,
    transitions: PitchTransitions,
}

impl PitchTracker {
    /// Create a tracker for signals at `sample_rate`
    ///
    /// # Errors
    /// `InvalidParameters` when the frequency bounds or frame sizes leave no
    /// usable lag range.
    pub fn new(config: &GateConfig, sample_rate: u32) -> Result<Self, AnalysisError> {
        let invalid = |reason: String| Err(AnalysisError::InvalidParameters { reason });

        let fmin = config.fmin_hz as f64;
        let fmax = config.fmax_hz as f64;
        let sr = sample_rate as f64;

        if !(fmin > 0.0 && fmax > fmin) {
            return invalid(format!("need 0 < fmin < fmax, got {} / {}", fmin, fmax));
        }
        if config.hop_length == 0 {
            return invalid("hop_length must be positive".to_string());
        }

        let frame_length = config.frame_length;
        // Centered framing pads frame_length / 2 on each side
        if frame_length < 4 || frame_length % 2 == 1 {
            return invalid(format!(
                "frame_length must be even and at least 4, got {}",
                frame_length
            ));
        }
        let win_length = frame_length / 2;
        let min_period = ((sr / fmax).floor() as usize).max(1);
        let max_period =
            ((sr / fmin).ceil() as usize).min(frame_length.saturating_sub(win_length + 1));
        if min_period >= max_period {
            return invalid(format!(
                "empty lag range {}..={} for frame_length {}",
                min_period, max_period, frame_length
            ));
        }

        let bins_per_octave = (12 * BINS_PER_SEMITONE) as f64;
        let n_bins = (bins_per_octave * (fmax / fmin).log2()).floor() as usize + 1;

        let max_semitones_per_frame =
            (MAX_TRANSITION_RATE * 12.0 * config.hop_length as f64 / sr).round() as usize;
        let transition_width = max_semitones_per_frame * BINS_PER_SEMITONE + 1;

        let (thresholds, beta_probs) =
            prior::threshold_probs(N_THRESHOLDS, BETA_PARAMETERS.0, BETA_PARAMETERS.1);

        log::debug!(
            "[PitchTracker] lags {}..={}, {} pitch bins, transition width {}",
            min_period,
            max_period,
            n_bins,
            transition_width
        );

        Ok(Self {
            sample_rate: sr,
            frame_length,
            win_length,
            hop_length: config.hop_length,
            min_period,
            max_period,
            fmin,
            n_bins,
            thresholds,
            beta_probs,
            transitions: PitchTransitions::new(n_bins, transition_width, SWITCH_PROB),
        })
    }

    /// Number of centered frames for a signal of `len` samples
    pub fn frame_count(&self, len: usize) -> usize {
        1 + len / self.hop_length
    }

    /// Track pitch over the whole signal
    ///
    /// # Errors
    /// `NonFiniteInput` if any sample is NaN or infinite.
    pub fn track(&self, samples: &[f32]) -> Result<PitchContour, AnalysisError> {
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(AnalysisError::NonFiniteInput { index });
        }

        let pad = self.frame_length / 2;
        let mut padded = vec![0.0f32; samples.len() + 2 * pad];
        padded[pad..pad + samples.len()].copy_from_slice(samples);

        let n_frames = self.frame_count(samples.len());
        let observations: Vec<Vec<f64>> = (0..n_frames)
            .map(|t| {
                let start = t * self.hop_length;
                self.observation(&padded[start..start + self.frame_length])
            })
            .collect();

        let mut initial = vec![0.0f64; 2 * self.n_bins];
        for p in initial.iter_mut().skip(self.n_bins) {
            *p = 1.0 / self.n_bins as f64;
        }

        let states = self.transitions.viterbi(&observations, &initial);

        let bins_per_octave = (12 * BINS_PER_SEMITONE) as f64;
        let f0 = states
            .iter()
            .map(|&s| (self.fmin * 2f64.powf((s % self.n_bins) as f64 / bins_per_octave)) as f32)
            .collect();
        let voiced = states.iter().map(|&s| s < self.n_bins).collect();
        let voiced_prob = observations
            .iter()
            .map(|obs| obs[..self.n_bins].iter().sum::<f64>().min(1.0) as f32)
            .collect();

        Ok(PitchContour {
            f0,
            voiced,
            voiced_prob,
        })
    }

    /// Observation probabilities over all voiced and unvoiced states
    fn observation(&self, frame: &[f32]) -> Vec<f64> {
        let cmnd = yin::cumulative_mean_normalized_difference(
            frame,
            self.win_length,
            self.min_period,
            self.max_period,
        );
        let shifts = yin::parabolic_shifts(&cmnd);
        let troughs = yin::trough_indices(&cmnd);

        let mut obs = vec![0.0f64; 2 * self.n_bins];
        if !troughs.is_empty() {
            let heights: Vec<f64> = troughs.iter().map(|&i| cmnd[i]).collect();
            let probs = self.trough_probs(&heights);
            let bins_per_octave = (12 * BINS_PER_SEMITONE) as f64;

            for (&index, &prob) in troughs.iter().zip(&probs) {
                if prob <= 0.0 {
                    continue;
                }
                let period = self.min_period as f64 + index as f64 + shifts[index];
                let f0 = self.sample_rate / period;
                let bin = (bins_per_octave * (f0 / self.fmin).log2())
                    .round()
                    .clamp(0.0, (self.n_bins - 1) as f64) as usize;
                obs[bin] = prob;
            }
        }

        let voiced_prob = obs[..self.n_bins].iter().sum::<f64>().clamp(0.0, 1.0);
        let unvoiced = (1.0 - voiced_prob) / self.n_bins as f64;
        for p in obs.iter_mut().skip(self.n_bins) {
            *p = unvoiced;
        }
        obs
    }

    /// Probability of each trough being the period, given its height
    fn trough_probs(&self, heights: &[f64]) -> Vec<f64> {
        let mut probs = vec![0.0f64; heights.len()];

        for (k, &beta) in self.beta_probs.iter().enumerate() {
            let threshold = self.thresholds[k + 1];
            let below = heights.iter().filter(|&&h| h < threshold).count();
            let mut position = 0usize;
            for (m, &height) in heights.iter().enumerate() {
                if height < threshold {
                    probs[m] += prior::boltzmann_pmf(position, BOLTZMANN_PARAMETER, below) * beta;
                    position += 1;
                }
            }
        }

        let (global_min, min_height) = heights
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::INFINITY), |best, (i, h)| if h < best.1 { (i, h) } else { best });
        let missed = self.thresholds[1..]
            .iter()
            .filter(|&&threshold| min_height >= threshold)
            .count();
        probs[global_min] += NO_TROUGH_PROB * self.beta_probs[..missed].iter().sum::<f64>();

        probs
    }
}
