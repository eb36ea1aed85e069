// VoicePitchGate - admits recordings whose voiced pitch is low enough
//
// The gate never blocks on its own failure: a tracker that could not be
// built, a waveform that cannot be analysed, or a recording with no voiced
// frames all let the audio through.

use crate::audio::{resample, Waveform};
use crate::config::GateConfig;
use crate::error::{log_analysis_error, log_audio_error, AnalysisError};

use super::pitch::PitchTracker;
use super::SAMPLE_RATE;

/// Outcome of the pitch gate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision {
    /// Audio may proceed; `mean_hz` is `None` when no pitch was measured
    Passed { mean_hz: Option<f32> },
    /// Mean voiced pitch at or above the threshold
    Rejected { mean_hz: f32 },
}

impl GateDecision {
    pub fn passed(&self) -> bool {
        matches!(self, GateDecision::Passed { .. })
    }

    pub fn mean_hz(&self) -> Option<f32> {
        match self {
            GateDecision::Passed { mean_hz } => *mean_hz,
            GateDecision::Rejected { mean_hz } => Some(*mean_hz),
        }
    }
}

/// Pitch gate over waveforms at any sample rate
pub struct VoicePitchGate {
    tracker: Result<PitchTracker, AnalysisError>,
    threshold_hz: f32,
}

impl VoicePitchGate {
    pub fn new(config: &GateConfig) -> Self {
        let tracker = PitchTracker::new(config, SAMPLE_RATE);
        if let Err(err) = &tracker {
            log_analysis_error(err, "VoicePitchGate::new");
        }
        Self {
            tracker,
            threshold_hz: config.threshold_hz,
        }
    }

    pub fn threshold_hz(&self) -> f32 {
        self.threshold_hz
    }

    /// Decide whether `waveform` passes
    ///
    /// Passes when the mean f0 over voiced frames is strictly below the
    /// threshold, when nothing is voiced, or when analysis fails.
    pub fn evaluate(&self, waveform: &Waveform) -> GateDecision {
        let tracker = match &self.tracker {
            Ok(tracker) => tracker,
            Err(_) => {
                log::warn!("[PitchGate] No usable pitch tracker, letting audio through");
                return GateDecision::Passed { mean_hz: None };
            }
        };

        let resampled;
        let samples = if waveform.sample_rate() == SAMPLE_RATE {
            waveform.samples()
        } else {
            match resample(waveform.samples(), waveform.sample_rate(), SAMPLE_RATE) {
                Ok(samples) => {
                    resampled = samples;
                    &resampled[..]
                }
                Err(err) => {
                    log_audio_error(&err, "VoicePitchGate::evaluate");
                    return GateDecision::Passed { mean_hz: None };
                }
            }
        };

        let contour = match tracker.track(samples) {
            Ok(contour) => contour,
            Err(err) => {
                log_analysis_error(&err, "VoicePitchGate::evaluate");
                return GateDecision::Passed { mean_hz: None };
            }
        };

        match contour.mean_voiced_f0() {
            None => {
                log::info!(
                    "[PitchGate] No voiced frames in {} frames, letting audio through",
                    contour.len()
                );
                GateDecision::Passed { mean_hz: None }
            }
            Some(mean_hz) if mean_hz < self.threshold_hz => {
                log::info!(
                    "[PitchGate] Mean pitch {:.1} Hz over {} voiced frames: passed",
                    mean_hz,
                    contour.voiced_count()
                );
                GateDecision::Passed {
                    mean_hz: Some(mean_hz),
                }
            }
            Some(mean_hz) => {
                log::info!(
                    "[PitchGate] Mean pitch {:.1} Hz >= {:.1} Hz: rejected",
                    mean_hz,
                    self.threshold_hz
                );
                GateDecision::Rejected { mean_hz }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    fn tone(frequency: f32, seconds: f32, sample_rate: u32) -> Waveform {
        let n = (seconds * sample_rate as f32) as usize;
        let samples = (0..n)
            .map(|i| {
                0.5 * (2.0 * std::f32::consts::PI * frequency * i as f32 / sample_rate as f32)
                    .sin()
            })
            .collect();
        Waveform::new(samples, sample_rate)
    }

    #[test]
    fn test_low_voice_passes() {
        let gate = VoicePitchGate::new(&GateConfig::default());
        let decision = gate.evaluate(&tone(120.0, 1.0, SAMPLE_RATE));
        assert!(decision.passed());
        assert!(decision.mean_hz().is_some());
    }

    #[test]
    fn test_high_voice_rejected() {
        let gate = VoicePitchGate::new(&GateConfig::default());
        let decision = gate.evaluate(&tone(260.0, 1.0, SAMPLE_RATE));
        assert!(matches!(decision, GateDecision::Rejected { mean_hz } if mean_hz > 200.0));
    }

    #[test]
    fn test_silence_fails_open() {
        let gate = VoicePitchGate::new(&GateConfig::default());
        let decision = gate.evaluate(&Waveform::silence(1.0, SAMPLE_RATE));
        assert_eq!(decision, GateDecision::Passed { mean_hz: None });
    }

    #[test]
    fn test_analysis_error_fails_open() {
        let gate = VoicePitchGate::new(&GateConfig::default());
        let wave = Waveform::new(vec![f32::NAN; 4096], SAMPLE_RATE);
        assert_eq!(gate.evaluate(&wave), GateDecision::Passed { mean_hz: None });
    }

    #[test]
    fn test_invalid_config_fails_open() {
        let config = GateConfig {
            fmin_hz: 0.0,
            ..GateConfig::default()
        };
        let gate = VoicePitchGate::new(&config);
        let decision = gate.evaluate(&tone(400.0, 0.5, SAMPLE_RATE));
        assert_eq!(decision, GateDecision::Passed { mean_hz: None });
    }

    #[test]
    fn test_threshold_is_configurable() {
        let config = GateConfig {
            threshold_hz: 100.0,
            ..GateConfig::default()
        };
        let gate = VoicePitchGate::new(&config);
        assert_eq!(gate.threshold_hz(), 100.0);
        assert!(!gate.evaluate(&tone(150.0, 1.0, SAMPLE_RATE)).passed());
    }

    #[test]
    fn test_other_sample_rates_are_resampled() {
        let gate = VoicePitchGate::new(&GateConfig::default());
        let decision = gate.evaluate(&tone(130.0, 1.0, 16_000));
        let mean = decision.mean_hz().unwrap();
        assert!(decision.passed());
        assert!((mean - 130.0).abs() < 6.0, "mean f0 {}", mean);
    }

    #[test]
    fn test_odd_frame_length_fails_open() {
        let config = GateConfig {
            frame_length: 2047,
            ..GateConfig::default()
        };
        let gate = VoicePitchGate::new(&config);
        let wave = Waveform::new(vec![0.25; 1024], SAMPLE_RATE);
        assert_eq!(gate.evaluate(&wave), GateDecision::Passed { mean_hz: None });
    }

    #[test]
    fn test_faint_hiss_fails_open() {
        let gate = VoicePitchGate::new(&GateConfig::default());
        let hiss = testing::white_noise(1e-5, 1.0, SAMPLE_RATE, 7);
        assert_eq!(gate.evaluate(&hiss), GateDecision::Passed { mean_hz: None });
    }

    #[test]
    fn test_white_noise_decision_is_reproducible() {
        let gate = VoicePitchGate::new(&GateConfig::default());
        let noise = testing::white_noise(0.5, 1.0, SAMPLE_RATE, 42);
        let decision = gate.evaluate(&noise);
        assert_eq!(decision, gate.evaluate(&noise));
        match decision {
            GateDecision::Passed { mean_hz: Some(mean) } => assert!(mean < 200.0),
            GateDecision::Passed { mean_hz: None } => {}
            GateDecision::Rejected { mean_hz } => assert!(mean_hz >= 200.0),
        }
    }
}
