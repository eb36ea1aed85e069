// Analysis module - signal analysis ahead of classification
//
// Everything downstream of decoding runs at a single processing rate. The
// pitch gate decides whether a recording goes to the classifiers at all;
// the feature extractor produces the MFCC matrix they consume.
//
// Architecture:
// - pitch: pYIN f0 tracking (YIN curve → trough priors → HMM/Viterbi)
// - gate: VoicePitchGate (mean voiced f0 against a threshold)
// - features: FeatureExtractor (STFT → mel → dB → DCT → 40 × 174)

pub mod features;
pub mod gate;
pub mod pitch;

pub use features::{FeatureExtractor, FeatureMatrix, MAX_FRAMES, N_MFCC};
pub use gate::{GateDecision, VoicePitchGate};
pub use pitch::{PitchContour, PitchTracker};

/// Processing sample rate shared by the gate and feature extraction
pub const SAMPLE_RATE: u32 = 22_050;
