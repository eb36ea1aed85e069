//! Configuration management for the prediction pipeline
//!
//! This module provides runtime configuration loading from JSON files so
//! model locations and gate parameters can be adjusted without recompiling.
//! Every field has a default matching the trained models' expectations.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub features: FeatureConfig,
    pub gate: GateConfig,
    pub models: ModelConfig,
    pub upload: UploadConfig,
}

/// MFCC extraction parameters
///
/// Coefficient and frame counts are fixed by the model contract (see
/// `analysis::features::N_MFCC` / `MAX_FRAMES`); only the short-time analysis
/// is tunable here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// STFT window size in samples
    pub n_fft: usize,
    /// Hop between STFT frames
    pub hop_length: usize,
    /// Mel bands before the DCT
    pub n_mels: usize,
    /// Dynamic range kept below the loudest bin, in dB
    pub top_db: f32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            n_fft: 2048,
            hop_length: 512,
            n_mels: 128,
            top_db: 80.0,
        }
    }
}

/// Voice-pitch gate parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Mean voiced pitch below this passes the gate
    pub threshold_hz: f32,
    /// Lower bound of the pitch search (C2)
    pub fmin_hz: f32,
    /// Upper bound of the pitch search (C7)
    pub fmax_hz: f32,
    /// Analysis frame length in samples
    pub frame_length: usize,
    /// Hop between analysis frames
    pub hop_length: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            threshold_hz: 200.0,
            fmin_hz: 65.406_39,
            fmax_hz: 2093.004_5,
            frame_length: 2048,
            hop_length: 512,
        }
    }
}

/// Pretrained model locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub age_model_path: PathBuf,
    pub emotion_model_path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            age_model_path: PathBuf::from("models/age_model.onnx"),
            emotion_model_path: PathBuf::from("models/emotion_model.onnx"),
        }
    }
}

/// Upload staging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory for temporary upload files (created on demand)
    pub temp_dir: PathBuf,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            temp_dir: PathBuf::from("tmp"),
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults (with a warning) when the
    /// file is missing or its JSON is invalid. Missing sections and fields
    /// fall back to their defaults individually.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        Self::load_from_file("assets/predictor_config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.features.n_fft, 2048);
        assert_eq!(config.features.n_mels, 128);
        assert_eq!(config.gate.threshold_hz, 200.0);
        assert!((config.gate.fmin_hz - 65.41).abs() < 0.01);
        assert!((config.gate.fmax_hz - 2093.0).abs() < 0.01);
        assert_eq!(
            config.models.age_model_path,
            PathBuf::from("models/age_model.onnx")
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.gate.threshold_hz, config.gate.threshold_hz);
        assert_eq!(parsed.features.hop_length, config.features.hop_length);
        assert_eq!(parsed.upload.temp_dir, config.upload.temp_dir);
    }

    #[test]
    fn test_partial_json_uses_field_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{ "gate": { "threshold_hz": 180.0 } }"#).unwrap();
        assert_eq!(parsed.gate.threshold_hz, 180.0);
        assert_eq!(parsed.gate.hop_length, 512);
        assert_eq!(parsed.features.n_mels, 128);
    }

    #[test]
    fn test_bundled_config_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/predictor_config.json");
        let bundled = AppConfig::load_from_file(path);
        let defaults = AppConfig::default();
        assert_eq!(bundled.gate.threshold_hz, defaults.gate.threshold_hz);
        assert_eq!(bundled.gate.fmin_hz, defaults.gate.fmin_hz);
        assert_eq!(bundled.features.top_db, defaults.features.top_db);
        assert_eq!(
            bundled.models.emotion_model_path,
            defaults.models.emotion_model_path
        );
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from_file("does/not/exist.json");
        assert_eq!(config.features.hop_length, 512);
    }
}
