// AppContext: loaded models and analysis components
//
// Built once at startup and never mutated afterwards. The orchestrator and
// front ends receive it explicitly; nothing here is global.

use crate::analysis::{FeatureExtractor, VoicePitchGate};
use crate::classifier::{AgeClassifier, EmotionClassifier, InferenceModel, OnnxModel};
use crate::config::AppConfig;
use crate::error::{log_analysis_error, log_model_error, AnalysisError, StartupError};

/// Everything a prediction needs, immutable after construction
pub struct AppContext {
    config: AppConfig,
    extractor: FeatureExtractor,
    gate: VoicePitchGate,
    age: AgeClassifier,
    emotion: EmotionClassifier,
}

impl AppContext {
    /// Load both models from the configured paths
    ///
    /// # Errors
    /// An unusable feature configuration, or the first model that is missing
    /// or fails to load. This is a startup error; it is logged once here and
    /// callers should not start serving.
    pub fn load(config: AppConfig) -> Result<Self, StartupError> {
        let extractor = FeatureExtractor::new(&config.features)
            .inspect_err(|err| log_analysis_error(err, "AppContext::load"))?;
        let age = OnnxModel::load("age", &config.models.age_model_path)
            .inspect_err(|err| log_model_error(err, "AppContext::load"))?;
        let emotion = OnnxModel::load("emotion", &config.models.emotion_model_path)
            .inspect_err(|err| log_model_error(err, "AppContext::load"))?;

        Ok(Self::assemble(
            config,
            extractor,
            Box::new(age),
            Box::new(emotion),
        ))
    }

    /// Assemble a context around already-constructed models
    ///
    /// # Errors
    /// `InvalidParameters` when the feature configuration is unusable. A bad
    /// gate configuration is not an error; the gate then passes every input.
    pub fn from_models(
        config: AppConfig,
        age_model: Box<dyn InferenceModel>,
        emotion_model: Box<dyn InferenceModel>,
    ) -> Result<Self, AnalysisError> {
        let extractor = FeatureExtractor::new(&config.features)?;
        Ok(Self::assemble(config, extractor, age_model, emotion_model))
    }

    fn assemble(
        config: AppConfig,
        extractor: FeatureExtractor,
        age_model: Box<dyn InferenceModel>,
        emotion_model: Box<dyn InferenceModel>,
    ) -> Self {
        Self {
            extractor,
            gate: VoicePitchGate::new(&config.gate),
            age: AgeClassifier::new(age_model),
            emotion: EmotionClassifier::new(emotion_model),
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn gate(&self) -> &VoicePitchGate {
        &self.gate
    }

    pub fn age_classifier(&self) -> &AgeClassifier {
        &self.age
    }

    pub fn emotion_classifier(&self) -> &EmotionClassifier {
        &self.emotion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::testing::ScriptedModel;
    use std::path::PathBuf;

    #[test]
    fn test_load_reports_missing_age_model() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.models.age_model_path = dir.path().join("age.onnx");
        config.models.emotion_model_path = dir.path().join("emotion.onnx");

        match AppContext::load(config) {
            Err(StartupError::Model(ModelError::ModelNotFound { model, path })) => {
                assert_eq!(model, "age");
                assert_eq!(PathBuf::from(path), dir.path().join("age.onnx"));
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("context must not load without models"),
        }
    }

    #[test]
    fn test_from_models_uses_config() {
        let mut config = AppConfig::default();
        config.gate.threshold_hz = 180.0;
        let context = AppContext::from_models(
            config,
            Box::new(ScriptedModel::new("age", 8, 0)),
            Box::new(ScriptedModel::new("emotion", 7, 0)),
        )
        .unwrap();
        assert_eq!(context.gate().threshold_hz(), 180.0);
        assert_eq!(context.config().gate.threshold_hz, 180.0);
    }

    #[test]
    fn test_load_rejects_bad_feature_config_before_models() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.features.hop_length = 0;
        config.models.age_model_path = dir.path().join("age.onnx");

        assert!(matches!(
            AppContext::load(config),
            Err(StartupError::Config(AnalysisError::InvalidParameters { .. }))
        ));
    }

    #[test]
    fn test_from_models_rejects_odd_fft_size() {
        let mut config = AppConfig::default();
        config.features.n_fft = 2047;
        let result = AppContext::from_models(
            config,
            Box::new(ScriptedModel::new("age", 8, 0)),
            Box::new(ScriptedModel::new("emotion", 7, 0)),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_gate_config_still_builds() {
        let mut config = AppConfig::default();
        config.gate.frame_length = 2047;
        let context = AppContext::from_models(
            config,
            Box::new(ScriptedModel::new("age", 8, 0)),
            Box::new(ScriptedModel::new("emotion", 7, 0)),
        )
        .unwrap();
        assert_eq!(context.config().gate.frame_length, 2047);
    }
}
