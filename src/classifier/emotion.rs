// Emotion classifier adapter

use crate::analysis::FeatureMatrix;
use crate::error::ModelError;

use super::labels::{EmotionClass, EMOTION_LABELS};
use super::model::{predict_index, InferenceModel};

/// Maps model output onto the seven emotion classes
pub struct EmotionClassifier {
    model: Box<dyn InferenceModel>,
}

impl EmotionClassifier {
    pub fn new(model: Box<dyn InferenceModel>) -> Self {
        Self { model }
    }

    /// Most probable emotion for the given features
    ///
    /// # Errors
    /// `LabelOutOfRange` when the model predicts an index the emotion table
    /// does not have; its message is the user-facing diagnostic.
    pub fn classify(&self, features: &FeatureMatrix) -> Result<EmotionClass, ModelError> {
        let index = predict_index(self.model.as_ref(), features)?;
        let emotion =
            EmotionClass::from_index(index).ok_or_else(|| ModelError::LabelOutOfRange {
                index,
                labels: EMOTION_LABELS.iter().map(|l| l.to_string()).collect(),
            })?;
        log::debug!("[Classifier] Emotion index {} -> {}", index, emotion);
        Ok(emotion)
    }
}
