// Age classifier adapter

use crate::analysis::FeatureMatrix;
use crate::error::ModelError;

use super::labels::{AgeGroup, AGE_LABELS};
use super::model::{predict_index, InferenceModel};

/// Age group with its derived senior flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgePrediction {
    pub group: AgeGroup,
    pub is_senior: bool,
}

/// Maps model output onto the eight age groups
pub struct AgeClassifier {
    model: Box<dyn InferenceModel>,
}

impl AgeClassifier {
    pub fn new(model: Box<dyn InferenceModel>) -> Self {
        Self { model }
    }

    /// Most probable age group for the given features
    ///
    /// # Errors
    /// Inference failures propagate; an index outside the age table yields
    /// `LabelOutOfRange` carrying every age label.
    pub fn classify(&self, features: &FeatureMatrix) -> Result<AgePrediction, ModelError> {
        let index = predict_index(self.model.as_ref(), features)?;
        let group = AgeGroup::from_index(index).ok_or_else(|| ModelError::LabelOutOfRange {
            index,
            labels: AGE_LABELS.iter().map(|l| l.to_string()).collect(),
        })?;

        log::debug!(
            "[Classifier] Age index {} -> {} (senior: {})",
            index,
            group,
            group.is_senior()
        );

        Ok(AgePrediction {
            group,
            is_senior: group.is_senior(),
        })
    }
}
