// Outcome types - explicit results of each pipeline stage
//
// Every path through the orchestrator ends in one of these variants; the
// user-facing strings are derived from them in one place.

use serde::{Deserialize, Serialize};

use crate::classifier::{AgePrediction, EmotionClass};
use crate::error::{ErrorCode, ModelError};

/// Shown when the pitch gate rejects a recording
pub const NON_QUALIFYING_VOICE: &str = "Upload male voice";

/// Shown when decoding, extraction or inference fails
pub const PROCESSING_ERROR: &str = "Error processing audio";

/// Suffix appended to senior age groups
pub const SENIOR_SUFFIX: &str = " (Senior Citizen)";

/// Orchestrator states, in the order they were visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    GatePassed,
    GateFailed,
    AgePredicted,
    EmotionPredicted,
    Skipped,
    Done,
}

/// Result of the age stage
#[derive(Debug, Clone, PartialEq)]
pub enum AgeOutcome {
    /// Pitch gate rejected the voice
    GateRejected { mean_hz: f32 },
    /// Audio could not be decoded or featurized
    ExtractionFailed,
    Predicted(AgePrediction),
    /// Model ran but produced no usable label
    Failed(ModelError),
}

impl AgeOutcome {
    pub fn message(&self) -> String {
        match self {
            AgeOutcome::GateRejected { .. } => NON_QUALIFYING_VOICE.to_string(),
            AgeOutcome::ExtractionFailed => PROCESSING_ERROR.to_string(),
            AgeOutcome::Predicted(prediction) => {
                let suffix = if prediction.is_senior { SENIOR_SUFFIX } else { "" };
                format!("Predicted age group: {}{}", prediction.group, suffix)
            }
            AgeOutcome::Failed(err) => model_failure_message(err),
        }
    }

    pub fn is_senior(&self) -> bool {
        matches!(self, AgeOutcome::Predicted(p) if p.is_senior)
    }
}

/// Result of the emotion stage, only produced for senior speakers
#[derive(Debug, Clone, PartialEq)]
pub enum EmotionOutcome {
    Predicted(EmotionClass),
    Failed(ModelError),
}

impl EmotionOutcome {
    pub fn message(&self) -> String {
        match self {
            EmotionOutcome::Predicted(emotion) => format!("Predicted emotion: {}", emotion),
            EmotionOutcome::Failed(err) => model_failure_message(err),
        }
    }
}

/// Label mismatches surface their diagnostic; anything else is generic
fn model_failure_message(err: &ModelError) -> String {
    match err {
        ModelError::LabelOutOfRange { .. } => err.message(),
        _ => PROCESSING_ERROR.to_string(),
    }
}

/// Full orchestrator result for one recording
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub age: AgeOutcome,
    pub emotion: Option<EmotionOutcome>,
    pub stages: Vec<PipelineStage>,
}

impl PipelineResult {
    pub fn age_message(&self) -> String {
        self.age.message()
    }

    pub fn emotion_message(&self) -> Option<String> {
        self.emotion.as_ref().map(EmotionOutcome::message)
    }
}

/// User-facing report, as printed by the CLI and returned over HTTP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub file: String,
    pub age_result: String,
    pub emotion_result: Option<String>,
}

impl PredictionReport {
    pub fn new(file: &str, result: &PipelineResult) -> Self {
        Self {
            file: file.to_string(),
            age_result: result.age_message(),
            emotion_result: result.emotion_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::AgeGroup;

    fn predicted(group: AgeGroup) -> AgeOutcome {
        AgeOutcome::Predicted(AgePrediction {
            group,
            is_senior: group.is_senior(),
        })
    }

    #[test]
    fn test_age_messages() {
        assert_eq!(
            AgeOutcome::GateRejected { mean_hz: 240.0 }.message(),
            "Upload male voice"
        );
        assert_eq!(AgeOutcome::ExtractionFailed.message(), "Error processing audio");
        assert_eq!(
            predicted(AgeGroup::Seventies).message(),
            "Predicted age group: seventies (Senior Citizen)"
        );
        assert_eq!(
            predicted(AgeGroup::Twenties).message(),
            "Predicted age group: twenties"
        );
    }

    #[test]
    fn test_failure_messages() {
        let inference = ModelError::InferenceFailed {
            model: "age".to_string(),
            reason: "boom".to_string(),
        };
        assert_eq!(
            AgeOutcome::Failed(inference.clone()).message(),
            "Error processing audio"
        );
        assert_eq!(
            EmotionOutcome::Failed(inference).message(),
            "Error processing audio"
        );

        let mismatch = ModelError::LabelOutOfRange {
            index: 9,
            labels: vec!["angry".to_string()],
        };
        assert_eq!(
            EmotionOutcome::Failed(mismatch).message(),
            "Error: Predicted index 9 not in ['angry']"
        );
    }

    #[test]
    fn test_report_json_shape() {
        let result = PipelineResult {
            age: predicted(AgeGroup::Thirties),
            emotion: None,
            stages: vec![PipelineStage::Start, PipelineStage::Done],
        };
        let report = PredictionReport::new("voice.mp3", &result);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["file"], "voice.mp3");
        assert_eq!(json["age_result"], "Predicted age group: thirties");
        assert!(json["emotion_result"].is_null());
    }
}
