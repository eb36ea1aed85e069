// Model error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Model error code constants
///
/// Error code range: 2001-2006
pub struct ModelErrorCodes {}

impl ModelErrorCodes {
    /// Model artifact missing at the configured path
    pub const MODEL_NOT_FOUND: i32 = 2001;

    /// Model artifact present but the runtime refused it
    pub const LOAD_FAILED: i32 = 2002;

    /// Forward inference failed
    pub const INFERENCE_FAILED: i32 = 2003;

    /// Model output had an unexpected shape
    pub const INVALID_OUTPUT: i32 = 2004;

    /// Predicted index has no label
    pub const LABEL_OUT_OF_RANGE: i32 = 2005;

    /// Session mutex was poisoned
    pub const LOCK_POISONED: i32 = 2006;
}

/// Log a model error with structured context
pub fn log_model_error(err: &ModelError, context: &str) {
    error!(
        "Model error in {}: code={}, component=Classifier, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Model-related errors
///
/// Covers loading the pretrained networks at startup, running inference, and
/// mapping the arg-max index back to a label.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// No file at the configured path
    ModelNotFound { model: String, path: String },

    /// Runtime failed to build a session from the file
    LoadFailed { model: String, reason: String },

    /// Runtime failed during a forward pass
    InferenceFailed { model: String, reason: String },

    /// Output tensor missing or empty
    InvalidOutput { model: String, reason: String },

    /// Arg-max index outside the label table
    LabelOutOfRange { index: usize, labels: Vec<String> },

    /// Session lock poisoned by a panicking holder
    LockPoisoned { model: String },
}

impl ModelError {
    /// Diagnostic line shown to the user for an unmapped prediction
    ///
    /// Labels are single-quoted inside brackets, e.g.
    /// `Error: Predicted index 9 not in ['angry', 'disgust']`.
    pub fn label_diagnostic(index: usize, labels: &[&str]) -> String {
        let quoted = labels
            .iter()
            .map(|label| format!("'{}'", label))
            .collect::<Vec<_>>()
            .join(", ");
        format!("Error: Predicted index {} not in [{}]", index, quoted)
    }
}

impl ErrorCode for ModelError {
    fn code(&self) -> i32 {
        match self {
            ModelError::ModelNotFound { .. } => ModelErrorCodes::MODEL_NOT_FOUND,
            ModelError::LoadFailed { .. } => ModelErrorCodes::LOAD_FAILED,
            ModelError::InferenceFailed { .. } => ModelErrorCodes::INFERENCE_FAILED,
            ModelError::InvalidOutput { .. } => ModelErrorCodes::INVALID_OUTPUT,
            ModelError::LabelOutOfRange { .. } => ModelErrorCodes::LABEL_OUT_OF_RANGE,
            ModelError::LockPoisoned { .. } => ModelErrorCodes::LOCK_POISONED,
        }
    }

    fn message(&self) -> String {
        match self {
            ModelError::ModelNotFound { model, path } => {
                format!("No {} model found at {}", model, path)
            }
            ModelError::LoadFailed { model, reason } => {
                format!("Error loading {} model: {}", model, reason)
            }
            ModelError::InferenceFailed { model, reason } => {
                format!("{} model inference failed: {}", model, reason)
            }
            ModelError::InvalidOutput { model, reason } => {
                format!("{} model returned invalid output: {}", model, reason)
            }
            ModelError::LabelOutOfRange { index, labels } => {
                let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
                Self::label_diagnostic(*index, &labels)
            }
            ModelError::LockPoisoned { model } => {
                format!("Session lock poisoned for {} model", model)
            }
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ModelError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ModelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_codes() {
        assert_eq!(
            ModelError::ModelNotFound {
                model: "age".to_string(),
                path: "x".to_string()
            }
            .code(),
            2001
        );
        assert_eq!(
            ModelError::LoadFailed {
                model: "age".to_string(),
                reason: "x".to_string()
            }
            .code(),
            2002
        );
        assert_eq!(
            ModelError::InferenceFailed {
                model: "age".to_string(),
                reason: "x".to_string()
            }
            .code(),
            2003
        );
        assert_eq!(
            ModelError::InvalidOutput {
                model: "age".to_string(),
                reason: "x".to_string()
            }
            .code(),
            2004
        );
        assert_eq!(
            ModelError::LabelOutOfRange {
                index: 9,
                labels: vec![]
            }
            .code(),
            2005
        );
        assert_eq!(
            ModelError::LockPoisoned {
                model: "age".to_string()
            }
            .code(),
            2006
        );
    }

    #[test]
    fn test_model_not_found_message() {
        let err = ModelError::ModelNotFound {
            model: "age".to_string(),
            path: "models/age_model.onnx".to_string(),
        };
        assert_eq!(err.message(), "No age model found at models/age_model.onnx");
    }

    #[test]
    fn test_label_diagnostic_lists_every_label() {
        let err = ModelError::LabelOutOfRange {
            index: 9,
            labels: vec!["angry".to_string(), "sad".to_string()],
        };
        assert_eq!(err.message(), "Error: Predicted index 9 not in ['angry', 'sad']");
    }
}
