// Startup error: anything that stops the predictor from being assembled

use crate::error::{AnalysisError, ErrorCode, ModelError};
use std::fmt;

/// Failure while building the application context
///
/// Carries the underlying error unchanged, so its code and message are
/// reported as-is.
#[derive(Debug)]
pub enum StartupError {
    /// A configuration value the analysis components cannot work with
    Config(AnalysisError),
    Model(ModelError),
}

impl ErrorCode for StartupError {
    fn code(&self) -> i32 {
        match self {
            StartupError::Config(err) => err.code(),
            StartupError::Model(err) => err.code(),
        }
    }

    fn message(&self) -> String {
        match self {
            StartupError::Config(err) => err.message(),
            StartupError::Model(err) => err.message(),
        }
    }
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::Config(err) => write!(f, "{}", err),
            StartupError::Model(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartupError::Config(err) => Some(err),
            StartupError::Model(err) => Some(err),
        }
    }
}

impl From<AnalysisError> for StartupError {
    fn from(err: AnalysisError) -> Self {
        StartupError::Config(err)
    }
}

impl From<ModelError> for StartupError {
    fn from(err: ModelError) -> Self {
        StartupError::Model(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_error_keeps_inner_code() {
        let config: StartupError = AnalysisError::InvalidParameters {
            reason: "n_fft must be even".to_string(),
        }
        .into();
        assert_eq!(config.code(), 3001);
        assert!(config.message().contains("n_fft must be even"));

        let model: StartupError = ModelError::ModelNotFound {
            model: "age".to_string(),
            path: "models/age_model.onnx".to_string(),
        }
        .into();
        assert_eq!(model.code(), 2001);
        assert_eq!(model.to_string(), model_display());
    }

    fn model_display() -> String {
        ModelError::ModelNotFound {
            model: "age".to_string(),
            path: "models/age_model.onnx".to_string(),
        }
        .to_string()
    }
}
