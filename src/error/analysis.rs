// Analysis error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Analysis error code constants
///
/// Error code range: 3001-3002
pub struct AnalysisErrorCodes {}

impl AnalysisErrorCodes {
    /// Pitch search parameters cannot produce a valid lag range
    pub const INVALID_PARAMETERS: i32 = 3001;

    /// Waveform contains NaN or infinite samples
    pub const NON_FINITE_INPUT: i32 = 3002;
}

/// Log an analysis error with structured context
pub fn log_analysis_error(err: &AnalysisError, context: &str) {
    error!(
        "Analysis error in {}: code={}, component=PitchGate, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Pitch analysis errors
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    InvalidParameters { reason: String },

    /// First offending sample index
    NonFiniteInput { index: usize },
}

impl ErrorCode for AnalysisError {
    fn code(&self) -> i32 {
        match self {
            AnalysisError::InvalidParameters { .. } => AnalysisErrorCodes::INVALID_PARAMETERS,
            AnalysisError::NonFiniteInput { .. } => AnalysisErrorCodes::NON_FINITE_INPUT,
        }
    }

    fn message(&self) -> String {
        match self {
            AnalysisError::InvalidParameters { reason } => {
                format!("Invalid pitch tracking parameters: {}", reason)
            }
            AnalysisError::NonFiniteInput { index } => {
                format!("Non-finite sample at index {}", index)
            }
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AnalysisError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AnalysisError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_error_codes() {
        let invalid = AnalysisError::InvalidParameters {
            reason: "fmin above fmax".to_string(),
        };
        assert_eq!(invalid.code(), 3001);
        assert!(invalid.to_string().contains("fmin above fmax"));

        let nan = AnalysisError::NonFiniteInput { index: 12 };
        assert_eq!(nan.code(), 3002);
        assert_eq!(nan.message(), "Non-finite sample at index 12");
    }
}
