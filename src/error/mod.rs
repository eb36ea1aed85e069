// Error types for the voice age predictor
//
// This module defines custom error types for audio decoding, pitch analysis
// and model inference, providing structured error handling with numeric codes
// that the CLI and HTTP front ends can report alongside the message. Startup
// failures wrap whichever of these stopped the context from being built.

mod analysis;
mod audio;
mod model;
mod startup;

pub use analysis::{log_analysis_error, AnalysisError, AnalysisErrorCodes};
pub use audio::{log_audio_error, AudioError, AudioErrorCodes};
pub use model::{log_model_error, ModelError, ModelErrorCodes};
pub use startup::StartupError;

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent reporting across front ends.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
