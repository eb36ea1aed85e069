// Audio error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Audio error code constants
///
/// Single source of truth for the numeric codes reported by the CLI and the
/// upload endpoint.
///
/// Error code range: 1001-1006
pub struct AudioErrorCodes {}

impl AudioErrorCodes {
    /// Audio file could not be opened or read
    pub const OPEN_FAILED: i32 = 1001;

    /// Container or codec not supported
    pub const UNSUPPORTED_FORMAT: i32 = 1002;

    /// Decoder failed mid-stream
    pub const DECODE_FAILED: i32 = 1003;

    /// Stream decoded to zero samples
    pub const EMPTY_STREAM: i32 = 1004;

    /// Sample rate conversion failed
    pub const RESAMPLE_FAILED: i32 = 1005;

    /// Upload staging (temporary file) failed
    pub const STAGING_FAILED: i32 = 1006;
}

/// Log an audio error with structured context
///
/// Logs the error code, the component and the message together with the
/// caller-supplied context (usually the file identifier).
pub fn log_audio_error(err: &AudioError, context: &str) {
    error!(
        "Audio error in {}: code={}, component=AudioLoader, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Audio-related errors
///
/// These errors cover decoding an uploaded file into a waveform: opening,
/// probing, decoding, resampling, and staging the upload on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// File could not be opened
    OpenFailed { path: String, reason: String },

    /// Container/codec not recognised or no decodable audio track
    UnsupportedFormat { reason: String },

    /// Decoder returned a fatal error
    DecodeFailed { reason: String },

    /// No samples were produced
    EmptyStream { source_id: String },

    /// Resampler construction or processing failed
    ResampleFailed { reason: String },

    /// Temporary upload file could not be created or written
    StagingFailed { reason: String },
}

impl ErrorCode for AudioError {
    fn code(&self) -> i32 {
        match self {
            AudioError::OpenFailed { .. } => AudioErrorCodes::OPEN_FAILED,
            AudioError::UnsupportedFormat { .. } => AudioErrorCodes::UNSUPPORTED_FORMAT,
            AudioError::DecodeFailed { .. } => AudioErrorCodes::DECODE_FAILED,
            AudioError::EmptyStream { .. } => AudioErrorCodes::EMPTY_STREAM,
            AudioError::ResampleFailed { .. } => AudioErrorCodes::RESAMPLE_FAILED,
            AudioError::StagingFailed { .. } => AudioErrorCodes::STAGING_FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            AudioError::OpenFailed { path, reason } => {
                format!("Failed to open {}: {}", path, reason)
            }
            AudioError::UnsupportedFormat { reason } => {
                format!("Unsupported audio format: {}", reason)
            }
            AudioError::DecodeFailed { reason } => {
                format!("Audio decoding failed: {}", reason)
            }
            AudioError::EmptyStream { source_id } => {
                format!("No audio samples decoded from {}", source_id)
            }
            AudioError::ResampleFailed { reason } => {
                format!("Resampling failed: {}", reason)
            }
            AudioError::StagingFailed { reason } => {
                format!("Failed to stage upload: {}", reason)
            }
        }
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AudioError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AudioError {}

impl From<std::io::Error> for AudioError {
    fn from(err: std::io::Error) -> Self {
        AudioError::StagingFailed {
            reason: err.to_string(),
        }
    }
}
