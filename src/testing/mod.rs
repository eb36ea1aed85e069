//! Testability harness utilities.
//!
//! Deterministic audio sources and scripted models that stand in for real
//! recordings and trained networks, so the pipeline can be exercised end to
//! end without model artifacts on disk.

pub mod models;
pub mod signals;

pub use models::ScriptedModel;
pub use signals::{silence, sine, white_noise, write_silent_mp3, write_wav};
