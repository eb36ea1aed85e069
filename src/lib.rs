// Voice Age Predictor - age group and emotion from a voice recording
// Pitch-gated MFCC pipeline over two pretrained ONNX classifiers

// Module declarations
pub mod analysis;
pub mod audio;
pub mod classifier;
pub mod config;
pub mod context;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod pipeline;
pub mod testing;
pub mod upload;

// Re-exports for convenience
pub use config::AppConfig;
pub use context::AppContext;
pub use pipeline::{Orchestrator, PipelineResult, PredictionReport};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber for the binaries
///
/// Honours `RUST_LOG` and defaults to `info`. `log` records from the library
/// are bridged into the same subscriber. Output goes to stderr so stdout
/// stays reserved for results. Calling this twice is a no-op.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
