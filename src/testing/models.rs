//! Scripted stand-ins for the trained networks.

use ndarray::Array3;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::analysis::{MAX_FRAMES, N_MFCC};
use crate::classifier::InferenceModel;
use crate::error::ModelError;

/// Model that returns fixed scores and counts its invocations
///
/// The call counter is shared, so a test can keep a handle after the model
/// has been boxed into a classifier.
pub struct ScriptedModel {
    name: String,
    scores: Vec<f32>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl ScriptedModel {
    /// One-hot scores over `n_outputs` classes with the peak at `index`
    pub fn new(name: &str, n_outputs: usize, index: usize) -> Self {
        assert!(index < n_outputs, "index {} outside {} outputs", index, n_outputs);
        let mut scores = vec![0.0; n_outputs];
        scores[index] = 1.0;
        Self::with_scores(name, scores)
    }

    pub fn with_scores(name: &str, scores: Vec<f32>) -> Self {
        Self {
            name: name.to_string(),
            scores,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Model whose every forward pass fails
    pub fn failing(name: &str) -> Self {
        Self {
            fail: true,
            ..Self::with_scores(name, Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl InferenceModel for ScriptedModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, input: &Array3<f32>) -> Result<Vec<f32>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if input.dim() != (1, N_MFCC, MAX_FRAMES) {
            return Err(ModelError::InferenceFailed {
                model: self.name.clone(),
                reason: format!("unexpected input shape {:?}", input.dim()),
            });
        }
        if self.fail {
            return Err(ModelError::InferenceFailed {
                model: self.name.clone(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(self.scores.clone())
    }
}
