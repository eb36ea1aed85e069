// Model module - inference backends behind a common trait
//
// `OnnxModel` wraps an ONNX Runtime session. The runtime needs exclusive
// access for each run, so the session sits behind a mutex; the model itself
// is loaded once and shared read-only afterwards.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array3;
use ort::session::Session;
use ort::value::Tensor;

use crate::analysis::FeatureMatrix;
use crate::error::ModelError;

/// A classifier network: batched features in, class scores out
pub trait InferenceModel: Send + Sync {
    /// Short identifier used in logs and errors ("age", "emotion")
    fn name(&self) -> &str;

    /// Run one forward pass
    ///
    /// # Arguments
    /// * `input` - batch of shape (1, N_MFCC, MAX_FRAMES)
    ///
    /// # Returns
    /// Class scores for the single batch item
    fn predict(&self, input: &Array3<f32>) -> Result<Vec<f32>, ModelError>;
}

/// ONNX Runtime backed model
pub struct OnnxModel {
    name: String,
    session: Mutex<Session>,
}

impl OnnxModel {
    /// Load a model artifact from disk
    ///
    /// # Errors
    /// `ModelNotFound` when nothing exists at `path`, `LoadFailed` when the
    /// runtime rejects the file.
    pub fn load(name: &str, path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::ModelNotFound {
                model: name.to_string(),
                path: path.display().to_string(),
            });
        }

        let session = Session::builder()
            .and_then(|b| b.with_intra_threads(1))
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| ModelError::LoadFailed {
                model: name.to_string(),
                reason: e.to_string(),
            })?;

        log::info!("[Classifier] Loaded {} model from {:?}", name, path);

        Ok(Self {
            name: name.to_string(),
            session: Mutex::new(session),
        })
    }
}

impl InferenceModel for OnnxModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, input: &Array3<f32>) -> Result<Vec<f32>, ModelError> {
        let inference_failed = |reason: String| ModelError::InferenceFailed {
            model: self.name.clone(),
            reason,
        };

        let input_tensor = Tensor::from_array(input.clone())
            .map_err(|e| inference_failed(format!("tensor creation: {}", e)))?;

        let mut session = self.session.lock().map_err(|_| ModelError::LockPoisoned {
            model: self.name.clone(),
        })?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| inference_failed(e.to_string()))?;

        let (_, first_value) =
            outputs
                .iter()
                .next()
                .ok_or_else(|| ModelError::InvalidOutput {
                    model: self.name.clone(),
                    reason: "model produced no output".to_string(),
                })?;

        let (_shape, scores) =
            first_value
                .try_extract_tensor::<f32>()
                .map_err(|e| ModelError::InvalidOutput {
                    model: self.name.clone(),
                    reason: e.to_string(),
                })?;

        Ok(scores.to_vec())
    }
}

/// Index of the largest score; ties keep the first index
///
/// Returns `None` for an empty slice. NaN scores never win.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| i)
}

/// Batch the features, run the model and take the arg-max index
pub(crate) fn predict_index(
    model: &dyn InferenceModel,
    features: &FeatureMatrix,
) -> Result<usize, ModelError> {
    let scores = model.predict(&features.to_batch())?;
    argmax(&scores).ok_or_else(|| ModelError::InvalidOutput {
        model: model.name().to_string(),
        reason: "empty score vector".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;

    #[test]
    fn test_argmax_first_tie_wins() {
        assert_eq!(argmax(&[0.1, 0.7, 0.7, 0.2]), Some(1));
        assert_eq!(argmax(&[0.5]), Some(0));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_argmax_skips_nan() {
        assert_eq!(argmax(&[f32::NAN, 0.2, 0.9]), Some(2));
        assert_eq!(argmax(&[f32::NAN]), None);
    }

    #[test]
    fn test_missing_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("age_model.onnx");
        match OnnxModel::load("age", &path) {
            Err(ModelError::ModelNotFound { model, .. }) => assert_eq!(model, "age"),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("loading a missing file must fail"),
        }
    }

    #[test]
    fn test_unloadable_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emotion_model.onnx");
        std::fs::write(&path, b"not an onnx graph").unwrap();
        assert!(matches!(
            OnnxModel::load("emotion", &path),
            Err(ModelError::LoadFailed { .. })
        ));
    }

    #[test]
    fn test_predict_index_uses_model_scores() {
        let model = ScriptedModel::new("age", 8, 5);
        let index = predict_index(&model, &FeatureMatrix::zeros()).unwrap();
        assert_eq!(index, 5);
        assert_eq!(model.calls(), 1);
    }

    #[test]
    fn test_predict_index_rejects_empty_output() {
        let model = ScriptedModel::with_scores("age", Vec::new());
        assert!(matches!(
            predict_index(&model, &FeatureMatrix::zeros()),
            Err(ModelError::InvalidOutput { .. })
        ));
    }
}
