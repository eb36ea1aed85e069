// Classifier module - pretrained age and emotion networks
//
// Both adapters batch a FeatureMatrix to (1, 40, 174), run the model, take
// the arg-max (first index on ties) and map it through a fixed label table.
// Out-of-range indices are errors, never a default label.
//
// Module organization:
// - labels: AgeGroup / EmotionClass tables
// - model: InferenceModel trait, OnnxModel, arg-max
// - age, emotion: adapters

mod age;
mod emotion;
mod labels;
mod model;

pub use age::{AgeClassifier, AgePrediction};
pub use emotion::EmotionClassifier;
pub use labels::{AgeGroup, EmotionClass, AGE_LABELS, EMOTION_LABELS};
pub use model::{argmax, InferenceModel, OnnxModel};
