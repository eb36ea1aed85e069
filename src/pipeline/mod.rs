// Pipeline module - per-recording orchestration
//
// Start → GatePassed | GateFailed → AgePredicted → EmotionPredicted | Skipped → Done
//
// The gate runs first; a rejected voice ends the request. Features are
// extracted once and shared by both classifiers. The emotion model only runs
// when the age stage reports a senior group.

mod outcome;

pub use outcome::{
    AgeOutcome, EmotionOutcome, PipelineResult, PipelineStage, PredictionReport,
    NON_QUALIFYING_VOICE, PROCESSING_ERROR, SENIOR_SUFFIX,
};

use std::path::Path;

use crate::analysis::{GateDecision, SAMPLE_RATE};
use crate::audio::{load_waveform, Waveform};
use crate::context::AppContext;
use crate::error::{log_audio_error, log_model_error, AudioError};
use crate::upload::UploadedAudio;

/// Runs recordings through gate, feature extraction and classifiers
pub struct Orchestrator {
    context: AppContext,
}

impl Orchestrator {
    pub fn new(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Predict from an in-memory waveform
    pub fn predict_waveform(&self, waveform: &Waveform) -> PipelineResult {
        self.run(Ok(waveform), "<waveform>")
    }

    /// Decode and predict from an audio file on disk
    pub fn predict_path(&self, path: &Path) -> PipelineResult {
        let source = path.display().to_string();
        let loaded = load_waveform(path, SAMPLE_RATE);
        self.run(loaded.as_ref(), &source)
    }

    /// Stage uploaded bytes, predict, and remove the staged file
    ///
    /// # Errors
    /// Only staging can fail; everything after it becomes an outcome string.
    pub fn predict_upload(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<PredictionReport, AudioError> {
        let upload = UploadedAudio::stage(&self.context.config().upload.temp_dir, filename, bytes)
            .inspect_err(|err| log_audio_error(err, "Orchestrator::predict_upload"))?;
        let result = self.predict_path(upload.path());
        Ok(PredictionReport::new(upload.original_name(), &result))
    }

    fn run(&self, waveform: Result<&Waveform, &AudioError>, source: &str) -> PipelineResult {
        let _span = tracing::info_span!("predict", source = %source).entered();
        let mut stages = vec![PipelineStage::Start];
        let mut advance = |stage: PipelineStage| {
            tracing::debug!(?stage, "pipeline transition");
            stages.push(stage);
        };

        let decision = match waveform {
            Ok(waveform) => self.context.gate().evaluate(waveform),
            Err(err) => {
                log_audio_error(err, source);
                log::warn!("[Pipeline] Gate skipped for undecodable input {}", source);
                GateDecision::Passed { mean_hz: None }
            }
        };

        if let GateDecision::Rejected { mean_hz } = decision {
            advance(PipelineStage::GateFailed);
            advance(PipelineStage::Done);
            return PipelineResult {
                age: AgeOutcome::GateRejected { mean_hz },
                emotion: None,
                stages,
            };
        }
        advance(PipelineStage::GatePassed);

        let features = match waveform {
            Ok(waveform) => self.context.extractor().extract(waveform),
            Err(err) => Err(err.clone()),
        };
        let features = match features {
            Ok(features) => features,
            Err(err) => {
                log::error!("[Pipeline] Feature extraction failed for {}: {}", source, err);
                advance(PipelineStage::Done);
                return PipelineResult {
                    age: AgeOutcome::ExtractionFailed,
                    emotion: None,
                    stages,
                };
            }
        };

        let age = match self.context.age_classifier().classify(&features) {
            Ok(prediction) => AgeOutcome::Predicted(prediction),
            Err(err) => {
                log_model_error(&err, source);
                advance(PipelineStage::Done);
                return PipelineResult {
                    age: AgeOutcome::Failed(err),
                    emotion: None,
                    stages,
                };
            }
        };
        advance(PipelineStage::AgePredicted);
        log::info!("[Pipeline] {}: {}", source, age.message());

        if !age.is_senior() {
            advance(PipelineStage::Skipped);
            advance(PipelineStage::Done);
            return PipelineResult {
                age,
                emotion: None,
                stages,
            };
        }

        let emotion = match self.context.emotion_classifier().classify(&features) {
            Ok(emotion) => EmotionOutcome::Predicted(emotion),
            Err(err) => {
                log_model_error(&err, source);
                EmotionOutcome::Failed(err)
            }
        };
        advance(PipelineStage::EmotionPredicted);
        advance(PipelineStage::Done);
        log::info!("[Pipeline] {}: {}", source, emotion.message());

        PipelineResult {
            age,
            emotion: Some(emotion),
            stages,
        }
    }
}
