//! The predict workflow: load → preprocess → infer, one step after another.
//!
//! Every failure is caught here, logged at its origin, and turned into the
//! string shown on the result line. Nothing escapes to the caller.

use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::loader::ModelSource;
use crate::plant::Plant;
use crate::predictor::{predict, Prediction};
use crate::preprocess::Preprocessor;

pub const GUIDANCE_MESSAGE: &str = "Please select an image and a plant.";
pub const MODEL_LOAD_FAILED: &str = "Error occurred during model loading.";
pub const PREPROCESS_FAILED: &str = "Error occurred while processing the image.";
pub const PREDICTION_FAILED: &str = "Error occurred during prediction.";

/// Why a predict run produced no scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    ModelLoad,
    Preprocess,
    Prediction,
}

impl Failure {
    pub fn message(&self) -> &'static str {
        match self {
            Failure::ModelLoad => MODEL_LOAD_FAILED,
            Failure::Preprocess => PREPROCESS_FAILED,
            Failure::Prediction => PREDICTION_FAILED,
        }
    }
}

pub type Outcome = Result<Prediction, Failure>;

#[derive(Clone)]
pub struct PredictWorkflow {
    source: Arc<dyn ModelSource>,
    preprocessor: Preprocessor,
    batch_size: usize,
}

impl PredictWorkflow {
    pub fn new(source: Arc<dyn ModelSource>, preprocessor: Preprocessor, batch_size: usize) -> Self {
        PredictWorkflow { source, preprocessor, batch_size }
    }

    #[instrument(skip(self, image), fields(bytes = image.len()))]
    pub fn run(&self, plant: Plant, image: &[u8]) -> Outcome {
        let model = self.source.load(plant).ok_or(Failure::ModelLoad)?;

        let tensor = self.preprocessor.preprocess(image, self.batch_size).map_err(|e| {
            error!(error = %e, "Error occurred while processing the image");
            Failure::Preprocess
        })?;

        let prediction = predict(&model, tensor).map_err(|_| Failure::Prediction)?;
        info!(plant = %plant, values = prediction.scores.len(), "prediction ready");
        Ok(prediction)
    }
}

impl PredictWorkflow {
    /// Filesystem-backed workflow as described by `config`.
    pub fn from_config(config: &crate::config::AppConfig) -> Self {
        let store = if config.cache_models {
            crate::loader::ModelStore::cached(&config.model_root)
        } else {
            crate::loader::ModelStore::new(&config.model_root)
        };
        PredictWorkflow::new(Arc::new(store), Preprocessor::new(config.input_size), config.batch_size)
    }
}
