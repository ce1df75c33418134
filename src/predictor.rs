//! Predictor: runs a model handle on a preprocessed tensor and shapes the
//! raw output for display.

use tracing::{debug, error};

use crate::error::PredictError;
use crate::plant::Plant;
use crate::math::tensor::Tensor;
use crate::network::Network;

/// Raw scores of one inference run.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Output values, row-major over `[batch, classes]`.
    pub scores: Vec<f32>,
    /// Values per batch row.
    pub classes: usize,
    /// Class names from the model metadata, when it carries any.
    pub labels: Option<Vec<String>>,
}

impl Prediction {
    /// The single result line shown to the user: every score, comma-separated.
    pub fn result_line(&self) -> String {
        self.scores.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(",")
    }

    /// Index and score of the best class in the first batch row.
    pub fn best(&self) -> Option<(usize, f32)> {
        self.scores
            .get(..self.classes)?
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
    }

    /// `"<label> (<pct>%)"` for the best class, only when labels exist.
    pub fn top_label(&self) -> Option<String> {
        let (index, score) = self.best()?;
        let label = self.labels.as_ref()?.get(index)?;
        Some(format!("{} ({:.1}%)", label, score * 100.0))
    }
}

/// The best class of a labelled prediction, phrased for the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    /// `"The <plant> plant is <label>"`.
    pub summary: String,
    /// Reference text for the class, or a fallback when none exists.
    pub description: &'static str,
}

impl Prediction {
    /// Diagnosis for the first batch row, only when labels exist.
    pub fn diagnosis(&self, plant: Plant) -> Option<Diagnosis> {
        let (index, _) = self.best()?;
        let label = self.labels.as_ref()?.get(index)?;
        Some(Diagnosis {
            summary: format!("The {} plant is {}", plant.display_name(), label),
            description: plant.disease_description(label),
        })
    }
}

/// Runs `model` on `input`.
pub fn predict(model: &Network, input: Tensor) -> Result<Prediction, PredictError> {
    let classes: usize = model.output_shape().iter().product();
    match model.predict(input) {
        Ok(scores) => {
            debug!(values = scores.len(), "inference finished");
            Ok(Prediction { scores, classes, labels: model.metadata.output_labels.clone() })
        }
        Err(e) => {
            error!(error = %e, "Error occurred during prediction");
            Err(e)
        }
    }
}
