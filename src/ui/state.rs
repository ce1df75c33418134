use std::sync::Arc;

use crate::plant::Plant;
use crate::predictor::{Diagnosis, Prediction};
use crate::ui::preview::PreviewId;
use crate::workflow::{Failure, GUIDANCE_MESSAGE};

/// An uploaded file as chosen in the file input.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        SelectedFile { name: name.into(), bytes: bytes.into() }
    }
}

/// What the result line shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    /// Raw scores, plus the best label and its diagnosis when the model
    /// names its classes.
    Scores { line: String, top_label: Option<String>, diagnosis: Option<Diagnosis> },
    /// Guidance or error text.
    Message(&'static str),
}

impl ResultView {
    pub fn guidance() -> Self {
        ResultView::Message(GUIDANCE_MESSAGE)
    }

    pub fn text(&self) -> &str {
        match self {
            ResultView::Scores { line, .. } => line,
            ResultView::Message(msg) => msg,
        }
    }
}

impl ResultView {
    /// What a finished run for `plant` displays.
    pub fn from_outcome(plant: Plant, outcome: Result<Prediction, Failure>) -> Self {
        match outcome {
            Ok(p) => ResultView::Scores {
                line: p.result_line(),
                top_label: p.top_label(),
                diagnosis: p.diagnosis(plant),
            },
            Err(f) => ResultView::Message(f.message()),
        }
    }
}

/// Coarse lifecycle phase derived from [`UiState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FileSelected,
    PlantAndFileSelected,
    Predicting,
    ResultShown,
}

/// Everything the page renders from. Mutated only through
/// [`crate::ui::update`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiState {
    pub selected_file: Option<SelectedFile>,
    pub selected_plant: Option<Plant>,
    pub prediction: Option<ResultView>,
    pub is_loading: bool,
    pub preview: Option<PreviewId>,
    pub is_clear_hovered: bool,
    /// Bumped on every clear so the rendered file input is a fresh control.
    pub file_input_generation: u64,
    /// Id of the run whose result is awaited, if any.
    pub pending_run: Option<u64>,
    /// Last run id handed out.
    pub last_run: u64,
}

impl UiState {
    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Predicting
        } else if self.prediction.is_some() {
            Phase::ResultShown
        } else {
            match (&self.selected_file, self.selected_plant) {
                (Some(_), Some(_)) => Phase::PlantAndFileSelected,
                (Some(_), None) => Phase::FileSelected,
                _ => Phase::Idle,
            }
        }
    }

    /// The Predict action is enabled only with both inputs set and no run in flight.
    pub fn can_predict(&self) -> bool {
        self.selected_file.is_some() && self.selected_plant.is_some() && !self.is_loading
    }

    /// The Clear action is offered once a file is selected.
    pub fn can_clear(&self) -> bool {
        self.selected_file.is_some()
    }

    pub fn predict_label(&self) -> &'static str {
        if self.is_loading { "Predicting..." } else { "Predict" }
    }

    pub fn clear_label(&self) -> &'static str {
        if self.is_clear_hovered { "Clear" } else { "x" }
    }

    /// True when every user-facing field holds its default value.
    pub fn is_reset(&self) -> bool {
        self.selected_file.is_none()
            && self.selected_plant.is_none()
            && self.prediction.is_none()
            && !self.is_loading
            && self.preview.is_none()
            && !self.is_clear_hovered
            && self.pending_run.is_none()
    }
}
