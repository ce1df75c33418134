use crate::plant::Plant;
use crate::ui::preview::PreviewId;
use crate::ui::state::{ResultView, SelectedFile};

/// A discrete user action (or the completion of a predict run).
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A file was chosen; `preview` is the entry already acquired for it.
    SelectFile { file: SelectedFile, preview: PreviewId },
    /// Selector changed; `None` is the "Select a plant" option.
    SelectPlant(Option<Plant>),
    Predict,
    /// A predict run finished.
    PredictionFinished { run: u64, result: ResultView },
    Clear,
    ClearHover(bool),
}

/// Side effects a transition asks the shell to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Release a preview entry that is no longer shown.
    ReleasePreview(PreviewId),
    /// Render a fresh file input so the same file can be chosen again.
    ResetFileInput,
    /// Run the predict workflow and report back with `PredictionFinished`.
    StartPrediction { run: u64, plant: Plant, file: SelectedFile },
}
