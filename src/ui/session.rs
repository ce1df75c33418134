use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{error, info};

use crate::plant::Plant;
use crate::ui::event::{Effect, Event};
use crate::ui::preview::{PreviewHandle, PreviewRegistry};
use crate::ui::state::{ResultView, SelectedFile, UiState};
use crate::ui::update::update;
use crate::workflow::{Failure, PredictWorkflow};

/// A predict run handed out by [`Session::begin_predict`]. It owns copies of
/// its inputs, so it can execute without holding the session.
pub struct PendingRun {
    pub run: u64,
    pub plant: Plant,
    pub file: SelectedFile,
    workflow: PredictWorkflow,
}

impl PendingRun {
    /// Runs load → preprocess → infer and returns the event that reports it.
    /// A panic inside the run is reported as a prediction failure, so the
    /// session always leaves the loading state.
    pub fn execute(self) -> Event {
        let PendingRun { run, plant, file, workflow } = self;
        let outcome = catch_unwind(AssertUnwindSafe(|| workflow.run(plant, &file.bytes)))
            .unwrap_or_else(|_| {
                error!(run, plant = %plant, "predict run panicked");
                Err(Failure::Prediction)
            });
        Event::PredictionFinished { run, result: ResultView::from_outcome(plant, outcome) }
    }
}

/// One user's page: UI state plus the resources its effects act on.
///
/// The held preview is released when replaced, on clear, and when the
/// session is dropped.
pub struct Session {
    state: UiState,
    workflow: PredictWorkflow,
    previews: PreviewRegistry,
    preview: Option<PreviewHandle>,
}

impl Session {
    pub fn new(workflow: PredictWorkflow, previews: PreviewRegistry) -> Self {
        Session { state: UiState::default(), workflow, previews, preview: None }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Applies `event` and performs the resulting effects. A started
    /// prediction is returned instead of being run.
    pub fn dispatch(&mut self, event: Event) -> Option<PendingRun> {
        let transition = update(std::mem::take(&mut self.state), event);
        self.state = transition.state;

        let mut pending = None;
        for effect in transition.effects {
            match effect {
                Effect::ReleasePreview(id) => {
                    if self.preview.as_ref().map(PreviewHandle::id) == Some(id) {
                        self.preview = None;
                    }
                }
                Effect::ResetFileInput => {
                    info!(generation = self.state.file_input_generation, "file input reset");
                }
                Effect::StartPrediction { run, plant, file } => {
                    pending = Some(PendingRun { run, plant, file, workflow: self.workflow.clone() });
                }
            }
        }
        pending
    }

    pub fn select_file(&mut self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        let file = SelectedFile::new(name, bytes);
        let handle = self.previews.acquire(file.bytes.clone());
        let preview = handle.id();
        // The old handle, if any, is dropped by the ReleasePreview effect.
        self.dispatch(Event::SelectFile { file, preview });
        self.preview = Some(handle);
    }

    pub fn select_plant(&mut self, plant: Option<Plant>) {
        self.dispatch(Event::SelectPlant(plant));
    }

    pub fn hover_clear(&mut self, hovered: bool) {
        self.dispatch(Event::ClearHover(hovered));
    }

    pub fn clear(&mut self) {
        self.dispatch(Event::Clear);
    }

    /// Starts a predict run if the action is enabled. With a missing file or
    /// plant this records the guidance message and returns `None`.
    pub fn begin_predict(&mut self) -> Option<PendingRun> {
        self.dispatch(Event::Predict)
    }

    pub fn finish_predict(&mut self, finished: Event) {
        self.dispatch(finished);
    }

    /// Runs the whole predict action in place.
    pub fn predict(&mut self) {
        if let Some(run) = self.begin_predict() {
            let finished = run.execute();
            self.finish_predict(finished);
        }
    }
}
