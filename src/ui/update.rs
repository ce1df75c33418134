use tracing::debug;

use crate::ui::event::{Effect, Event};
use crate::ui::state::{ResultView, UiState};

/// New state plus the effects it requires.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: UiState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn quiet(state: UiState) -> Self {
        Transition { state, effects: Vec::new() }
    }
}

/// Pure transition function: current state + event → next state + effects.
pub fn update(mut state: UiState, event: Event) -> Transition {
    debug!(?event, phase = ?state.phase(), "ui event");
    match event {
        Event::SelectFile { file, preview } => {
            let mut effects = Vec::new();
            if let Some(old) = state.preview.replace(preview) {
                if old != preview {
                    effects.push(Effect::ReleasePreview(old));
                }
            }
            state.selected_file = Some(file);
            Transition { state, effects }
        }

        Event::SelectPlant(plant) => {
            state.selected_plant = plant;
            Transition::quiet(state)
        }

        Event::Predict => {
            if state.is_loading {
                // Action is disabled while a run is in flight.
                return Transition::quiet(state);
            }
            match (state.selected_file.clone(), state.selected_plant) {
                (Some(file), Some(plant)) => {
                    state.last_run += 1;
                    let run = state.last_run;
                    state.pending_run = Some(run);
                    state.is_loading = true;
                    Transition { state, effects: vec![Effect::StartPrediction { run, plant, file }] }
                }
                _ => {
                    state.prediction = Some(ResultView::guidance());
                    Transition::quiet(state)
                }
            }
        }

        Event::PredictionFinished { run, result } => {
            if state.pending_run != Some(run) {
                // Superseded by a clear.
                return Transition::quiet(state);
            }
            state.pending_run = None;
            state.is_loading = false;
            state.prediction = Some(result);
            Transition::quiet(state)
        }

        Event::Clear => {
            let mut effects = Vec::new();
            if let Some(old) = state.preview.take() {
                effects.push(Effect::ReleasePreview(old));
            }
            effects.push(Effect::ResetFileInput);
            let next = UiState {
                file_input_generation: state.file_input_generation + 1,
                last_run: state.last_run,
                ..UiState::default()
            };
            Transition { state: next, effects }
        }

        Event::ClearHover(hovered) => {
            state.is_clear_hovered = hovered;
            Transition::quiet(state)
        }
    }
}
