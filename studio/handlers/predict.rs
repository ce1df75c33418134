use std::io::Cursor;
use tiny_http::Response;
use tracing::debug;

use crate::state::{lock, SharedState};

/// `POST /predict`
///
/// The run executes outside the lock; meanwhile `is_loading` keeps the
/// action disabled for every other request.
pub fn handle_predict(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let pending = lock(&state).session.begin_predict();

    if let Some(run) = pending {
        debug!(run = run.run, plant = %run.plant, "predict run started");
        let finished = run.execute();
        lock(&state).session.finish_predict(finished);
    }
    crate::routes::redirect("/")
}
