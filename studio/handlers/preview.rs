use std::io::Cursor;
use tiny_http::Response;

use plant_doctor::ui::PreviewId;

use crate::state::{lock, SharedState};

/// `GET /preview/{id}`
///
/// Serves the bytes of a live preview; released previews are gone.
pub fn handle_get(id: &str, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let Ok(id) = id.parse::<u64>() else {
        return crate::routes::not_found();
    };
    let previews = lock(&state).previews.clone();
    match previews.get(PreviewId(id)) {
        Some(preview) => crate::routes::bytes_response(preview.bytes.to_vec(), &preview.content_type),
        None => crate::routes::not_found(),
    }
}
