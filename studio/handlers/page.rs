use std::io::Cursor;
use tiny_http::Response;

use crate::render::render_page;
use crate::state::{lock, SharedState};

/// `GET /`
pub fn handle_get(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let html = {
        let st = lock(&state);
        render_page(st.session.state())
    };
    crate::routes::html_response(html)
}
