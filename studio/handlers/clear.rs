use std::io::{Cursor, Read};
use tiny_http::{Request, Response};

use crate::state::{lock, SharedState};
use crate::util::form::{form_get, parse_form};

/// `POST /clear`
pub fn handle_clear(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    lock(&state).session.clear();
    crate::routes::redirect("/")
}

/// `POST /clear/hover` with `hovered=true|false`.
pub fn handle_hover(request: &mut Request, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);
    let pairs = parse_form(&body);
    let hovered = form_get(&pairs, "hovered") == Some("true");
    lock(&state).session.hover_clear(hovered);
    crate::routes::no_content()
}
