use std::io::Cursor;
use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::debug;

use crate::state::SharedState;
use crate::handlers;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Names and values passed here are ASCII literals or sniffed MIME types.
fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).unwrap()
}

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    bytes_response(body.into_bytes(), "text/html; charset=utf-8")
}

pub fn bytes_response(bytes: Vec<u8>, content_type: &str) -> Response<Cursor<Vec<u8>>> {
    let len = bytes.len();
    Response::new(
        StatusCode(200),
        vec![
            header("Content-Type", content_type),
            header("Cache-Control", "no-store"),
        ],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

pub fn redirect(location: &str) -> Response<Cursor<Vec<u8>>> {
    Response::new(
        StatusCode(303),
        vec![header("Location", location), header("Content-Length", "0")],
        Cursor::new(Vec::new()),
        Some(0),
        None,
    )
}

pub fn no_content() -> Response<Cursor<Vec<u8>>> {
    Response::new(StatusCode(204), vec![], Cursor::new(Vec::new()), Some(0), None)
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = b"404 Not Found".to_vec();
    let len = body.len();
    Response::new(
        StatusCode(404),
        vec![header("Content-Type", "text/plain")],
        Cursor::new(body),
        Some(len),
        None,
    )
}

/// Value of the request's Content-Type header, or an empty string.
pub fn content_type(request: &Request) -> String {
    request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches incoming requests to the appropriate handler.
///
/// Handlers receive a `&mut Request` so that the dispatcher retains ownership
/// and can call `request.respond(response)` at the end.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url    = request.url().to_owned();
    let path   = url.split('?').next().unwrap_or("").to_owned();
    debug!(method = %method, path = %path, "request");

    // Preview images — dynamic path segment.
    if method == Method::Get {
        if let Some(id) = path.strip_prefix("/preview/") {
            let resp = handlers::preview::handle_get(id, state);
            let _ = request.respond(resp);
            return;
        }
    }

    let response = match (method, path.as_str()) {
        (Method::Get,  "/")            => handlers::page::handle_get(state),
        (Method::Post, "/plant")       => handlers::select::handle_plant(&mut request, state),
        (Method::Post, "/file")        => handlers::select::handle_file(&mut request, state),
        (Method::Post, "/predict")     => handlers::predict::handle_predict(state),
        (Method::Post, "/clear")       => handlers::clear::handle_clear(state),
        (Method::Post, "/clear/hover") => handlers::clear::handle_hover(&mut request, state),
        _ => not_found(),
    };

    let _ = request.respond(response);
}
