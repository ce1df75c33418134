use std::io::{Cursor, Read};
use tiny_http::{Request, Response};
use tracing::{info, warn};

use plant_doctor::Plant;

use crate::state::{lock, SharedState};
use crate::util::form::{form_get, parse_form};
use crate::util::multipart::{extract_boundary, extract_file};

/// Largest accepted upload body.
const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

// ---------------------------------------------------------------------------
// POST /plant
// ---------------------------------------------------------------------------

pub fn handle_plant(request: &mut Request, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);
    let pairs = parse_form(&body);
    let value = form_get(&pairs, "plant").unwrap_or("");

    match Plant::from_selector(value) {
        Ok(plant) => {
            info!(plant = ?plant, "plant selected");
            lock(&state).session.select_plant(plant);
        }
        Err(e) => warn!(error = %e, "ignoring plant selection"),
    }
    crate::routes::redirect("/")
}

// ---------------------------------------------------------------------------
// POST /file
// ---------------------------------------------------------------------------

pub fn handle_file(request: &mut Request, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let content_type = crate::routes::content_type(request);
    let Some(boundary) = extract_boundary(&content_type) else {
        warn!(content_type = %content_type, "file upload is not multipart");
        return crate::routes::redirect("/");
    };

    let body = match read_limited(request.as_reader(), MAX_UPLOAD_BYTES) {
        Ok(Some(body)) => body,
        Ok(None) => {
            warn!(limit = MAX_UPLOAD_BYTES, "upload too large; ignored");
            return crate::routes::redirect("/");
        }
        Err(e) => {
            warn!(error = %e, "failed to read upload body");
            return crate::routes::redirect("/");
        }
    };

    // Only the advertised MIME type is checked here; content is validated
    // when the image is decoded at predict time.
    match extract_file(&body, &boundary, "image_file") {
        Some(part) if part.is_image() => {
            info!(file = %part.filename, bytes = part.bytes.len(), "file selected");
            lock(&state).session.select_file(part.filename, part.bytes);
        }
        Some(part) => warn!(
            file = %part.filename,
            content_type = part.content_type.as_deref().unwrap_or(""),
            "upload is not an image; ignored"
        ),
        None => warn!("upload carried no file"),
    }
    crate::routes::redirect("/")
}

/// Reads at most `limit` bytes. Returns `None` when the body is longer.
fn read_limited<R: Read + ?Sized>(reader: &mut R, limit: u64) -> std::io::Result<Option<Vec<u8>>> {
    let mut body = Vec::new();
    <&mut R as Read>::take(reader, limit + 1).read_to_end(&mut body)?;
    Ok((body.len() as u64 <= limit).then_some(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_limited_rejects_oversized_body() {
        let data = vec![7u8; 10];
        assert_eq!(read_limited(&mut &data[..], 10).unwrap(), Some(data.clone()));
        assert_eq!(read_limited(&mut &data[..], 9).unwrap(), None);
        assert_eq!(read_limited(&mut &b""[..], 0).unwrap(), Some(Vec::new()));
    }
}
