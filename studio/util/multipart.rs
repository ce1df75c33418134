/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`, returning the pieces
/// between occurrences (excluding the needle itself).
pub fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        if let Some(pos) = find_subsequence(&haystack[start..], needle) {
            result.push(&haystack[start..start + pos]);
            start += pos + needle.len();
        } else {
            result.push(&haystack[start..]);
            break;
        }
    }
    result
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(|s| s.trim())
        .find(|s| s.starts_with("boundary="))
        .map(|s| s["boundary=".len()..].trim_matches('"').to_owned())
}

/// One uploaded file from a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub filename: String,
    /// The part's own `Content-Type`, as advertised by the browser.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// True when the part was sent with an `image/*` MIME type.
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .map_or(false, |ct| ct.to_ascii_lowercase().starts_with("image/"))
    }
}

/// Extracts the file part whose `name="<field_name>"` matches.
///
/// Returns `None` when the field is absent or the browser sent it without a
/// file (empty filename and body).
pub fn extract_file(body: &[u8], boundary: &str, field_name: &str) -> Option<FilePart> {
    let delimiter = format!("--{}", boundary);
    let parts = split_on(body, delimiter.as_bytes());

    for part in parts {
        let sep = b"\r\n\r\n";
        let Some(sep_pos) = find_subsequence(part, sep) else { continue };
        let headers = String::from_utf8_lossy(&part[..sep_pos]);
        if !headers.contains(&format!("name=\"{}\"", field_name)) {
            continue;
        }
        let Some(filename) = quoted_attr(&headers, "filename=\"") else { continue };
        let content_type = header_value(&headers, "content-type");

        let raw = &part[sep_pos + sep.len()..];
        let bytes = raw.strip_suffix(b"\r\n").unwrap_or(raw).to_vec();
        if filename.is_empty() && bytes.is_empty() {
            return None;
        }
        return Some(FilePart { filename, content_type, bytes });
    }
    None
}

/// Value of the header line named `name` (case-insensitive) in a part's
/// header block.
fn header_value(headers: &str, name: &str) -> Option<String> {
    headers.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim().eq_ignore_ascii_case(name).then(|| value.trim().to_owned())
    })
}

/// Reads the value of `key"..."` from a header block.
fn quoted_attr(headers: &str, key: &str) -> Option<String> {
    let pos = headers.find(key)?;
    let rest = &headers[pos + key.len()..];
    let end = rest.find('"')?;
    Some(rest[..end].to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(filename: &str, data: &[u8]) -> Vec<u8> {
        body_with_type(filename, "image/png", data)
    }

    fn body_with_type(filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"--XyZ\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n");
        out.extend_from_slice(
            format!(
                "--XyZ\r\nContent-Disposition: form-data; name=\"image_file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                filename, content_type
            )
            .as_bytes(),
        );
        out.extend_from_slice(data);
        out.extend_from_slice(b"\r\n--XyZ--\r\n");
        out
    }

    #[test]
    fn test_extract_boundary() {
        assert_eq!(
            extract_boundary("multipart/form-data; boundary=\"XyZ\"").as_deref(),
            Some("XyZ")
        );
        assert_eq!(extract_boundary("text/plain"), None);
    }

    #[test]
    fn test_extract_file() {
        let part = extract_file(&body("leaf.png", b"\x89PNG\r\n\x00\x01"), "XyZ", "image_file").unwrap();
        assert_eq!(part.filename, "leaf.png");
        assert_eq!(part.bytes, b"\x89PNG\r\n\x00\x01");
        assert_eq!(part.content_type.as_deref(), Some("image/png"));
        assert!(part.is_image());
    }

    #[test]
    fn test_non_image_part_is_flagged() {
        let part = extract_file(&body_with_type("notes.txt", "text/plain", b"hi"), "XyZ", "image_file").unwrap();
        assert_eq!(part.content_type.as_deref(), Some("text/plain"));
        assert!(!part.is_image());

        let jpeg = extract_file(&body_with_type("leaf.JPG", "IMAGE/JPEG", b"x"), "XyZ", "image_file").unwrap();
        assert!(jpeg.is_image());
    }

    #[test]
    fn test_empty_file_input_is_none() {
        assert_eq!(extract_file(&body("", b""), "XyZ", "image_file"), None);
        assert_eq!(extract_file(&body("a.png", b"x"), "XyZ", "other"), None);
    }

    #[test]
    fn test_split_on() {
        assert_eq!(split_on(b"a--b--c", b"--"), vec![&b"a"[..], &b"b"[..], &b"c"[..]]);
    }
}
