//! Server-side table of image previews.
//!
//! Each selected file gets an entry served to the browser under
//! `/preview/<id>`. Entries are owned through [`PreviewHandle`], which
//! removes its entry when dropped, so a replaced or torn-down preview never
//! lingers in the table.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreviewId(pub u64);

impl fmt::Display for PreviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bytes and MIME type of one preview.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub content_type: String,
    pub bytes: Arc<[u8]>,
}

#[derive(Default)]
struct Table {
    next: AtomicU64,
    entries: Mutex<HashMap<PreviewId, Preview>>,
}

/// Cloneable handle to the shared preview table.
#[derive(Clone, Default)]
pub struct PreviewRegistry {
    table: Arc<Table>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `bytes` and returns the guard that owns the entry.
    pub fn acquire(&self, bytes: Arc<[u8]>) -> PreviewHandle {
        let id = PreviewId(self.table.next.fetch_add(1, Ordering::Relaxed) + 1);
        let preview = Preview { content_type: content_type_for(&bytes).to_owned(), bytes };
        if let Ok(mut entries) = self.table.entries.lock() {
            entries.insert(id, preview);
        }
        debug!(preview = %id, "preview acquired");
        PreviewHandle { id, registry: self.clone() }
    }

    pub fn get(&self, id: PreviewId) -> Option<Preview> {
        self.table.entries.lock().ok()?.get(&id).cloned()
    }

    /// Number of live previews.
    pub fn len(&self) -> usize {
        self.table.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, id: PreviewId) {
        if let Ok(mut entries) = self.table.entries.lock() {
            if entries.remove(&id).is_some() {
                debug!(preview = %id, "preview released");
            }
        }
    }
}

/// Owns one preview entry; dropping it releases the entry.
pub struct PreviewHandle {
    id: PreviewId,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn id(&self) -> PreviewId {
        self.id
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PreviewHandle").field(&self.id).finish()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

/// MIME type for an uploaded image, sniffed from its magic bytes.
pub fn content_type_for(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Png) => "image/png",
        Ok(image::ImageFormat::Jpeg) => "image/jpeg",
        Ok(image::ImageFormat::Gif) => "image/gif",
        Ok(image::ImageFormat::Bmp) => "image/bmp",
        Ok(image::ImageFormat::WebP) => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_drop_releases_entry() {
        let registry = PreviewRegistry::new();
        let handle = registry.acquire(Arc::from(&b"abc"[..]));
        let id = handle.id();
        assert!(registry.get(id).is_some());
        drop(handle);
        assert!(registry.get(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let registry = PreviewRegistry::new();
        let a = registry.acquire(Arc::from(&b"a"[..]));
        let b = registry.acquire(Arc::from(&b"b"[..]));
        assert_ne!(a.id(), b.id());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_content_type_sniffing() {
        assert_eq!(content_type_for(b"\x89PNG\r\n\x1a\n...."), "image/png");
        assert_eq!(content_type_for(b"plain text"), "application/octet-stream");
    }
}
