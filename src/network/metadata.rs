use serde::{Deserialize, Serialize};

/// Optional annotations attached to a packaged model.
/// All fields are Option<> so descriptors without metadata deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    pub description: Option<String>,
    /// Human-readable class labels for the output layer. No label mapping is
    /// assumed when this is absent.
    pub output_labels: Option<Vec<String>>,
}

impl ModelMetadata {
    pub fn label(&self, index: usize) -> Option<&str> {
        self.output_labels.as_ref()?.get(index).map(String::as_str)
    }
}
