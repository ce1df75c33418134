//! The fixed set of plants a user can pick.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Shown when a class has no reference text.
pub const NO_DISEASE_INFO: &str = "No information available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plant {
    Potato,
    Cotton,
    Tomato,
}

impl Plant {
    /// Selector order.
    pub const ALL: [Plant; 3] = [Plant::Potato, Plant::Cotton, Plant::Tomato];

    /// Canonical identifier; also the name of the model artifact directory.
    pub fn as_str(&self) -> &'static str {
        match self {
            Plant::Potato => "Potato",
            Plant::Cotton => "Cotton",
            Plant::Tomato => "Tomato",
        }
    }

    /// Class names for each plant, in model output order.
    pub fn default_labels(&self) -> &'static [&'static str] {
        match self {
            Plant::Potato => &["Potato___Early_blight", "Potato___Late_blight", "Potato___healthy"],
            Plant::Cotton => &[
                "diseased cotton leaf",
                "diseased cotton plant",
                "fresh cotton leaf",
                "fresh cotton plant",
            ],
            Plant::Tomato => &["Tomato_Early_blight", "Tomato_Leaf_Mold", "Tomato_healthy"],
        }
    }

    /// Lowercase name used in user-facing sentences.
    pub fn display_name(&self) -> &'static str {
        match self {
            Plant::Potato => "potato",
            Plant::Cotton => "cotton",
            Plant::Tomato => "tomato",
        }
    }

    /// Reference text for a class of this plant.
    pub fn disease_description(&self, label: &str) -> &'static str {
        let text = match (self, label) {
            (Plant::Tomato, "Tomato_Early_blight") => Some(
                "Early blight is a common fungal disease that affects tomato plants. \
                 It is caused by the fungus Alternaria solani.",
            ),
            (Plant::Tomato, "Tomato_Leaf_Mold") => {
                Some("Tomato leaf mold is a foliar disease that primarily affects the leaves...")
            }
            (Plant::Tomato, "Tomato_healthy") => Some("Your tomato plant looks healthy!"),
            (Plant::Cotton, "diseased cotton leaf") => {
                Some("Diseased cotton leaves often show symptoms like yellowing and wilting...")
            }
            (Plant::Cotton, "diseased cotton plant") => {
                Some("Cotton plant diseases can lead to reduced yield and fiber quality...")
            }
            (Plant::Cotton, "fresh cotton leaf") => Some(
                "Your cotton leaf appears healthy! In a thriving state, a fresh cotton leaf showcases \
                 vibrant green color, smooth texture, and well-defined veins. This is a positive sign \
                 of a leaf that is actively contributing to the plant's photosynthesis and overall well-being.",
            ),
            (Plant::Cotton, "fresh cotton plant") => Some(
                "Your cotton plant appears healthy! A healthy cotton plant exhibits robust growth with \
                 lush, green foliage. It stands tall with sturdy stems, indicating a well-nourished and \
                 disease-free condition. Proper care has contributed to the plant's vitality and potential \
                 for optimal cotton production.",
            ),
            (Plant::Potato, "Potato___Early_blight") => Some(
                "Early blight in potatoes can cause dark lesions on leaves. It is primarily caused by the \
                 fungus Alternaria solani. Proper spacing, fungicides, and crop rotation can help manage \
                 early blight.",
            ),
            (Plant::Potato, "Potato___Late_blight") => Some(
                "Late blight is a serious disease of potato and tomato crops, caused by the oomycete \
                 pathogen Phytophthora infestans. Early detection, proper plant spacing, and fungicide \
                 applications are key preventive measures.",
            ),
            (Plant::Potato, "Potato___healthy") => Some(
                "Your potato plant looks healthy! Healthy potato plants typically have vibrant green \
                 leaves, well-spaced foliage, and show no signs of discoloration or lesions. Regular \
                 monitoring and good agricultural practices contribute to maintaining plant health.",
            ),
            _ => None,
        };
        text.unwrap_or(NO_DISEASE_INFO)
    }

    /// Parses a selector value. The empty string is "no selection".
    pub fn from_selector(value: &str) -> Result<Option<Plant>, LoadError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        value.parse().map(Some)
    }
}

impl fmt::Display for Plant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plant {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Plant::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LoadError::UnknownPlant(s.to_owned()))
    }
}
