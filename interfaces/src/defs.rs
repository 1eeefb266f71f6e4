use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// A photo of a single garment, either hosted somewhere or carried inline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageReference {
    Remote { url: String },
    Inline { mime_type: String, data: Vec<u8> },
}

impl ImageReference {
    pub fn remote(url: impl Into<String>) -> Self {
        Self::Remote { url: url.into() }
    }

    pub fn inline(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self::Inline {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Short human-readable form for logs; never includes the payload.
    pub fn describe(&self) -> String {
        match self {
            Self::Remote { url } => url.clone(),
            Self::Inline { mime_type, data } => format!("inline {} ({} bytes)", mime_type, data.len()),
        }
    }
}

/// Coarse thermal suitability of a garment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Cold,
    Mild,
    Hot,
}

impl Temperature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cold => "cold",
            Self::Mild => "mild",
            Self::Hot => "hot",
        }
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the wardrobe form gets back for a photo.
///
/// `color` is always one of the palette labels and every field is populated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalAttributes {
    pub color: String,
    pub category: String,
    pub temperature: Temperature,
}

// Object style note:
// The surrounding application only ever sees this trait. Implementations
// swallow every upstream failure and degrade to a plausible answer, so
// there is no error variant to handle on the calling side.

pub trait AttributeDetector {
    fn detect_attributes(&self, image: &ImageReference) -> impl Future<Output = CanonicalAttributes> + Send;
}
