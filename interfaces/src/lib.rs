pub mod defs;

pub use defs::{AttributeDetector, CanonicalAttributes, ImageReference, Temperature};
