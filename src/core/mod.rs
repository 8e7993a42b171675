pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items for convenience
pub use config::Config;
pub use errors::{ConfigError, DetectionError, LexiconError, OcrError, ReadError};
pub use types::{
    BoundingRect, BubbleCandidate, CroppedRegion, HierarchyIndex, Outline, PageScript,
};
