// Library exports for the comic page reading pipeline

// Core modules
pub mod core;
pub mod reader;
pub mod services;
pub mod utils;

// Re-export commonly used types and functions
pub use crate::core::{
    config::Config,
    errors::{ConfigError, DetectionError, LexiconError, OcrError, ReadError},
    types::{BoundingRect, BubbleCandidate, CroppedRegion, HierarchyIndex, Outline, PageScript},
};

pub use reader::PageReader;

pub use services::{BubbleDetector, Lexicon, OcrEngine, RecognitionEngine, TextNormalizer};

#[cfg(feature = "tesseract")]
pub use services::recognition::TesseractEngine;
