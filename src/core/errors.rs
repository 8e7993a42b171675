// Custom error types for the page-reading pipeline
//
// Using thiserror for ergonomic error definitions with:
// - Type-safe error matching
// - Automatic Display/Error trait implementations
// - Source error chaining

use thiserror::Error;

/// Bubble detection errors
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("Invalid image dimensions: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
}

/// OCR capability errors
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Failed to initialize OCR engine: {0}")]
    Init(String),

    #[error("Text recognition failed: {0}")]
    Recognition(String),
}

/// Dictionary/autocorrection capability errors
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Failed to load word list from {path}: {source}")]
    Unavailable {
        path: String,
        source: std::io::Error,
    },

    #[error("Word list at {0} contains no usable entries")]
    Empty(String),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Bubble area bounds must satisfy 0 < min < max, got {min}..{max}")]
    InvalidAreaBounds { min: f64, max: f64 },

    #[error("Row band tolerance must be > 0, got {0}")]
    InvalidBandTolerance(i32),

    #[error("Upscale factor must be >= 1, got {0}")]
    InvalidUpscaleFactor(u32),

    #[error("Shrink step must be > 0")]
    InvalidShrinkStep,

    #[error("Polygon approximation ratio must be > 0, got {0}")]
    InvalidApproxRatio(f64),
}

/// Page-level errors surfaced by the public operations
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Bubble detection failed: {0}")]
    Detection(#[from] DetectionError),
}

// Convenience type aliases for Results
pub type DetectionResult<T> = Result<T, DetectionError>;
pub type OcrResult<T> = Result<T, OcrError>;
pub type LexiconResult<T> = Result<T, LexiconError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ReadResult<T> = Result<T, ReadError>;
