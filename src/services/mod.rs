pub mod detection;
pub mod lexicon;
pub mod normalize;
pub mod recognition;

// Re-export commonly used services
pub use detection::BubbleDetector;
pub use lexicon::Lexicon;
pub use normalize::TextNormalizer;
pub use recognition::{OcrEngine, RecognitionEngine};
