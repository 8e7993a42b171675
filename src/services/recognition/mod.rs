// Region recognition
//
// Owns the OCR capability seam and the shrink-and-retry loop: enlarge the
// crop, denoise, recognize, and erode the border when the engine sees
// nothing. Bubble outlines left at the crop edge are a common cause of empty
// results, and trimming them often recovers single-word lines.

use crate::core::config::RecognitionConfig;
use crate::core::errors::OcrError;
use crate::core::types::CroppedRegion;
use crate::services::normalize::TextNormalizer;
use crate::utils::image_ops;
use image::RgbImage;
use imageproc::filter::median_filter;
use std::sync::Arc;
use tracing::trace;

/// Recognition capability for one raster region.
///
/// The concrete engine is injected so the pipeline can run against Tesseract
/// in production and a scripted stand-in under test.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &RgbImage) -> Result<String, OcrError>;
}

pub struct RecognitionEngine {
    config: RecognitionConfig,
    engine: Arc<dyn OcrEngine>,
}

impl RecognitionEngine {
    pub fn new(config: RecognitionConfig, engine: Arc<dyn OcrEngine>) -> Self {
        Self { config, engine }
    }

    /// Recognize and normalize one region, shrinking the crop when the engine
    /// returns nothing legible. Issues at most `max_retries + 1` OCR calls;
    /// an empty result after that is a routine outcome, not an error.
    pub fn read_region(
        &self,
        region: &CroppedRegion,
        normalizer: &TextNormalizer,
    ) -> Result<String, OcrError> {
        let mut working = image_ops::upscale(&region.image, self.config.upscale_factor);
        let mut line = self.attempt(&working, normalizer)?;

        let mut retries = 0;
        while line.is_empty() && retries < self.config.max_retries {
            let Some(shrunk) = image_ops::shrink_by_pixels(&working, self.config.shrink_step)
            else {
                trace!("Region too small to shrink further, giving up");
                break;
            };
            working = shrunk;
            retries += 1;
            line = self.attempt(&working, normalizer)?;
        }

        Ok(line)
    }

    fn attempt(&self, image: &RgbImage, normalizer: &TextNormalizer) -> Result<String, OcrError> {
        let radius = self.config.denoise_radius;
        let denoised = median_filter(image, radius, radius);
        let raw = self.engine.recognize(&denoised)?;
        let line = normalizer.normalize(&raw);
        trace!("OCR attempt: {} raw chars -> '{}'", raw.len(), line);
        Ok(line)
    }
}

#[cfg(feature = "tesseract")]
pub use self::tesseract::TesseractEngine;

#[cfg(feature = "tesseract")]
mod tesseract {
    use super::OcrEngine;
    use crate::core::errors::OcrError;
    use image::RgbImage;
    use leptess::LepTess;
    use std::io::Cursor;
    use tracing::info;

    /// Tesseract-backed OCR engine.
    ///
    /// A fresh `LepTess` is constructed per call (the C API is stateful); the
    /// constructor performs a one-time init check so a missing installation
    /// fails at startup rather than mid-page.
    pub struct TesseractEngine {
        language: String,
    }

    impl TesseractEngine {
        pub fn new(language: &str) -> Result<Self, OcrError> {
            LepTess::new(None, language).map_err(|e| {
                OcrError::Init(format!(
                    "Tesseract unavailable for language '{}': {}. \
                     Make sure the language data is installed.",
                    language, e
                ))
            })?;
            info!("Tesseract initialized (language '{}')", language);
            Ok(Self {
                language: language.to_string(),
            })
        }
    }

    impl OcrEngine for TesseractEngine {
        fn recognize(&self, image: &RgbImage) -> Result<String, OcrError> {
            let mut engine = LepTess::new(None, &self.language)
                .map_err(|e| OcrError::Init(e.to_string()))?;

            // leptess expects encoded image data
            let mut png = Cursor::new(Vec::new());
            image
                .write_to(&mut png, image::ImageFormat::Png)
                .map_err(|e| OcrError::Recognition(format!("Failed to encode region: {}", e)))?;
            engine
                .set_image_from_mem(png.get_ref())
                .map_err(|e| OcrError::Recognition(format!("Failed to set region: {}", e)))?;

            engine
                .get_utf8_text()
                .map_err(|e| OcrError::Recognition(format!("Recognition failed: {}", e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::NormalizeConfig;
    use crate::services::lexicon::Lexicon;
    use image::Rgb;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays a queue of canned responses and counts calls
    struct ScriptedEngine {
        responses: Mutex<VecDeque<&'static str>>,
        calls: AtomicUsize,
    }

    impl ScriptedEngine {
        fn new<const N: usize>(responses: [&'static str; N]) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into_iter().collect()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl OcrEngine for ScriptedEngine {
        fn recognize(&self, _image: &RgbImage) -> Result<String, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.responses.lock().unwrap().pop_front().unwrap_or("");
            Ok(next.to_string())
        }
    }

    struct FailingEngine;

    impl OcrEngine for FailingEngine {
        fn recognize(&self, _image: &RgbImage) -> Result<String, OcrError> {
            Err(OcrError::Recognition("engine exploded".to_string()))
        }
    }

    fn normalizer() -> TextNormalizer {
        let lexicon = Arc::new(Lexicon::from_words(["hello", "there", "a", "i"]));
        TextNormalizer::new(lexicon, &NormalizeConfig::default())
    }

    fn region() -> CroppedRegion {
        CroppedRegion {
            image: RgbImage::from_pixel(60, 40, Rgb([255, 255, 255])),
            padding: 0,
        }
    }

    #[test]
    fn first_legible_attempt_wins() {
        let engine = ScriptedEngine::new(["HELLO THERE"]);
        let recognition = RecognitionEngine::new(RecognitionConfig::default(), engine.clone());
        let line = recognition.read_region(&region(), &normalizer()).unwrap();
        assert_eq!(line, "HELLO THERE");
        assert_eq!(engine.calls(), 1);
    }

    #[test]
    fn shrinks_until_text_appears() {
        let engine = ScriptedEngine::new(["", "", "", "HELLO THERE"]);
        let recognition = RecognitionEngine::new(RecognitionConfig::default(), engine.clone());
        let line = recognition.read_region(&region(), &normalizer()).unwrap();
        assert_eq!(line, "HELLO THERE");
        assert_eq!(engine.calls(), 4);
    }

    #[test]
    fn gives_up_after_three_shrink_attempts() {
        let engine = ScriptedEngine::new(["", "", "", "", ""]);
        let recognition = RecognitionEngine::new(RecognitionConfig::default(), engine.clone());
        let line = recognition.read_region(&region(), &normalizer()).unwrap();
        assert_eq!(line, "");
        assert_eq!(engine.calls(), 4);
    }

    #[test]
    fn stops_shrinking_when_region_runs_out() {
        // 6x6 region upscales to 12x12; one 5px shrink leaves 2x2, the next
        // would consume the image, so only two OCR calls are possible
        let tiny = CroppedRegion {
            image: RgbImage::from_pixel(6, 6, Rgb([255, 255, 255])),
            padding: 0,
        };
        let engine = ScriptedEngine::new(["", "", "", ""]);
        let recognition = RecognitionEngine::new(RecognitionConfig::default(), engine.clone());
        let line = recognition.read_region(&tiny, &normalizer()).unwrap();
        assert_eq!(line, "");
        assert_eq!(engine.calls(), 2);
    }

    #[test]
    fn engine_failure_propagates() {
        let recognition =
            RecognitionEngine::new(RecognitionConfig::default(), Arc::new(FailingEngine));
        assert!(recognition.read_region(&region(), &normalizer()).is_err());
    }

    #[test]
    fn noise_that_normalizes_to_nothing_triggers_retry() {
        // A stray character normalizes to empty, so the loop keeps going
        let engine = ScriptedEngine::new(["%", "HELLO"]);
        let recognition = RecognitionEngine::new(RecognitionConfig::default(), engine.clone());
        let line = recognition.read_region(&region(), &normalizer()).unwrap();
        assert_eq!(line, "HELLO");
        assert_eq!(engine.calls(), 2);
    }
}
