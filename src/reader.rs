// Page-level composition of the pipeline stages
//
// Two public operations: annotate (detection only, for visualization) and
// read_page (the full image-to-text pipeline).

use crate::core::config::Config;
use crate::core::errors::ReadError;
use crate::core::types::{CroppedRegion, PageScript};
use crate::services::detection::BubbleDetector;
use crate::services::lexicon::Lexicon;
use crate::services::normalize::TextNormalizer;
use crate::services::recognition::{OcrEngine, RecognitionEngine};
use crate::utils::image_ops;
use image::{DynamicImage, Rgb, RgbImage};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outline stroke for annotated pages
const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const OUTLINE_THICKNESS: i32 = 3;

pub struct PageReader {
    config: Arc<Config>,
    detector: BubbleDetector,
    recognition: RecognitionEngine,
    normalizer: TextNormalizer,
}

impl PageReader {
    pub fn new(config: Arc<Config>, engine: Arc<dyn OcrEngine>, lexicon: Arc<Lexicon>) -> Self {
        let detector = BubbleDetector::new(config.detection.clone());
        let recognition = RecognitionEngine::new(config.recognition.clone(), engine);
        let normalizer = TextNormalizer::new(lexicon, &config.normalize);
        Self {
            config,
            detector,
            recognition,
            normalizer,
        }
    }

    /// Detect speech bubbles and draw their outlines onto a copy of the page.
    pub fn annotate(&self, image: &DynamicImage) -> Result<RgbImage, ReadError> {
        let candidates = self.detector.segment(image)?;
        let mut annotated = image.to_rgb8();
        for candidate in &candidates {
            image_ops::draw_outline(
                &mut annotated,
                &candidate.outline,
                OUTLINE_COLOR,
                OUTLINE_THICKNESS,
            );
        }
        info!("Annotated page with {} bubble outlines", candidates.len());
        Ok(annotated)
    }

    /// Run the full pipeline and return the ordered, deduplicated dialogue.
    pub fn read_page(&self, image: &DynamicImage) -> Result<PageScript, ReadError> {
        let candidates = self.detector.segment(image)?;
        let page = image.to_rgb8();
        let padding = self.config.recognition.crop_padding;

        let mut script = PageScript::new();
        for (index, candidate) in candidates.iter().enumerate() {
            let rect = candidate.outline.bounding_rect();
            let region = CroppedRegion {
                image: image_ops::crop_region(&page, &rect, padding),
                padding,
            };

            // One bad region must not abort the page
            let line = match self.recognition.read_region(&region, &self.normalizer) {
                Ok(line) => line,
                Err(e) => {
                    warn!("Skipping region {}: {}", index, e);
                    continue;
                }
            };

            if line.is_empty() {
                debug!("Region {} yielded no legible text", index);
                continue;
            }
            if script.contains(&line) {
                debug!("Region {} duplicates an earlier line", index);
                continue;
            }
            script.push(line);
        }

        info!(
            "Read {} dialogue lines from {} bubbles",
            script.len(),
            candidates.len()
        );
        Ok(script)
    }
}
