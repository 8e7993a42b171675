// Speech bubble detection
//
// Binarizes the page, extracts region outlines with their nesting relation,
// filters out implausibly sized candidates, evicts enclosing shapes (panel
// borders) and imposes reading order.

use crate::core::config::DetectionConfig;
use crate::core::errors::DetectionError;
use crate::core::types::{BubbleCandidate, HierarchyIndex, Outline};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contours::find_contours;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use std::collections::HashSet;
use tracing::{debug, trace};

pub struct BubbleDetector {
    config: DetectionConfig,
}

impl BubbleDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Extract candidate outlines and their nesting relation from a page.
    /// Pure function of the pixel data; the input image is untouched.
    pub fn detect(
        &self,
        image: &DynamicImage,
    ) -> Result<(Vec<Outline>, HierarchyIndex), DetectionError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(DetectionError::EmptyImage { width, height });
        }

        let gray = image.to_luma8();
        let binary = threshold_binary(&gray, self.config.threshold);

        let contours = find_contours::<i32>(&binary);
        let hierarchy: HierarchyIndex = contours.iter().map(|c| c.parent).collect();
        let outlines: Vec<Outline> = contours
            .into_iter()
            .map(|c| Outline { points: c.points })
            .collect();

        debug!(
            "Detected {} outlines at threshold {}",
            outlines.len(),
            self.config.threshold
        );
        Ok((outlines, hierarchy))
    }

    /// Keep plausibly bubble-sized outlines, simplified to suppress pixel
    /// noise, then drop every candidate that encloses another surviving
    /// candidate (a panel border around a bubble is not itself a bubble).
    pub fn filter(
        &self,
        outlines: &[Outline],
        hierarchy: &HierarchyIndex,
    ) -> Vec<BubbleCandidate> {
        let mut retained = Vec::new();
        for (index, outline) in outlines.iter().enumerate() {
            let area = outline.area();
            if area <= self.config.min_area || area >= self.config.max_area {
                continue;
            }
            let epsilon = self.config.approx_epsilon_ratio * arc_length(&outline.points, true);
            let simplified = approximate_polygon_dp(&outline.points, epsilon, true);
            trace!(
                "Outline {}: area {:.0}, {} -> {} vertices",
                index,
                area,
                outline.points.len(),
                simplified.len()
            );
            retained.push(BubbleCandidate {
                contour_index: index,
                outline: Outline { points: simplified },
            });
        }

        let retained_indices: HashSet<usize> =
            retained.iter().map(|c| c.contour_index).collect();
        let mut evicted = HashSet::new();
        for candidate in &retained {
            let mut parent = hierarchy.get(candidate.contour_index).copied().flatten();
            while let Some(ancestor) = parent {
                if retained_indices.contains(&ancestor) {
                    evicted.insert(ancestor);
                }
                parent = hierarchy.get(ancestor).copied().flatten();
            }
        }

        let survivors: Vec<BubbleCandidate> = retained
            .into_iter()
            .filter(|c| !evicted.contains(&c.contour_index))
            .collect();
        debug!(
            "{} candidates after filtering ({} evicted as enclosing)",
            survivors.len(),
            evicted.len()
        );
        survivors
    }

    /// Impose top-to-bottom, then left-to-right reading order. Bubbles are
    /// bucketed into rows by a fixed vertical tolerance so a moderate slant
    /// does not break the row. The sort is stable; exact key ties keep
    /// detection order.
    pub fn order(
        &self,
        mut candidates: Vec<BubbleCandidate>,
        page_width: u32,
    ) -> Vec<BubbleCandidate> {
        let band = i64::from(self.config.band_tolerance);
        let cols = i64::from(page_width);
        candidates.sort_by_key(|candidate| {
            let rect = candidate.outline.bounding_rect();
            (i64::from(rect.y) / band) * band * cols + i64::from(rect.x)
        });
        candidates
    }

    /// Full segmentation pass: detect, filter and order in one call.
    pub fn segment(&self, image: &DynamicImage) -> Result<Vec<BubbleCandidate>, DetectionError> {
        let (outlines, hierarchy) = self.detect(image)?;
        let candidates = self.filter(&outlines, &hierarchy);
        Ok(self.order(candidates, image.width()))
    }
}

/// Binary threshold: pixels above `thresh` become white, the rest black.
/// Counterpart of `cv2.threshold(..., THRESH_BINARY)`.
pub fn threshold_binary(gray: &GrayImage, thresh: u8) -> GrayImage {
    let mut binary = GrayImage::new(gray.width(), gray.height());
    for (src, dst) in gray.pixels().zip(binary.pixels_mut()) {
        *dst = Luma([if src.0[0] > thresh { 255 } else { 0 }]);
    }
    binary
}
