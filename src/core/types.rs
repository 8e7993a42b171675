// Core data types shared across the pipeline stages

use image::RgbImage;
use imageproc::point::Point;
use serde::Serialize;

/// Axis-aligned bounding rectangle of an outline, in pixel units.
///
/// `w` and `h` count pixels, so a rectangle spanning columns 20..=169 has
/// `x = 20, w = 150`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Closed boundary polygon of a candidate region.
///
/// Simplified outlines are new values; points are never edited in place.
#[derive(Debug, Clone)]
pub struct Outline {
    pub points: Vec<Point<i32>>,
}

impl Outline {
    pub fn bounding_rect(&self) -> BoundingRect {
        if self.points.is_empty() {
            return BoundingRect { x: 0, y: 0, w: 0, h: 0 };
        }
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for point in &self.points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }
        BoundingRect {
            x: min_x,
            y: min_y,
            w: max_x - min_x + 1,
            h: max_y - min_y + 1,
        }
    }

    /// Enclosed area via the shoelace formula.
    pub fn area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let mut doubled: i64 = 0;
        for i in 0..self.points.len() {
            let a = self.points[i];
            let b = self.points[(i + 1) % self.points.len()];
            doubled += i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y);
        }
        (doubled.abs() as f64) / 2.0
    }
}

/// Parent links between detected outlines, indexed by original contour index.
/// `None` marks an outline at the page root.
pub type HierarchyIndex = Vec<Option<usize>>;

/// An outline that passed the area filter, keyed by its original contour
/// index so its ancestors can still be looked up in the hierarchy.
#[derive(Debug, Clone)]
pub struct BubbleCandidate {
    pub contour_index: usize,
    pub outline: Outline,
}

/// Padded raster copy of one candidate's bounding rectangle. Owns its pixels;
/// the source page is untouched by later shrink attempts.
#[derive(Debug, Clone)]
pub struct CroppedRegion {
    pub image: RgbImage,
    pub padding: u32,
}

/// Ordered, deduplicated dialogue lines read from one page
pub type PageScript = Vec<String>;

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_outline(x: i32, y: i32, w: i32, h: i32) -> Outline {
        Outline {
            points: vec![
                Point::new(x, y),
                Point::new(x + w, y),
                Point::new(x + w, y + h),
                Point::new(x, y + h),
            ],
        }
    }

    #[test]
    fn shoelace_area_of_rectangle() {
        assert_eq!(rect_outline(0, 0, 100, 100).area(), 10_000.0);
        assert_eq!(rect_outline(20, 30, 150, 80).area(), 12_000.0);
    }

    #[test]
    fn area_of_degenerate_outline_is_zero() {
        let line = Outline {
            points: vec![Point::new(0, 0), Point::new(10, 0)],
        };
        assert_eq!(line.area(), 0.0);
    }

    #[test]
    fn bounding_rect_spans_extremes() {
        let rect = rect_outline(20, 30, 149, 79).bounding_rect();
        assert_eq!(rect, BoundingRect { x: 20, y: 30, w: 150, h: 80 });
    }
}
