// Raster helpers shared by the cropper, the recognition loop and annotation

use crate::core::types::{BoundingRect, Outline};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

/// Extract the padded sub-image around `rect` as an owned copy.
///
/// The padded rectangle is clamped to the image bounds; out-of-range
/// coordinates are clamped, never wrapped.
pub fn crop_region(image: &RgbImage, rect: &BoundingRect, padding: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let pad = i64::from(padding);

    let x0 = (i64::from(rect.x) - pad).clamp(0, i64::from(width));
    let y0 = (i64::from(rect.y) - pad).clamp(0, i64::from(height));
    let x1 = (i64::from(rect.x) + i64::from(rect.w) + pad).clamp(x0, i64::from(width));
    let y1 = (i64::from(rect.y) + i64::from(rect.h) + pad).clamp(y0, i64::from(height));

    imageops::crop_imm(
        image,
        x0 as u32,
        y0 as u32,
        (x1 - x0) as u32,
        (y1 - y0) as u32,
    )
    .to_image()
}

/// Remove `pixels` from each side, as a new image. Returns `None` when the
/// input is too small to shrink further.
pub fn shrink_by_pixels(image: &RgbImage, pixels: u32) -> Option<RgbImage> {
    let (width, height) = image.dimensions();
    if width <= 2 * pixels || height <= 2 * pixels {
        return None;
    }
    Some(
        imageops::crop_imm(image, pixels, pixels, width - 2 * pixels, height - 2 * pixels)
            .to_image(),
    )
}

/// Enlarge by an integer factor in both dimensions.
pub fn upscale(image: &RgbImage, factor: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    imageops::resize(image, width * factor, height * factor, FilterType::CatmullRom)
}

/// Trace an outline polygon onto the image with the given stroke thickness.
pub fn draw_outline(image: &mut RgbImage, outline: &Outline, color: Rgb<u8>, thickness: i32) {
    let points = &outline.points;
    if points.len() < 2 {
        return;
    }
    let radius = (thickness / 2).max(0);
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                draw_line_segment_mut(
                    image,
                    ((a.x + dx) as f32, (a.y + dy) as f32),
                    ((b.x + dx) as f32, (b.y + dy) as f32),
                    color,
                );
            }
        }
    }
}
