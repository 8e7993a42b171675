pub mod image_ops;

// Re-export commonly used items
pub use image_ops::{crop_region, draw_outline, shrink_by_pixels, upscale};
