use image::imageops::{self, FilterType};
use image::RgbImage;
use serde::Serialize;
use tracing::debug;

/// Informational record of what the normalizer did to one image.
#[derive(Debug, Clone, Serialize)]
pub struct CropMetadata {
    pub original_size: (u32, u32),
    pub crop_size: u32,
    pub crop_box: (u32, u32, u32, u32),
    pub final_size: u32,
    pub aspect_ratio: f32,
}

/// Center crop to a square, then resize to `target_size`.
///
/// The square is taken along the shorter dimension with symmetric offsets,
/// so no padding is ever introduced. Inputs whose larger dimension is below
/// `min_size_threshold` keep their crop size instead of being upscaled.
pub fn center_crop_resize(
    img: &RgbImage,
    target_size: u32,
    min_size_threshold: u32,
) -> (RgbImage, CropMetadata) {
    let (w, h) = img.dimensions();

    let final_size = if w.max(h) < min_size_threshold {
        debug!("Small image ({}x{}), skipping resize", w, h);
        w.min(h)
    } else {
        target_size
    };

    let crop_size = w.min(h);
    let left = (w - crop_size) / 2;
    let top = (h - crop_size) / 2;
    let cropped = imageops::crop_imm(img, left, top, crop_size, crop_size).to_image();

    let resized = if crop_size != final_size {
        imageops::resize(&cropped, final_size, final_size, FilterType::Lanczos3)
    } else {
        cropped
    };

    let metadata = CropMetadata {
        original_size: (w, h),
        crop_size,
        crop_box: (left, top, left + crop_size, top + crop_size),
        final_size,
        aspect_ratio: w as f32 / h as f32,
    };

    (resized, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_landscape_image_is_cropped_and_resized() {
        let img = RgbImage::from_pixel(640, 480, Rgb([10, 20, 30]));
        let (out, meta) = center_crop_resize(&img, 384, 300);

        assert_eq!(out.dimensions(), (384, 384));
        assert_eq!(meta.original_size, (640, 480));
        assert_eq!(meta.crop_size, 480);
        assert_eq!(meta.crop_box, (80, 0, 560, 480));
        assert_eq!(meta.final_size, 384);
    }

    #[test]
    fn test_portrait_crop_offsets_are_symmetric() {
        let img = RgbImage::from_pixel(480, 640, Rgb([10, 20, 30]));
        let (_, meta) = center_crop_resize(&img, 384, 300);
        assert_eq!(meta.crop_box, (0, 80, 480, 560));
    }

    #[test]
    fn test_small_input_is_never_upscaled() {
        let img = RgbImage::from_pixel(250, 180, Rgb([10, 20, 30]));
        let (out, meta) = center_crop_resize(&img, 384, 300);

        // max(250, 180) < 300, so the output stays at min(250, 180).
        assert_eq!(out.dimensions(), (180, 180));
        assert_eq!(meta.final_size, 180);
    }

    #[test]
    fn test_square_image_at_target_size_is_untouched() {
        let img = RgbImage::from_pixel(384, 384, Rgb([10, 20, 30]));
        let (out, meta) = center_crop_resize(&img, 384, 300);

        assert_eq!(out.dimensions(), (384, 384));
        assert_eq!(meta.crop_box, (0, 0, 384, 384));
        assert_eq!(out, img);
    }

    #[test]
    fn test_aspect_ratio_recorded() {
        let img = RgbImage::from_pixel(800, 400, Rgb([0, 0, 0]));
        let (_, meta) = center_crop_resize(&img, 384, 300);
        assert!((meta.aspect_ratio - 2.0).abs() < f32::EPSILON);
    }
}
