use image::{imageops, RgbImage};
use serde::Serialize;

use crate::config::QualityThresholds;

/// Quality metrics computed over a finished image.
///
/// Pure data; the caller decides whether and how to log it.
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub brightness: f64,
    pub contrast: f64,
    pub resolution: u64,
    pub dimensions: (u32, u32),
    pub is_too_dark: bool,
    pub is_too_bright: bool,
    pub is_low_contrast: bool,
}

impl QualityReport {
    pub fn has_issues(&self) -> bool {
        self.is_too_dark || self.is_too_bright || self.is_low_contrast
    }
}

/// Audit an image against the configured thresholds.
///
/// Brightness is the mean of the single-channel luminance, contrast its
/// standard deviation, resolution the pixel count.
pub fn audit(img: &RgbImage, thresholds: &QualityThresholds) -> QualityReport {
    let gray = imageops::grayscale(img);
    let (width, height) = img.dimensions();
    let pixel_count = (width as u64 * height as u64).max(1);

    let sum: f64 = gray.pixels().map(|p| p[0] as f64).sum();
    let mean = sum / pixel_count as f64;

    let variance: f64 = gray
        .pixels()
        .map(|p| {
            let diff = p[0] as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / pixel_count as f64;
    let std_dev = variance.sqrt();

    QualityReport {
        brightness: mean,
        contrast: std_dev,
        resolution: width as u64 * height as u64,
        dimensions: (width, height),
        is_too_dark: mean < thresholds.too_dark,
        is_too_bright: mean > thresholds.too_bright,
        is_low_contrast: std_dev < thresholds.low_contrast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn defaults() -> QualityThresholds {
        QualityThresholds::default()
    }

    #[test]
    fn test_mid_gray_is_neither_dark_nor_bright() {
        let img = RgbImage::from_pixel(16, 16, Rgb([128, 128, 128]));
        let report = audit(&img, &defaults());

        assert!((report.brightness - 128.0).abs() < 1.0);
        assert!(!report.is_too_dark);
        assert!(!report.is_too_bright);
        // A constant image has zero contrast.
        assert!(report.is_low_contrast);
    }

    #[test]
    fn test_black_image_is_too_dark() {
        let img = RgbImage::from_pixel(16, 16, Rgb([0, 0, 0]));
        let report = audit(&img, &defaults());

        assert_eq!(report.brightness, 0.0);
        assert!(report.is_too_dark);
        assert!(!report.is_too_bright);
    }

    #[test]
    fn test_white_image_is_too_bright() {
        let img = RgbImage::from_pixel(16, 16, Rgb([255, 255, 255]));
        let report = audit(&img, &defaults());

        assert!(report.is_too_bright);
        assert!(!report.is_too_dark);
    }

    #[test]
    fn test_checkerboard_has_high_contrast() {
        let img = RgbImage::from_fn(16, 16, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let report = audit(&img, &defaults());

        assert!(!report.is_low_contrast);
        assert!(report.contrast > 100.0);
    }

    #[test]
    fn test_resolution_is_pixel_count() {
        let img = RgbImage::new(20, 30);
        let report = audit(&img, &defaults());
        assert_eq!(report.resolution, 600);
        assert_eq!(report.dimensions, (20, 30));
    }
}
