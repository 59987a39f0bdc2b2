use image::{imageops, Rgb, RgbImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use rand::Rng;

use super::photometric::{
    adjust_brightness, adjust_contrast, adjust_saturation, adjust_sharpness,
};

/// Corner fill for rotations that expose canvas outside the source frame.
const ROTATION_FILL: Rgb<u8> = Rgb([255, 255, 255]);

/// The fixed nine-member augmentation catalog.
///
/// Each variant carries a built-in parameter; there is no external tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AugmentationKind {
    Mirror,
    RotateCw15,
    RotateCcw15,
    BrightnessUp,
    BrightnessDown,
    ContrastUp,
    ContrastDown,
    Saturate,
    Sharpen,
}

impl AugmentationKind {
    pub const ALL: [AugmentationKind; 9] = [
        AugmentationKind::Mirror,
        AugmentationKind::RotateCw15,
        AugmentationKind::RotateCcw15,
        AugmentationKind::BrightnessUp,
        AugmentationKind::BrightnessDown,
        AugmentationKind::ContrastUp,
        AugmentationKind::ContrastDown,
        AugmentationKind::Saturate,
        AugmentationKind::Sharpen,
    ];

    /// Tag embedded in synthesized filenames.
    pub fn tag(&self) -> &'static str {
        match self {
            AugmentationKind::Mirror => "flip",
            AugmentationKind::RotateCw15 => "rotate_15",
            AugmentationKind::RotateCcw15 => "rotate_-15",
            AugmentationKind::BrightnessUp => "brightness_up",
            AugmentationKind::BrightnessDown => "brightness_down",
            AugmentationKind::ContrastUp => "contrast_up",
            AugmentationKind::ContrastDown => "contrast_down",
            AugmentationKind::Saturate => "color",
            AugmentationKind::Sharpen => "sharpness",
        }
    }

    /// Draw one kind uniformly at random from the catalog.
    pub fn random<R: Rng>(rng: &mut R) -> AugmentationKind {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Apply a single augmentation to an image, producing one synthetic variant.
///
/// Geometric kinds never change the bounding box: rotation keeps the canvas
/// and fills exposed corners with white. Photometric kinds apply exactly one
/// fixed enhancement factor.
pub fn apply(img: &RgbImage, kind: AugmentationKind) -> RgbImage {
    match kind {
        AugmentationKind::Mirror => imageops::flip_horizontal(img),
        AugmentationKind::RotateCw15 => rotate_fixed(img, 15.0),
        AugmentationKind::RotateCcw15 => rotate_fixed(img, -15.0),
        AugmentationKind::BrightnessUp => adjust_brightness(img, 1.2),
        AugmentationKind::BrightnessDown => adjust_brightness(img, 0.8),
        AugmentationKind::ContrastUp => adjust_contrast(img, 1.2),
        AugmentationKind::ContrastDown => adjust_contrast(img, 0.8),
        AugmentationKind::Saturate => adjust_saturation(img, 1.1),
        AugmentationKind::Sharpen => adjust_sharpness(img, 1.3),
    }
}

fn rotate_fixed(img: &RgbImage, degrees: f32) -> RgbImage {
    rotate_about_center(
        img,
        degrees.to_radians(),
        Interpolation::Bicubic,
        ROTATION_FILL,
    )
}
