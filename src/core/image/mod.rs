mod augmentations;
mod geometry;
mod photometric;

pub use augmentations::{apply, AugmentationKind};
pub use geometry::{center_crop_resize, CropMetadata};
pub use photometric::{
    adjust_brightness, adjust_contrast, adjust_saturation, adjust_sharpness, pixel_luma,
    subtle_enhance,
};
