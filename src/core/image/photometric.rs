use image::{imageops, Rgb, RgbImage};

/// Luminance of a single RGB pixel (ITU-R BT.601 weights).
pub fn pixel_luma(pixel: &Rgb<u8>) -> f32 {
    0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32
}

fn blend_channel(degenerate: f32, original: f32, factor: f32) -> u8 {
    let value = degenerate + (original - degenerate) * factor;
    value.round().clamp(0.0, 255.0) as u8
}

/// Scale brightness by a fixed factor.
///
/// Factor 1.0 returns the image unchanged, values below 1.0 darken,
/// values above 1.0 brighten.
pub fn adjust_brightness(img: &RgbImage, factor: f32) -> RgbImage {
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        for c in 0..3 {
            pixel[c] = blend_channel(0.0, pixel[c] as f32, factor);
        }
    }
    out
}

/// Scale contrast around the image's mean luminance by a fixed factor.
pub fn adjust_contrast(img: &RgbImage, factor: f32) -> RgbImage {
    let pixel_count = (img.width() as u64 * img.height() as u64).max(1);
    let mean: f32 =
        (img.pixels().map(|p| pixel_luma(p) as f64).sum::<f64>() / pixel_count as f64) as f32;

    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        for c in 0..3 {
            pixel[c] = blend_channel(mean, pixel[c] as f32, factor);
        }
    }
    out
}

/// Scale color saturation by blending each pixel against its own luminance.
pub fn adjust_saturation(img: &RgbImage, factor: f32) -> RgbImage {
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        let luma = pixel_luma(pixel);
        for c in 0..3 {
            pixel[c] = blend_channel(luma, pixel[c] as f32, factor);
        }
    }
    out
}

/// Scale sharpness by extrapolating away from a blurred copy.
///
/// Factors above 1.0 sharpen, below 1.0 soften.
pub fn adjust_sharpness(img: &RgbImage, factor: f32) -> RgbImage {
    let blurred = imageops::blur(img, 1.0);
    let mut out = img.clone();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let soft = blurred.get_pixel(x, y);
        for c in 0..3 {
            pixel[c] = blend_channel(soft[c] as f32, pixel[c] as f32, factor);
        }
    }
    out
}

/// Fixed subtle enhancement applied to every normalized image:
/// sharpness x1.1 followed by contrast x1.05.
pub fn subtle_enhance(img: &RgbImage) -> RgbImage {
    let sharpened = adjust_sharpness(img, 1.1);
    adjust_contrast(&sharpened, 1.05)
}
