use std::path::PathBuf;

/// Configuration for the class-balancing pipeline.
///
/// Centralizes every knob the run needs so components stay free of
/// module-level constants and tests can parameterize them.
#[derive(Debug, Clone)]
pub struct BalanceConfig {
    /// Source roots scanned for class subdirectories. The first root is
    /// tagged as the primary provenance, any further roots as external.
    pub source_roots: Vec<PathBuf>,
    /// Root of the balanced output tree.
    pub output_root: PathBuf,
    /// Desired number of images per class after balancing.
    pub target_per_class: usize,
    /// Seed for the run's random source.
    pub random_seed: u64,
    /// JPEG quality for synthesized variants.
    pub augmented_jpeg_quality: u8,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            source_roots: vec![
                PathBuf::from("dataset/merged"),
                PathBuf::from("dataset/external"),
            ],
            output_root: PathBuf::from("dataset/balanced"),
            target_per_class: 200,
            random_seed: 42,
            augmented_jpeg_quality: 95,
        }
    }
}

/// Configuration for the normalization pipeline.
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Root of the raw input tree.
    pub input_root: PathBuf,
    /// Root of the processed output tree.
    pub output_root: PathBuf,
    /// Final square edge length after the center crop.
    pub target_size: u32,
    /// Inputs whose larger dimension falls below this stay at their crop
    /// size instead of being upscaled.
    pub min_size_threshold: u32,
    /// JPEG quality for processed images.
    pub jpeg_quality: u8,
    /// Thresholds applied by the quality audit.
    pub thresholds: QualityThresholds,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            input_root: PathBuf::from("dataset/raw"),
            output_root: PathBuf::from("dataset/processed"),
            target_size: 384,
            min_size_threshold: 300,
            jpeg_quality: 98,
            thresholds: QualityThresholds::default(),
        }
    }
}

/// Fixed flag thresholds for the quality audit.
#[derive(Debug, Clone, Copy)]
pub struct QualityThresholds {
    pub too_dark: f64,
    pub too_bright: f64,
    pub low_contrast: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            too_dark: 50.0,
            too_bright: 200.0,
            low_contrast: 30.0,
        }
    }
}
