use std::path::Path;

use tracing::{info, warn};

use crate::config::PreprocessConfig;
use crate::core::analysis::audit;
use crate::core::dataset::{list_class_dirs, list_class_images, AggregateError, RAW_EXTENSIONS};
use crate::core::image::{center_crop_resize, subtle_enhance};
use crate::core::manifest::{
    ClassStats, ManifestError, PreprocessManifest, QualityIssue, PREPROCESS_LOG_FILENAME,
};
use crate::core::operations::{ensure_dir, save_jpeg, FileOpError};

/// Error types for a normalization run
#[derive(Debug)]
pub enum PreprocessError {
    NoInputData(AggregateError),
    FileOp(FileOpError),
    Manifest(ManifestError),
}

impl std::fmt::Display for PreprocessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreprocessError::NoInputData(e) => write!(f, "{}", e),
            PreprocessError::FileOp(e) => write!(f, "{}", e),
            PreprocessError::Manifest(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PreprocessError {}

impl From<AggregateError> for PreprocessError {
    fn from(error: AggregateError) -> Self {
        PreprocessError::NoInputData(error)
    }
}

impl From<FileOpError> for PreprocessError {
    fn from(error: FileOpError) -> Self {
        PreprocessError::FileOp(error)
    }
}

impl From<ManifestError> for PreprocessError {
    fn from(error: ManifestError) -> Self {
        PreprocessError::Manifest(error)
    }
}

/// Failure of a single image inside the pipeline; contained by the caller.
#[derive(Debug)]
enum ImageStepError {
    Decode(image::ImageError),
    Save(FileOpError),
}

impl std::fmt::Display for ImageStepError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageStepError::Decode(e) => write!(f, "Decode failed: {}", e),
            ImageStepError::Save(e) => write!(f, "{}", e),
        }
    }
}

/// Run the normalization pipeline end to end.
///
/// Each raw image goes through center crop, resize, subtle enhancement and a
/// quality audit before being written as high-quality JPEG. Per-image decode
/// failures are contained; the manifest is written once at run end.
pub fn run(config: &PreprocessConfig) -> Result<PreprocessManifest, PreprocessError> {
    let classes = list_class_dirs(&config.input_root);
    if classes.is_empty() {
        return Err(AggregateError::NoInputData.into());
    }

    info!(
        "Normalizing {} classes to {}x{} (no upscaling below {}px)",
        classes.len(),
        config.target_size,
        config.target_size,
        config.min_size_threshold
    );

    let mut manifest = PreprocessManifest::new(config);
    ensure_dir(&config.output_root)?;

    for (label, class_dir) in classes {
        let stats = preprocess_class(&label, &class_dir, config)?;
        info!(
            "{}: processed {}/{} ({} failed, {} flagged)",
            label,
            stats.processed,
            stats.total_images,
            stats.failed,
            stats.quality_issues.len()
        );
        manifest.record_class(&label, stats);
    }

    manifest.save(&config.output_root.join(PREPROCESS_LOG_FILENAME))?;

    Ok(manifest)
}

fn preprocess_class(
    label: &str,
    class_dir: &Path,
    config: &PreprocessConfig,
) -> Result<ClassStats, PreprocessError> {
    let out_dir = config.output_root.join(label);
    ensure_dir(&out_dir)?;

    let images = list_class_images(class_dir, RAW_EXTENSIONS);
    let mut stats = ClassStats {
        total_images: images.len(),
        ..ClassStats::default()
    };

    for path in &images {
        match preprocess_image(path, &out_dir, config) {
            Ok(issue) => {
                stats.processed += 1;
                if let Some(issue) = issue {
                    stats.quality_issues.push(issue);
                }
            }
            Err(e) => {
                warn!("Failed: {:?} - {}", path, e);
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}

/// Normalize one image. Returns a `QualityIssue` when the audit raises any
/// flag, `None` for a clean image.
fn preprocess_image(
    path: &Path,
    out_dir: &Path,
    config: &PreprocessConfig,
) -> Result<Option<QualityIssue>, ImageStepError> {
    let img = image::open(path)
        .map_err(ImageStepError::Decode)?
        .to_rgb8();

    let (normalized, metadata) =
        center_crop_resize(&img, config.target_size, config.min_size_threshold);
    let enhanced = subtle_enhance(&normalized);
    let report = audit(&enhanced, &config.thresholds);

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let dest = out_dir.join(format!("{}.jpg", stem));
    save_jpeg(&enhanced, &dest, config.jpeg_quality).map_err(ImageStepError::Save)?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(stem)
        .to_string();

    Ok(report.has_issues().then(|| QualityIssue {
        filename,
        quality: report,
        metadata,
    }))
}
