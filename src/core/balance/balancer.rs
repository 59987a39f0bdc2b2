use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::config::BalanceConfig;
use crate::core::dataset::{aggregate_sources, AggregateError, SourceImage};
use crate::core::image::{apply, AugmentationKind};
use crate::core::manifest::{
    BalanceAction, BalanceManifest, ClassRecord, ManifestError, BALANCE_LOG_FILENAME,
};
use crate::core::operations::{copy_file, ensure_dir, save_jpeg, FileOpError};

/// Error types for a balancing run
#[derive(Debug)]
pub enum BalanceError {
    NoInputData(AggregateError),
    FileOp(FileOpError),
    Manifest(ManifestError),
}

impl std::fmt::Display for BalanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceError::NoInputData(e) => write!(f, "{}", e),
            BalanceError::FileOp(e) => write!(f, "{}", e),
            BalanceError::Manifest(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for BalanceError {}

impl From<AggregateError> for BalanceError {
    fn from(error: AggregateError) -> Self {
        BalanceError::NoInputData(error)
    }
}

impl From<FileOpError> for BalanceError {
    fn from(error: FileOpError) -> Self {
        BalanceError::FileOp(error)
    }
}

impl From<ManifestError> for BalanceError {
    fn from(error: ManifestError) -> Self {
        BalanceError::Manifest(error)
    }
}

/// Per-class reconciliation plan, derived before any file is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceDecision {
    /// Class is at or above target: draw this many items without replacement.
    Sample { sample_size: usize },
    /// Class is below target: copy everything, then synthesize `needed`
    /// variants at up to `per_image_quota` per original.
    Augment { needed: usize, per_image_quota: usize },
}

/// Decide how a class reaches the target count.
pub fn decide(original_count: usize, target_count: usize) -> BalanceDecision {
    if original_count >= target_count {
        BalanceDecision::Sample {
            sample_size: target_count,
        }
    } else {
        let needed = target_count - original_count;
        BalanceDecision::Augment {
            needed,
            per_image_quota: (needed + original_count - 1) / original_count,
        }
    }
}

/// Run the balancing pipeline end to end.
///
/// Classes are processed in sorted label order with a single seeded random
/// source, so identical input listings and an identical seed reproduce the
/// exact same sampled subsets. The manifest is written once at run end and
/// reflects every class that completed.
pub fn run(config: &BalanceConfig) -> Result<BalanceManifest, BalanceError> {
    // Fatal before any output directory is created.
    let collection = aggregate_sources(&config.source_roots)?;

    info!(
        "Balancing {} classes to {} images each (seed {})",
        collection.len(),
        config.target_per_class,
        config.random_seed
    );

    let mut rng = StdRng::seed_from_u64(config.random_seed);
    let mut manifest = BalanceManifest::new(config);
    ensure_dir(&config.output_root)?;

    for (label, entries) in &collection {
        let record = balance_class(label, entries, config, &mut rng)?;

        match record.action {
            BalanceAction::Sampled => info!(
                "{}: {} -> {} (sampled)",
                label, record.original_count, record.final_count
            ),
            BalanceAction::Augmented => {
                info!(
                    "{}: {} -> {} (augmented +{})",
                    label,
                    record.original_count,
                    record.final_count,
                    record.augmented_count.unwrap_or(0)
                );
                if record.final_count < config.target_per_class {
                    warn!(
                        "{}: ended {} short of target {}",
                        label,
                        config.target_per_class - record.final_count,
                        config.target_per_class
                    );
                }
            }
        }

        manifest.record_class(label, record);
    }

    manifest.save(&config.output_root.join(BALANCE_LOG_FILENAME))?;

    info!(
        "Balancing complete: {} original -> {} balanced ({} sampled, {} augmented)",
        manifest.summary.total_original,
        manifest.summary.total_balanced,
        manifest.summary.classes_sampled.len(),
        manifest.summary.classes_augmented.len()
    );

    Ok(manifest)
}

fn balance_class<R: Rng>(
    label: &str,
    entries: &[SourceImage],
    config: &BalanceConfig,
    rng: &mut R,
) -> Result<ClassRecord, BalanceError> {
    let class_dir = config.output_root.join(label);
    ensure_dir(&class_dir)?;

    let original_count = entries.len();
    match decide(original_count, config.target_per_class) {
        BalanceDecision::Sample { sample_size } => {
            let chosen: Vec<&SourceImage> = entries.choose_multiple(rng, sample_size).collect();
            let copied = copy_originals(label, &chosen, &class_dir);
            Ok(ClassRecord {
                original_count,
                augmented_count: None,
                final_count: copied,
                action: BalanceAction::Sampled,
            })
        }
        BalanceDecision::Augment {
            needed,
            per_image_quota,
        } => {
            let all: Vec<&SourceImage> = entries.iter().collect();
            let copied = copy_originals(label, &all, &class_dir);
            let augmented =
                augment_class(label, entries, &class_dir, needed, per_image_quota, config, rng);
            Ok(ClassRecord {
                original_count,
                augmented_count: Some(augmented),
                final_count: copied + augmented,
                action: BalanceAction::Augmented,
            })
        }
    }
}

/// Copy selected originals verbatim under normalized sequential names.
/// Returns the number actually copied; failures are contained per image.
fn copy_originals(label: &str, entries: &[&SourceImage], class_dir: &Path) -> usize {
    let mut copied = 0;
    for (idx, entry) in entries.iter().enumerate() {
        let dest = class_dir.join(format!("{}_{:04}.jpg", label, idx));
        match copy_file(&entry.path, &dest) {
            Ok(()) => copied += 1,
            Err(e) => warn!("Skipping original {:?}: {}", entry.path, e),
        }
    }
    copied
}

/// Synthesize variants until `needed` is reached or every original has been
/// offered its quota. Failed attempts are logged and never counted, so the
/// return value may fall short of `needed`.
fn augment_class<R: Rng>(
    label: &str,
    entries: &[SourceImage],
    class_dir: &Path,
    needed: usize,
    per_image_quota: usize,
    config: &BalanceConfig,
    rng: &mut R,
) -> usize {
    let mut augmented = 0;

    'sources: for entry in entries {
        if augmented >= needed {
            break;
        }

        let source = match image::open(&entry.path) {
            Ok(img) => img.to_rgb8(),
            Err(e) => {
                warn!("Augmentation source unreadable {:?}: {}", entry.path, e);
                continue;
            }
        };

        for _ in 0..per_image_quota {
            if augmented >= needed {
                break 'sources;
            }

            let kind = AugmentationKind::random(rng);
            let variant = apply(&source, kind);
            let dest = class_dir.join(format!("{}_aug{:04}_{}.jpg", label, augmented, kind.tag()));
            match save_jpeg(&variant, &dest, config.augmented_jpeg_quality) {
                Ok(()) => augmented += 1,
                Err(e) => warn!("Augmentation failed for {:?}: {}", entry.path, e),
            }
        }
    }

    augmented
}
