use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::{BalanceConfig, PreprocessConfig};
use crate::core::analysis::QualityReport;
use crate::core::image::CropMetadata;

/// File name of the balancing manifest inside the output root.
pub const BALANCE_LOG_FILENAME: &str = "balance_log.json";

/// File name of the normalization manifest inside the output root.
pub const PREPROCESS_LOG_FILENAME: &str = "preprocessing_log.json";

/// Error types for manifest persistence
#[derive(Debug)]
pub enum ManifestError {
    SerializeFailed(serde_json::Error),
    IoError(std::io::Error),
}

impl std::fmt::Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestError::SerializeFailed(e) => write!(f, "Serialize failed: {}", e),
            ManifestError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ManifestError {}

impl From<serde_json::Error> for ManifestError {
    fn from(error: serde_json::Error) -> Self {
        ManifestError::SerializeFailed(error)
    }
}

impl From<std::io::Error> for ManifestError {
    fn from(error: std::io::Error) -> Self {
        ManifestError::IoError(error)
    }
}

fn persist<T: Serialize>(value: &T, path: &Path) -> Result<(), ManifestError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    info!("Manifest saved to: {:?}", path);
    Ok(())
}

// ============================================================================
// Balancing manifest
// ============================================================================

/// Action taken for a class during balancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceAction {
    Sampled,
    Augmented,
}

/// Per-class outcome of a balancing run.
#[derive(Debug, Clone, Serialize)]
pub struct ClassRecord {
    pub original_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub augmented_count: Option<usize>,
    pub final_count: usize,
    pub action: BalanceAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceConfigSnapshot {
    pub target_per_class: usize,
    pub random_seed: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BalanceSummary {
    pub total_original: usize,
    pub total_balanced: usize,
    pub classes_sampled: Vec<String>,
    pub classes_augmented: Vec<String>,
}

/// Persisted record of a balancing run: config snapshot, per-class records
/// and the running summary. Created empty at run start, filled as classes
/// complete, written exactly once at run end.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceManifest {
    pub config: BalanceConfigSnapshot,
    pub classes: BTreeMap<String, ClassRecord>,
    pub summary: BalanceSummary,
}

impl BalanceManifest {
    pub fn new(config: &BalanceConfig) -> Self {
        Self {
            config: BalanceConfigSnapshot {
                target_per_class: config.target_per_class,
                random_seed: config.random_seed,
            },
            classes: BTreeMap::new(),
            summary: BalanceSummary::default(),
        }
    }

    /// Record one completed class and fold it into the summary totals.
    pub fn record_class(&mut self, label: &str, record: ClassRecord) {
        self.summary.total_original += record.original_count;
        self.summary.total_balanced += record.final_count;
        match record.action {
            BalanceAction::Sampled => self.summary.classes_sampled.push(label.to_string()),
            BalanceAction::Augmented => self.summary.classes_augmented.push(label.to_string()),
        }
        self.classes.insert(label.to_string(), record);
    }

    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        persist(self, path)
    }
}

// ============================================================================
// Normalization manifest
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct QualitySettingsSnapshot {
    pub resampling: &'static str,
    pub jpeg_quality: u8,
    pub no_padding: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreprocessConfigSnapshot {
    pub target_size: u32,
    pub min_size_threshold: u32,
    pub crop_mode: &'static str,
    pub preprocessing_steps: Vec<&'static str>,
    pub quality_settings: QualitySettingsSnapshot,
}

/// One image whose audit raised at least one flag.
#[derive(Debug, Clone, Serialize)]
pub struct QualityIssue {
    pub filename: String,
    pub quality: QualityReport,
    pub metadata: CropMetadata,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassStats {
    pub total_images: usize,
    pub processed: usize,
    pub failed: usize,
    pub quality_issues: Vec<QualityIssue>,
}

/// Persisted record of a normalization run.
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessManifest {
    pub config: PreprocessConfigSnapshot,
    pub classes: BTreeMap<String, ClassStats>,
}

impl PreprocessManifest {
    pub fn new(config: &PreprocessConfig) -> Self {
        Self {
            config: PreprocessConfigSnapshot {
                target_size: config.target_size,
                min_size_threshold: config.min_size_threshold,
                crop_mode: "center",
                preprocessing_steps: vec![
                    "center_crop_square",
                    "resize_lanczos",
                    "subtle_enhancement",
                    "quality_check",
                ],
                quality_settings: QualitySettingsSnapshot {
                    resampling: "LANCZOS",
                    jpeg_quality: config.jpeg_quality,
                    no_padding: true,
                },
            },
            classes: BTreeMap::new(),
        }
    }

    pub fn record_class(&mut self, label: &str, stats: ClassStats) {
        self.classes.insert(label.to_string(), stats);
    }

    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        persist(self, path)
    }
}
