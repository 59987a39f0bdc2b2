use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Which source root an image originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Primary,
    External,
}

/// A single discovered image with its provenance tag.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub path: PathBuf,
    pub provenance: Provenance,
}

/// Class label -> ordered image listing. BTreeMap keeps label iteration in
/// lexicographic order regardless of filesystem enumeration order.
pub type ClassCollection = BTreeMap<String, Vec<SourceImage>>;

/// Extensions recognized by the balancing path.
pub const BALANCE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Extensions recognized by the normalization path (raw phone exports may
/// additionally be bmp).
pub const RAW_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// Error raised when the scan finds nothing to work with.
#[derive(Debug)]
pub enum AggregateError {
    NoInputData,
}

impl std::fmt::Display for AggregateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateError::NoInputData => {
                write!(f, "No input data: no images found under any source root")
            }
        }
    }
}

impl std::error::Error for AggregateError {}

/// Check whether a path carries one of the recognized image extensions.
pub fn has_recognized_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            extensions.iter().any(|e| *e == ext)
        })
        .unwrap_or(false)
}

/// List the image files directly inside a class directory, sorted
/// lexicographically by path.
pub fn list_class_images(class_dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let mut images = Vec::new();
    if let Ok(entries) = fs::read_dir(class_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && has_recognized_extension(&path, extensions) {
                images.push(path);
            }
        }
    } else {
        warn!("Failed to read class directory: {:?}", class_dir);
    }
    images.sort();
    images
}

/// List the class subdirectories of a source root, sorted by label.
pub fn list_class_dirs(root: &Path) -> Vec<(String, PathBuf)> {
    let mut classes = Vec::new();
    if let Ok(entries) = fs::read_dir(root) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                if let Some(label) = path.file_name().and_then(|n| n.to_str()) {
                    classes.push((label.to_string(), path.clone()));
                }
            }
        }
    }
    classes.sort_by(|a, b| a.0.cmp(&b.0));
    classes
}

/// Merge per-class image listings across all source roots.
///
/// The first root is tagged `Primary`, any further roots `External`. Entries
/// for the same label accumulate without de-duplication; each class listing
/// ends up sorted by path so later seeded draws are platform independent.
/// Classes whose directories contain no recognized images are dropped with a
/// warning rather than carried as empty entries.
pub fn aggregate_sources(roots: &[PathBuf]) -> Result<ClassCollection, AggregateError> {
    let mut collection: ClassCollection = BTreeMap::new();

    for (index, root) in roots.iter().enumerate() {
        let provenance = if index == 0 {
            Provenance::Primary
        } else {
            Provenance::External
        };

        if !root.is_dir() {
            warn!("Source root {:?} does not exist, skipping", root);
            continue;
        }

        for (label, class_dir) in list_class_dirs(root) {
            let images = list_class_images(&class_dir, BALANCE_EXTENSIONS);
            if images.is_empty() {
                warn!("Class {:?} under {:?} has no images, skipping", label, root);
                continue;
            }
            collection
                .entry(label)
                .or_default()
                .extend(images.into_iter().map(|path| SourceImage { path, provenance }));
        }
    }

    if collection.is_empty() {
        return Err(AggregateError::NoInputData);
    }

    // Re-sort merged listings: entries from a later root may sort before
    // entries from an earlier one.
    for entries in collection.values_mut() {
        entries.sort_by(|a, b| a.path.cmp(&b.path));
    }

    let total: usize = collection.values().map(|v| v.len()).sum();
    info!(
        "Aggregated {} images across {} classes from {} source roots",
        total,
        collection.len(),
        roots.len()
    );

    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "curate_spice_aggregator_{}_{}",
            tag,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_merges_same_class_across_roots_with_provenance() {
        let base = temp_root("merge");
        let primary = base.join("merged");
        let external = base.join("external");
        fs::create_dir_all(primary.join("cumin")).unwrap();
        fs::create_dir_all(external.join("cumin")).unwrap();
        touch(&primary.join("cumin/a.jpg"));
        touch(&primary.join("cumin/b.png"));
        touch(&external.join("cumin/c.jpeg"));

        let collection = aggregate_sources(&[primary, external]).unwrap();
        let entries = &collection["cumin"];
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries
                .iter()
                .filter(|e| e.provenance == Provenance::Primary)
                .count(),
            2
        );
        assert_eq!(
            entries
                .iter()
                .filter(|e| e.provenance == Provenance::External)
                .count(),
            1
        );

        fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn test_listings_are_sorted_and_filtered() {
        let base = temp_root("sorted");
        let root = base.join("merged");
        fs::create_dir_all(root.join("safran")).unwrap();
        touch(&root.join("safran/02.jpg"));
        touch(&root.join("safran/01.jpg"));
        touch(&root.join("safran/notes.txt"));
        touch(&root.join("safran/03.PNG"));

        let collection = aggregate_sources(&[root]).unwrap();
        let names: Vec<String> = collection["safran"]
            .iter()
            .map(|e| e.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["01.jpg", "02.jpg", "03.PNG"]);

        fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn test_labels_iterate_in_sorted_order() {
        let base = temp_root("labels");
        let root = base.join("merged");
        for label in ["paprika", "anis", "cumin"] {
            fs::create_dir_all(root.join(label)).unwrap();
            touch(&root.join(label).join("img.jpg"));
        }

        let collection = aggregate_sources(&[root]).unwrap();
        let labels: Vec<&String> = collection.keys().collect();
        assert_eq!(labels, vec!["anis", "cumin", "paprika"]);

        fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn test_missing_roots_fail_with_no_input_data() {
        let base = temp_root("none");
        let result = aggregate_sources(&[base.join("does_not_exist")]);
        assert!(matches!(result, Err(AggregateError::NoInputData)));
        fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn test_empty_class_directories_are_dropped() {
        let base = temp_root("empty");
        let root = base.join("merged");
        fs::create_dir_all(root.join("vide")).unwrap();
        fs::create_dir_all(root.join("cumin")).unwrap();
        touch(&root.join("cumin/a.jpg"));

        let collection = aggregate_sources(&[root]).unwrap();
        assert!(collection.contains_key("cumin"));
        assert!(!collection.contains_key("vide"));

        fs::remove_dir_all(&base).unwrap();
    }
}
