use std::fs;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use tracing::error;

/// Result type for file operations
pub type FileOpResult<T> = Result<T, FileOpError>;

/// Error types for file operations
#[derive(Debug)]
pub enum FileOpError {
    CopyFailed(String),
    CreateDirFailed(String),
    EncodeFailed(String),
    IoError(std::io::Error),
}

impl std::fmt::Display for FileOpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOpError::CopyFailed(msg) => write!(f, "Copy failed: {}", msg),
            FileOpError::CreateDirFailed(msg) => write!(f, "Create directory failed: {}", msg),
            FileOpError::EncodeFailed(msg) => write!(f, "Encode failed: {}", msg),
            FileOpError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for FileOpError {}

impl From<std::io::Error> for FileOpError {
    fn from(error: std::io::Error) -> Self {
        FileOpError::IoError(error)
    }
}

/// Copy a file verbatim from source to destination.
///
/// # Returns
/// * `Ok(())` if successful
/// * `Err(FileOpError)` if the copy failed
pub fn copy_file(src: &Path, dest: &Path) -> FileOpResult<()> {
    if let Err(e) = fs::copy(src, dest) {
        error!("Failed to copy file from {:?} to {:?}: {}", src, dest, e);
        return Err(FileOpError::CopyFailed(format!(
            "Failed to copy from {:?} to {:?}: {}",
            src, dest, e
        )));
    }
    Ok(())
}

/// Create a directory and all of its parents.
pub fn ensure_dir(path: &Path) -> FileOpResult<()> {
    fs::create_dir_all(path).map_err(|e| {
        error!("Failed to create directory {:?}: {}", path, e);
        FileOpError::CreateDirFailed(format!("Failed to create {:?}: {}", path, e))
    })
}

/// Encode an RGB image as JPEG at the given quality and write it to disk.
pub fn save_jpeg(img: &RgbImage, dest: &Path, quality: u8) -> FileOpResult<()> {
    let file = fs::File::create(dest)?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    img.write_with_encoder(encoder).map_err(|e| {
        error!("Failed to encode JPEG {:?}: {}", dest, e);
        FileOpError::EncodeFailed(format!("Failed to encode {:?}: {}", dest, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "curate_spice_file_ops_{}_{}",
            tag,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_copy_file_roundtrip() {
        let dir = temp_dir("copy");
        let src = dir.join("src.jpg");
        let dest = dir.join("dest.jpg");
        fs::write(&src, b"not really a jpeg").unwrap();

        copy_file(&src, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"not really a jpeg");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_copy_file_missing_source_fails() {
        let dir = temp_dir("missing");
        let result = copy_file(&dir.join("nope.jpg"), &dir.join("dest.jpg"));
        assert!(matches!(result, Err(FileOpError::CopyFailed(_))));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_jpeg_writes_decodable_file() {
        let dir = temp_dir("jpeg");
        let dest = dir.join("out.jpg");
        let img = RgbImage::from_pixel(8, 8, image::Rgb([120, 60, 30]));

        save_jpeg(&img, &dest, 95).unwrap();
        let loaded = image::open(&dest).unwrap();
        assert_eq!(loaded.width(), 8);
        assert_eq!(loaded.height(), 8);

        fs::remove_dir_all(&dir).unwrap();
    }
}
