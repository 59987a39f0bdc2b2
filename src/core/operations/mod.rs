mod file_ops;

pub use file_ops::{copy_file, ensure_dir, save_jpeg, FileOpError, FileOpResult};
