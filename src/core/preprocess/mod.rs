mod preprocessor;

pub use preprocessor::{run, PreprocessError};
