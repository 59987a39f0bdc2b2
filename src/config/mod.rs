mod pipeline;

pub use pipeline::{BalanceConfig, PreprocessConfig, QualityThresholds};
