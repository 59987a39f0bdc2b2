mod quality_auditor;

pub use quality_auditor::{audit, QualityReport};
