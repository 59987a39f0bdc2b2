mod aggregator;

pub use aggregator::{
    aggregate_sources, has_recognized_extension, list_class_dirs, list_class_images,
    AggregateError, ClassCollection, Provenance, SourceImage, BALANCE_EXTENSIONS, RAW_EXTENSIONS,
};
