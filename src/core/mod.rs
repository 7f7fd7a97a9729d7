//! Core annotation functionality
//!
//! This module contains the feature table parser, the position
//! annotation engine, error types and text I/O helpers.

mod engine;
mod error;
mod feature_table;
pub mod io;

pub use engine::{
    Annotation, AnnotationEngine, AnnotationSet, MissingEntry, Resolution, SearchStrategy,
    TargetPosition, CDS_KIND, GENE_KIND, MISSING_REASON,
};
pub use error::{
    AnnotationError, GeneLocatorError, RecordError, RecordResult, Result,
};
pub use feature_table::{
    parse_feature_table_bytes, parse_feature_table_file, parse_feature_table_reader,
    FeatureGroup, FeatureRecord, FeatureTable, Range, MIN_FEATURE_FIELDS,
};
pub use io::{CompressionFormat, DEFAULT_BUFFER_SIZE};
