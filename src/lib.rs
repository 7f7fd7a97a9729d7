//! GeneLocator - gene annotation for genome position pairs
//!
//! Resolves both coordinates of each position pair to the gene/CDS entry of a
//! GenBank feature table that contains them, and aggregates the annotated
//! pairs into gene frequency rankings.
//!
//! # Features
//!
//! - Grouped feature-table parsing with line-accurate errors
//! - Linear or interval-index (rust-lapper) containment search
//! - Transparent gzip/bzip2 input decompression
//!
//! # Example
//!
//! ```ignore
//! use gene_locator::{AnnotationEngine, SearchStrategy, parse_feature_table_file};
//! use gene_locator::formats::load_pairs_file;
//!
//! let table = parse_feature_table_file("sequence.tbl".as_ref())?;
//! let engine = AnnotationEngine::new(table, SearchStrategy::Interval);
//!
//! let pairs = load_pairs_file("pairs.tsv".as_ref(), 1.0)?;
//! let annotations = engine.annotate_all(&pairs.positions)?;
//! ```

pub mod core;
pub mod formats;
pub mod pipeline;

// Re-export commonly used types
pub use core::{
    Annotation, AnnotationEngine, AnnotationError, AnnotationSet, FeatureGroup, FeatureRecord,
    FeatureTable, GeneLocatorError, MissingEntry, Range, RecordError, Result, SearchStrategy,
    TargetPosition, parse_feature_table_bytes, parse_feature_table_file,
};
pub use pipeline::{AnnotateConfig, AnnotateStats, StatsConfig, run_annotate, run_stats};
