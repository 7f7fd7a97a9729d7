//! File format adapters
//!
//! Adapters for the position-pair input, the annotated pair table with its
//! missing-positions report, and the gene statistics report.

pub mod annotated;
pub mod pairs;
pub mod stats;

pub use annotated::{
    render_rows, write_annotated_file, write_annotated_table, write_missing_file,
    write_missing_report, ANNOTATED_HEADER, MISSING_SUFFIX, MISSING_TITLE,
};
pub use pairs::{load_pairs_bytes, load_pairs_file, load_pairs_reader, PairSet, PositionPair};
pub use stats::{
    format_score, read_statistics, read_statistics_bytes, read_statistics_file,
    write_statistics_file, GenePairScore, GeneStatistics, OrderedCounter,
};
