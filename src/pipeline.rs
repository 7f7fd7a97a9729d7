//! End-to-end runs
//!
//! `run_annotate` loads pairs, annotates their coordinates and writes the
//! annotated table plus the missing-positions report. `run_stats` turns an
//! annotated table into the gene statistics report.
//!
//! Each stage opens, fully reads or writes, and closes one file before the
//! next stage starts.

use crate::core::{
    parse_feature_table_file, AnnotationEngine, GeneLocatorError, Result, SearchStrategy,
};
use crate::formats::{
    load_pairs_file, read_statistics_file, write_annotated_file, write_missing_file,
    write_statistics_file, GeneStatistics, MISSING_SUFFIX,
};
use log::info;
use std::path::PathBuf;

/// Settings of an annotation run
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotateConfig {
    /// Directory holding the input files
    pub input_path: PathBuf,
    /// Position-pairs file name
    pub position_file: String,
    /// Feature table file name
    pub feature_table_file: String,
    /// Directory for the output files
    pub output_path: PathBuf,
    /// Annotated table file name; also the stem of the missing report
    pub output_file: String,
    /// Inclusive lower bound on the association score
    pub threshold: f64,
    pub strategy: SearchStrategy,
}

impl AnnotateConfig {
    pub fn new(
        input_path: impl Into<PathBuf>,
        position_file: impl Into<String>,
        feature_table_file: impl Into<String>,
        output_path: impl Into<PathBuf>,
        output_file: impl Into<String>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            position_file: position_file.into(),
            feature_table_file: feature_table_file.into(),
            output_path: output_path.into(),
            output_file: output_file.into(),
            threshold: 0.0,
            strategy: SearchStrategy::default(),
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(GeneLocatorError::Config(format!(
                "threshold must be a finite number, got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    pub fn position_path(&self) -> PathBuf {
        self.input_path.join(&self.position_file)
    }

    pub fn feature_table_path(&self) -> PathBuf {
        self.input_path.join(&self.feature_table_file)
    }

    pub fn output_table_path(&self) -> PathBuf {
        self.output_path.join(&self.output_file)
    }

    /// `<output_path>/<output_file>_missing_pos.txt`
    pub fn missing_report_path(&self) -> PathBuf {
        self.output_path
            .join(format!("{}{}", self.output_file, MISSING_SUFFIX))
    }
}

/// Summary of an annotation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotateStats {
    /// Non-empty pair records read
    pub pairs_read: usize,
    /// Pairs at or above the threshold
    pub pairs_kept: usize,
    pub unique_positions: usize,
    /// Positions that received any annotation field
    pub resolved: usize,
    pub missing_entries: usize,
    pub features: usize,
    pub rows_written: usize,
}

/// Annotate position pairs and write the table and missing report
pub fn run_annotate(config: &AnnotateConfig) -> Result<AnnotateStats> {
    config.validate()?;

    info!("Reading position pairs (threshold {})", config.threshold);
    let pairs = load_pairs_file(&config.position_path(), config.threshold)?;

    info!("Looking up genes ({:?} search)", config.strategy);
    let table_path = config.feature_table_path();
    let table = parse_feature_table_file(&table_path)?;
    let features = table.len();
    let engine = AnnotationEngine::new(table, config.strategy);
    let annotations = engine
        .annotate_all(&pairs.positions)
        .map_err(|e| e.in_file(&table_path))?;

    let output = config.output_table_path();
    let rows_written = write_annotated_file(&output, &pairs.pairs, &annotations)?;
    info!("Output saved in {}", output.display());

    let missing_path = config.missing_report_path();
    let missing_entries = write_missing_file(&missing_path, &annotations)?;
    info!(
        "{} missing positions saved in {}",
        missing_entries,
        missing_path.display()
    );

    Ok(AnnotateStats {
        pairs_read: pairs.total,
        pairs_kept: pairs.pairs.len(),
        unique_positions: annotations.len(),
        resolved: annotations.resolved_count(),
        missing_entries,
        features,
        rows_written,
    })
}

/// Settings of a statistics run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsConfig {
    pub input_path: PathBuf,
    /// Annotated table produced by an annotation run
    pub gene_pairs_file: String,
    pub output_path: PathBuf,
    pub output_file: String,
}

impl StatsConfig {
    pub fn new(
        input_path: impl Into<PathBuf>,
        gene_pairs_file: impl Into<String>,
        output_path: impl Into<PathBuf>,
        output_file: impl Into<String>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            gene_pairs_file: gene_pairs_file.into(),
            output_path: output_path.into(),
            output_file: output_file.into(),
        }
    }

    pub fn gene_pairs_path(&self) -> PathBuf {
        self.input_path.join(&self.gene_pairs_file)
    }

    pub fn output_report_path(&self) -> PathBuf {
        self.output_path.join(&self.output_file)
    }
}

/// Aggregate an annotated table and write the statistics report
pub fn run_stats(config: &StatsConfig) -> Result<GeneStatistics> {
    let stats = read_statistics_file(&config.gene_pairs_path())?;

    let output = config.output_report_path();
    write_statistics_file(&output, &stats)?;
    info!("Statistics saved in {}", output.display());

    Ok(stats)
}
