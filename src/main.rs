//! GeneLocator CLI entry point
//!
//! Annotates genome position pairs with genes from a GenBank feature table
//! and reports gene statistics over the annotated pairs.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use gene_locator::pipeline::{run_annotate, run_stats, AnnotateConfig, StatsConfig};
use gene_locator::SearchStrategy;
use std::path::PathBuf;
use std::time::Instant;

/// Containment search strategy (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum SearchStrategyArg {
    /// Scan the whole feature table for every position
    #[default]
    #[value(name = "linear")]
    Linear,
    /// Build an interval index once and query it per position
    #[value(name = "interval")]
    Interval,
}

impl From<SearchStrategyArg> for SearchStrategy {
    fn from(arg: SearchStrategyArg) -> Self {
        match arg {
            SearchStrategyArg::Linear => SearchStrategy::Linear,
            SearchStrategyArg::Interval => SearchStrategy::Interval,
        }
    }
}

#[derive(Parser)]
#[command(name = "gene-locator")]
#[command(about = "Annotate genome position pairs with genes from a GenBank feature table")]
#[command(version)]
#[command(author = "GeneLocator Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get gene names for pairs of genome positions
    Annotate {
        /// Path to read input files
        #[arg(long = "input-path", alias = "input_path")]
        input_path: PathBuf,
        /// Tab-separated pairs: position 1, position 2, distance, label, association score
        #[arg(long = "position-file", alias = "position_file")]
        position_file: String,
        /// GenBank feature table file
        #[arg(long = "feature-table-file", aliases = ["genebank_file", "feature_table_file"])]
        feature_table_file: String,
        /// Path to place output files
        #[arg(long = "output-path", alias = "output_path")]
        output_path: PathBuf,
        /// Output table file name (missing positions go to <name>_missing_pos.txt)
        #[arg(long = "output-file", alias = "output_file")]
        output_file: String,
        /// Minimum association score to keep a pair (inclusive)
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        threshold: f64,
        /// Containment search strategy
        #[arg(long, default_value = "linear")]
        strategy: SearchStrategyArg,
    },
    /// Get statistics of genes and gene pairs from an annotated table
    Stats {
        /// Path to read input files
        #[arg(long = "input-path", alias = "input_path")]
        input_path: PathBuf,
        /// Annotated table produced by `annotate`
        #[arg(long = "gene-pairs-file", alias = "gene_pairs_file")]
        gene_pairs_file: String,
        /// Path to place output files
        #[arg(long = "output-path", alias = "output_path")]
        output_path: PathBuf,
        /// Output statistics file name
        #[arg(long = "output-file", alias = "output_file")]
        output_file: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Annotate {
            input_path,
            position_file,
            feature_table_file,
            output_path,
            output_file,
            threshold,
            strategy,
        } => {
            let config = AnnotateConfig::new(
                input_path,
                position_file,
                feature_table_file,
                output_path,
                output_file,
            )
            .with_threshold(threshold)
            .with_strategy(strategy.into());

            eprintln!("=== Parameters ===");
            eprintln!("Position pairs:  {:?}", config.position_path());
            eprintln!("Feature table:   {:?}", config.feature_table_path());
            eprintln!("Output table:    {:?}", config.output_table_path());
            eprintln!("Missing report:  {:?}", config.missing_report_path());
            eprintln!("Threshold:       {}", config.threshold);
            eprintln!("Search:          {:?}", config.strategy);

            let stats = run_annotate(&config).context("Annotation run failed")?;

            eprintln!("\n=== Annotation Statistics ===");
            eprintln!("Pairs read:       {}", stats.pairs_read);
            eprintln!("Pairs kept:       {}", stats.pairs_kept);
            eprintln!("Unique positions: {}", stats.unique_positions);
            eprintln!("Annotated:        {}", stats.resolved);
            eprintln!("Missing entries:  {}", stats.missing_entries);
            eprintln!("Features:         {}", stats.features);
            eprintln!("Rows written:     {}", stats.rows_written);
            eprintln!("Time elapsed:     {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Stats {
            input_path,
            gene_pairs_file,
            output_path,
            output_file,
        } => {
            let config = StatsConfig::new(input_path, gene_pairs_file, output_path, output_file);

            eprintln!("=== Parameters ===");
            eprintln!("Gene pairs:      {:?}", config.gene_pairs_path());
            eprintln!("Output report:   {:?}", config.output_report_path());

            let stats = run_stats(&config).context("Statistics run failed")?;

            eprintln!("\n=== Gene Statistics ===");
            eprintln!("Rows:             {}", stats.rows());
            eprintln!("Distinct pairs:   {}", stats.pair_totals.len());
            eprintln!("Genes (pos 1):    {}", stats.gene_1_totals.len());
            eprintln!("Genes (pos 2):    {}", stats.gene_2_totals.len());
            eprintln!("Time elapsed:     {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
