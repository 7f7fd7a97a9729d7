//! Gene statistics over an annotated pair table
//!
//! Counts genes at each pair position and gene pairs, and lists every pair
//! with its score. All rankings are descending and stable, so ties keep the
//! order in which they were first seen.

use crate::core::io::{create_buf_writer, open_text_reader, split_fields};
use crate::core::{GeneLocatorError, RecordError, RecordResult, Result};
use indexmap::IndexMap;
use log::info;
use std::hash::Hash;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Minimum number of columns in an annotated table row
pub const STATS_FIELDS: usize = 19;

const GENE_1_COL: usize = 4;
const GENE_2_COL: usize = 12;
const SCORE_COL: usize = 18;

/// Prefix of the annotated table header row
const HEADER_PREFIX: &str = "position_1";

const BAR: &str = "--------------------------------";

/// Section titles, in report order
pub const PAIR_SCORE_TITLE: &str = "SCORE OF PAIR OF GENES HIGHLY ASSOCIATED";
pub const PAIR_TOTAL_TITLE: &str = "TOTAL OF PAIR OF GENES HIGHLY ASSOCIATED";
pub const GENE_1_TOTAL_TITLE: &str = "TOTAL GENES HIGHLY ASSOCIATED (POSITION 1)";
pub const GENE_2_TOTAL_TITLE: &str = "TOTAL GENES HIGHLY ASSOCIATED (POSITION 2)";

/// A gene pair and the score of the row it came from
#[derive(Debug, Clone, PartialEq)]
pub struct GenePairScore {
    pub gene_1: String,
    pub gene_2: String,
    pub score: f64,
}

/// Occurrence counter that remembers first-seen order
#[derive(Debug, Clone)]
pub struct OrderedCounter<K> {
    counts: IndexMap<K, usize>,
}

impl<K> Default for OrderedCounter<K> {
    fn default() -> Self {
        Self {
            counts: IndexMap::new(),
        }
    }
}

impl<K: Eq + Hash> OrderedCounter<K> {
    pub fn add(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    pub fn get(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries by descending count; ties keep first-seen order
    pub fn ranked(&self) -> Vec<(&K, usize)> {
        let mut ranked: Vec<(&K, usize)> = self.counts.iter().map(|(k, &n)| (k, n)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Aggregated statistics of an annotated pair table
#[derive(Debug, Clone, Default)]
pub struct GeneStatistics {
    pub pair_scores: Vec<GenePairScore>,
    pub pair_totals: OrderedCounter<(String, String)>,
    pub gene_1_totals: OrderedCounter<String>,
    pub gene_2_totals: OrderedCounter<String>,
}

impl GeneStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one annotated row
    pub fn add_row(&mut self, gene_1: &str, gene_2: &str, score: f64) {
        self.gene_1_totals.add(gene_1.to_string());
        self.gene_2_totals.add(gene_2.to_string());
        self.pair_totals
            .add((gene_1.to_string(), gene_2.to_string()));
        self.pair_scores.push(GenePairScore {
            gene_1: gene_1.to_string(),
            gene_2: gene_2.to_string(),
            score,
        });
    }

    /// Number of rows aggregated
    pub fn rows(&self) -> usize {
        self.pair_scores.len()
    }

    /// Pair scores by descending score; ties keep input order
    pub fn ranked_pair_scores(&self) -> Vec<&GenePairScore> {
        let mut ranked: Vec<&GenePairScore> = self.pair_scores.iter().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    /// Write the four-section report
    pub fn write_report<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_title(writer, PAIR_SCORE_TITLE, "Gene 1\tGene 2\tScore")?;
        for pair in self.ranked_pair_scores() {
            writeln!(writer, "{}\t{}\t{}", pair.gene_1, pair.gene_2, format_score(pair.score))?;
        }

        write_title(writer, PAIR_TOTAL_TITLE, "Gene 1\tGene 2\tTotal")?;
        for ((gene_1, gene_2), total) in self.pair_totals.ranked() {
            writeln!(writer, "{}\t{}\t{}", gene_1, gene_2, total)?;
        }

        write_title(writer, GENE_1_TOTAL_TITLE, "Gene\tTotal")?;
        for (gene, total) in self.gene_1_totals.ranked() {
            writeln!(writer, "{}\t{}", gene, total)?;
        }

        write_title(writer, GENE_2_TOTAL_TITLE, "Gene\tTotal")?;
        for (gene, total) in self.gene_2_totals.ranked() {
            writeln!(writer, "{}\t{}", gene, total)?;
        }
        Ok(())
    }
}

fn write_title<W: Write>(writer: &mut W, title: &str, columns: &str) -> io::Result<()> {
    writeln!(writer, "{} {} {}", BAR, title, BAR)?;
    writeln!(writer, "{}", columns)
}

/// Shortest round-trip form of a score
///
/// Integral values keep one decimal (`2.0`). Magnitudes below `1e-4` or from
/// `1e16` up switch to exponent notation with a signed two-digit exponent
/// (`1e-05`, `1.5e+16`).
pub fn format_score(score: f64) -> String {
    if score.is_nan() {
        return "nan".to_string();
    }
    if score.is_infinite() {
        return if score > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = score.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", score);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => match exponent.strip_prefix('-') {
                Some(digits) => format!("{}e-{:0>2}", mantissa, digits),
                None => format!("{}e+{:0>2}", mantissa, exponent),
            },
            None => formatted,
        };
    }

    if score.fract() == 0.0 {
        format!("{:.1}", score)
    } else {
        format!("{}", score)
    }
}

/// Aggregate an annotated table from a reader
///
/// The header row and blank lines are skipped.
pub fn read_statistics<R: BufRead>(reader: R) -> RecordResult<GeneStatistics> {
    let mut stats = GeneStatistics::new();

    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.is_empty() || line.starts_with(HEADER_PREFIX) {
            continue;
        }

        let line_number = idx + 1;
        let fields = split_fields(&line);
        if fields.len() < STATS_FIELDS {
            return Err(RecordError::too_few_fields(line_number, STATS_FIELDS, fields.len()));
        }

        let score = fields[SCORE_COL]
            .trim()
            .parse::<f64>()
            .map_err(|_| RecordError::invalid_number(line_number, "score", fields[SCORE_COL]))?;
        stats.add_row(fields[GENE_1_COL], fields[GENE_2_COL], score);
    }

    Ok(stats)
}

/// Aggregate an annotated table file
pub fn read_statistics_file(path: &Path) -> Result<GeneStatistics> {
    let reader = open_text_reader(path).map_err(|e| GeneLocatorError::file(path, e))?;
    let stats = read_statistics(reader).map_err(|e| e.in_file(path))?;

    info!(
        "Gene pairs file {}: {} rows, {} distinct pairs",
        path.display(),
        stats.rows(),
        stats.pair_totals.len()
    );
    Ok(stats)
}

/// Aggregate an annotated table from bytes (for testing)
pub fn read_statistics_bytes(data: &[u8]) -> RecordResult<GeneStatistics> {
    read_statistics(BufReader::new(data))
}

/// Write the statistics report to a file
pub fn write_statistics_file(path: &Path, stats: &GeneStatistics) -> Result<()> {
    let mut writer = create_buf_writer(path).map_err(|e| GeneLocatorError::file(path, e))?;
    stats.write_report(&mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(gene_1: &str, gene_2: &str, score: &str) -> String {
        format!(
            "1\t\t\t\t{}\t\t\t\t2\t\t\t\t{}\t\t\t\t10\tlabel\t{}\n",
            gene_1, gene_2, score
        )
    }

    #[test]
    fn test_gene_1_totals() {
        let data = [row("dnaA", "x", "1"), row("dnaA", "y", "1"), row("gyrB", "x", "1")].concat();
        let stats = read_statistics_bytes(data.as_bytes()).unwrap();

        let ranked = stats.gene_1_totals.ranked();
        assert_eq!(ranked.len(), 2);
        assert_eq!((ranked[0].0.as_str(), ranked[0].1), ("dnaA", 2));
        assert_eq!((ranked[1].0.as_str(), ranked[1].1), ("gyrB", 1));
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let data = [
            row("c", "z", "1"),
            row("a", "z", "1"),
            row("b", "z", "1"),
            row("a", "z", "1"),
            row("b", "z", "1"),
        ]
        .concat();
        let stats = read_statistics_bytes(data.as_bytes()).unwrap();
        let genes: Vec<&str> = stats
            .gene_1_totals
            .ranked()
            .into_iter()
            .map(|(g, _)| g.as_str())
            .collect();
        assert_eq!(genes, vec!["a", "b", "c"]);
        assert_eq!(stats.pair_totals.get(&("a".to_string(), "z".to_string())), 2);
    }

    #[test]
    fn test_header_and_blank_lines_skipped() {
        let data = format!(
            "position_1\tstart_pos_1\n\n{}",
            row("dnaA", "gyrB", "2.5")
        );
        let stats = read_statistics_bytes(data.as_bytes()).unwrap();
        assert_eq!(stats.rows(), 1);
    }

    #[test]
    fn test_short_row_rejected() {
        let err = read_statistics_bytes(b"1\t2\t3\n").unwrap_err();
        assert!(matches!(err, RecordError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_bad_score_rejected() {
        let data = row("a", "b", "NA");
        let err = read_statistics_bytes(data.as_bytes()).unwrap_err();
        assert!(matches!(err, RecordError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(2.0), "2.0");
        assert_eq!(format_score(1.5), "1.5");
        assert_eq!(format_score(0.125), "0.125");
        assert_eq!(format_score(-3.0), "-3.0");
        assert_eq!(format_score(0.0), "0.0");
        assert_eq!(format_score(0.0001), "0.0001");
        assert_eq!(format_score(9999999999999998.0), "9999999999999998.0");
    }

    #[test]
    fn test_format_score_exponent_notation() {
        assert_eq!(format_score(1e-05), "1e-05");
        assert_eq!(format_score(2.5e-7), "2.5e-07");
        assert_eq!(format_score(1e16), "1e+16");
        assert_eq!(format_score(-1.5e16), "-1.5e+16");
        assert_eq!(format_score(1e100), "1e+100");
        assert_eq!(format_score(f64::INFINITY), "inf");
        assert_eq!(format_score(f64::NAN), "nan");
    }

    #[test]
    fn test_report_sections() {
        let data = [
            row("dnaA", "gyrB", "1.5"),
            row("dnaA", "gyrB", "3"),
            row("recA", "dnaA", "2"),
        ]
        .concat();
        let stats = read_statistics_bytes(data.as_bytes()).unwrap();

        let mut out = Vec::new();
        stats.write_report(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        let expected = vec![
            "-------------------------------- SCORE OF PAIR OF GENES HIGHLY ASSOCIATED --------------------------------",
            "Gene 1\tGene 2\tScore",
            "dnaA\tgyrB\t3.0",
            "recA\tdnaA\t2.0",
            "dnaA\tgyrB\t1.5",
            "-------------------------------- TOTAL OF PAIR OF GENES HIGHLY ASSOCIATED --------------------------------",
            "Gene 1\tGene 2\tTotal",
            "dnaA\tgyrB\t2",
            "recA\tdnaA\t1",
            "-------------------------------- TOTAL GENES HIGHLY ASSOCIATED (POSITION 1) --------------------------------",
            "Gene\tTotal",
            "dnaA\t2",
            "recA\t1",
            "-------------------------------- TOTAL GENES HIGHLY ASSOCIATED (POSITION 2) --------------------------------",
            "Gene\tTotal",
            "gyrB\t2",
            "dnaA\t1",
        ];
        assert_eq!(lines, expected);
    }
}
