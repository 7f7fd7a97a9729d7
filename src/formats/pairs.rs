//! Position-pair loader
//!
//! Reads tab-separated pair records: position 1, position 2, distance,
//! label, association score. Pairs scoring below the threshold are dropped;
//! the rest keep their input order and contribute their two coordinates to
//! the set of positions to annotate.

use crate::core::io::{open_text_reader, split_fields};
use crate::core::{GeneLocatorError, RecordError, RecordResult, Result, TargetPosition};
use log::info;
use std::collections::HashSet;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Number of fields on every pair line
pub const PAIR_FIELDS: usize = 5;

/// One accepted pair record
#[derive(Debug, Clone, PartialEq)]
pub struct PositionPair {
    pub pos_1: TargetPosition,
    pub pos_2: TargetPosition,
    /// Opaque distance column, written back verbatim
    pub distance: String,
    /// Opaque label column, written back verbatim
    pub label: String,
    /// Parsed association score
    pub score: f64,
    /// Score as it appeared in the input
    pub score_text: String,
}

impl PositionPair {
    /// Parse a pair line; exactly five tab-separated fields are required
    pub fn parse(line: &str, line_number: usize) -> RecordResult<Self> {
        let fields = split_fields(line);

        if fields.len() != PAIR_FIELDS {
            return Err(RecordError::malformed(
                line_number,
                format!("expected {} fields, found {}", PAIR_FIELDS, fields.len()),
            ));
        }

        let score = fields[4]
            .trim()
            .parse::<f64>()
            .map_err(|_| RecordError::invalid_number(line_number, "score", fields[4]))?;

        Ok(Self {
            pos_1: parse_position(fields[0], "position_1", line_number)?,
            pos_2: parse_position(fields[1], "position_2", line_number)?,
            distance: fields[2].to_string(),
            label: fields[3].to_string(),
            score,
            score_text: fields[4].to_string(),
        })
    }
}

fn parse_position(field: &str, name: &str, line_number: usize) -> RecordResult<TargetPosition> {
    let value = field
        .trim()
        .parse::<u64>()
        .map_err(|_| RecordError::invalid_number(line_number, name, field))?;
    Ok(TargetPosition::new(field, value))
}

/// Accepted pairs and the deduplicated coordinates they reference
#[derive(Debug, Clone, Default)]
pub struct PairSet {
    /// Pairs with `score >= threshold`, in input order
    pub pairs: Vec<PositionPair>,
    /// Unique coordinates in order of first appearance
    pub positions: Vec<TargetPosition>,
    /// Number of non-empty records read
    pub total: usize,
    /// Number of records dropped by the threshold
    pub filtered: usize,
}

impl PairSet {
    fn push(&mut self, pair: PositionPair, seen: &mut HashSet<String>) {
        for target in [&pair.pos_1, &pair.pos_2] {
            if seen.insert(target.text.clone()) {
                self.positions.push(target.clone());
            }
        }
        self.pairs.push(pair);
    }
}

/// Load pairs from a reader, keeping those with `score >= threshold`
pub fn load_pairs_reader<R: BufRead>(reader: R, threshold: f64) -> RecordResult<PairSet> {
    let mut set = PairSet::default();
    let mut seen = HashSet::new();

    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.is_empty() {
            continue;
        }

        let pair = PositionPair::parse(&line, idx + 1)?;
        set.total += 1;

        if pair.score >= threshold {
            set.push(pair, &mut seen);
        } else {
            set.filtered += 1;
        }
    }

    Ok(set)
}

/// Load a pairs file (plain, gzip or bzip2)
pub fn load_pairs_file(path: &Path, threshold: f64) -> Result<PairSet> {
    let reader = open_text_reader(path).map_err(|e| GeneLocatorError::file(path, e))?;
    let set = load_pairs_reader(reader, threshold).map_err(|e| e.in_file(path))?;

    info!(
        "Pairs file {}: {} records, {} kept (threshold {}), {} unique positions",
        path.display(),
        set.total,
        set.pairs.len(),
        threshold,
        set.positions.len()
    );
    Ok(set)
}

/// Load pairs from bytes (for testing)
pub fn load_pairs_bytes(data: &[u8], threshold: f64) -> RecordResult<PairSet> {
    load_pairs_reader(BufReader::new(data), threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        let pair = PositionPair::parse("1000\t5000\t4000\tHighAssoc\t1.5", 1).unwrap();
        assert_eq!(pair.pos_1, TargetPosition::new("1000", 1000));
        assert_eq!(pair.pos_2, TargetPosition::new("5000", 5000));
        assert_eq!(pair.distance, "4000");
        assert_eq!(pair.label, "HighAssoc");
        assert_eq!(pair.score, 1.5);
        assert_eq!(pair.score_text, "1.5");
    }

    #[test]
    fn test_threshold_filtering() {
        let line = b"1000\t5000\t4000\tHighAssoc\t1.5\n";
        assert_eq!(load_pairs_bytes(line, 1.0).unwrap().pairs.len(), 1);
        assert_eq!(load_pairs_bytes(line, 1.5).unwrap().pairs.len(), 1);

        let dropped = load_pairs_bytes(line, 2.0).unwrap();
        assert!(dropped.pairs.is_empty());
        assert!(dropped.positions.is_empty());
        assert_eq!(dropped.filtered, 1);
    }

    #[test]
    fn test_unique_positions_first_appearance() {
        let data = b"10\t20\t10\ta\t1\n\n20\t30\t10\tb\t2\n10\t10\t0\tc\t3\n40\t50\t10\td\t-1\n";
        let set = load_pairs_bytes(data, 0.0).unwrap();

        assert_eq!(set.total, 4);
        assert_eq!(set.pairs.len(), 3);
        let texts: Vec<&str> = set.positions.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["10", "20", "30"]);
    }

    #[test]
    fn test_wrong_field_count() {
        let err = load_pairs_bytes(b"10\t20\t10\ta\n", 0.0).unwrap_err();
        assert!(matches!(err, RecordError::MalformedRecord { line: 1, .. }));

        let err = load_pairs_bytes(b"10\t20\t10\ta\t1\t9\n", 0.0).unwrap_err();
        assert!(matches!(err, RecordError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_non_numeric_score() {
        let data = b"10\t20\t10\ta\t1\n10\t20\t10\ta\thigh\n";
        let err = load_pairs_bytes(data, 0.0).unwrap_err();
        assert!(matches!(err, RecordError::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_non_integer_position() {
        let err = load_pairs_bytes(b"10.5\t20\t10\ta\t1\n", 0.0).unwrap_err();
        assert!(matches!(err, RecordError::MalformedRecord { line: 1, .. }));
    }
}
