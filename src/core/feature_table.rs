//! Feature table parsing
//!
//! Parses the five-column GenBank feature table used for gene lookup.
//!
//! # Feature Table Format
//!
//! ```text
//! >Feature NC_000913.3
//! 337	2799	gene
//! 			gene	thrA
//! 337	2799	CDS
//! 			product	aspartate kinase / homoserine dehydrogenase
//! 			transl_table	11
//! 			protein_id	NP_414543.1
//! 			note	bifunctional
//! ```
//!
//! - A header line carries the range bounds (columns 0-1) and the feature kind (column 2)
//! - Qualifier lines leave columns 0-2 empty and carry key/value in columns 3-4
//! - Qualifiers belong to the closest preceding header; there is no explicit parent key
//!
//! The flat line sequence is grouped once into [`FeatureGroup`]s so lookups can
//! address qualifiers by offset within their feature instead of by raw line index.

use crate::core::error::{GeneLocatorError, RecordError, RecordResult, Result};
use crate::core::io::{open_text_reader, split_fields};
use log::{info, warn};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Minimum number of columns on any non-blank line (the two range bounds)
pub const MIN_FEATURE_FIELDS: usize = 2;

/// Inclusive coordinate range with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: u64,
    pub end: u64,
}

impl Range {
    /// Build a range, swapping reversed bounds
    pub fn new(a: u64, b: u64) -> Self {
        if a > b {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    /// Inclusive containment test
    pub fn contains(&self, position: u64) -> bool {
        self.start <= position && position <= self.end
    }
}

/// One non-blank line of the feature table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    /// Line number in the source file (1-based)
    pub line: usize,
    /// Range start, `None` when the column is empty
    pub start: Option<u64>,
    /// Range end, `None` when the column is empty
    pub end: Option<u64>,
    /// Feature kind (gene, CDS, ...); empty on qualifier lines
    pub feature_kind: String,
    /// Qualifier key (column 3), `None` if the column is absent
    pub qualifier_key: Option<String>,
    /// Qualifier value (column 4), `None` if the column is absent
    pub qualifier_value: Option<String>,
}

impl FeatureRecord {
    /// Parse a tab-separated feature table line
    pub fn parse(line: &str, line_number: usize) -> RecordResult<Self> {
        let fields = split_fields(line);

        if fields.len() < MIN_FEATURE_FIELDS {
            return Err(RecordError::too_few_fields(
                line_number,
                MIN_FEATURE_FIELDS,
                fields.len(),
            ));
        }

        let start = parse_bound(fields[0], "range start", line_number)?;
        let end = parse_bound(fields[1], "range end", line_number)?;

        Ok(Self {
            line: line_number,
            start,
            end,
            feature_kind: fields.get(2).copied().unwrap_or("").to_string(),
            qualifier_key: fields.get(3).map(|s| s.to_string()),
            qualifier_value: fields.get(4).map(|s| s.to_string()),
        })
    }

    /// Qualifier lines have no range and no feature kind
    pub fn is_qualifier(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.feature_kind.is_empty()
    }

    /// Normalized range; empty bounds count as position 0
    pub fn range(&self) -> Range {
        Range::new(self.start.unwrap_or(0), self.end.unwrap_or(0))
    }

    /// Qualifier key, required to be present
    pub fn key(&self) -> RecordResult<&str> {
        self.qualifier_key
            .as_deref()
            .ok_or_else(|| RecordError::too_few_fields(self.line, 4, 3))
    }

    /// Qualifier value, required to be present
    pub fn value(&self) -> RecordResult<&str> {
        self.qualifier_value.as_deref().ok_or_else(|| {
            let found = if self.qualifier_key.is_some() { 4 } else { 3 };
            RecordError::too_few_fields(self.line, 5, found)
        })
    }
}

/// Parse one range bound, stripping `<`/`>` partial markers
fn parse_bound(field: &str, name: &str, line_number: usize) -> RecordResult<Option<u64>> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let digits = trimmed.trim_start_matches(|c: char| c == '<' || c == '>');
    digits
        .parse::<u64>()
        .map(Some)
        .map_err(|_| RecordError::invalid_number(line_number, name, field))
}

/// A header record together with the qualifier lines that follow it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureGroup {
    pub header: FeatureRecord,
    pub qualifiers: Vec<FeatureRecord>,
}

impl FeatureGroup {
    pub fn new(header: FeatureRecord) -> Self {
        Self {
            header,
            qualifiers: Vec::new(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.header.feature_kind
    }

    pub fn range(&self) -> Range {
        self.header.range()
    }

    /// Line number of the last record in this group
    pub fn last_line(&self) -> usize {
        self.qualifiers
            .last()
            .map(|q| q.line)
            .unwrap_or(self.header.line)
    }

    /// Qualifier at a fixed offset after the header
    ///
    /// Fails with `TruncatedFeature` when the group has fewer qualifiers.
    pub fn qualifier(&self, offset: usize) -> RecordResult<&FeatureRecord> {
        self.qualifiers
            .get(offset)
            .ok_or_else(|| RecordError::TruncatedFeature {
                kind: self.header.feature_kind.clone(),
                header_line: self.header.line,
                offset: offset + 1,
                last_line: self.last_line(),
            })
    }
}

/// Parsed feature table: header groups in table order
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    groups: Vec<FeatureGroup>,
    line_count: usize,
}

impl FeatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[FeatureGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of lines read from the source, blank lines included
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Total number of qualifier records across all groups
    pub fn qualifier_count(&self) -> usize {
        self.groups.iter().map(|g| g.qualifiers.len()).sum()
    }
}

/// Parse a feature table from a reader
pub fn parse_feature_table_reader<R: BufRead>(reader: R) -> RecordResult<FeatureTable> {
    let mut table = FeatureTable::new();
    let mut orphans = 0usize;
    let mut line_number = 0usize;

    for line_result in reader.lines() {
        line_number += 1;
        let line = line_result?;

        if line.is_empty() || line.starts_with('>') {
            continue;
        }

        let record = FeatureRecord::parse(&line, line_number)?;

        if record.is_qualifier() {
            match table.groups.last_mut() {
                Some(group) => group.qualifiers.push(record),
                None => orphans += 1,
            }
        } else {
            table.groups.push(FeatureGroup::new(record));
        }
    }

    if orphans > 0 {
        warn!("Dropped {} qualifier lines with no preceding feature header", orphans);
    }

    table.line_count = line_number;
    Ok(table)
}

/// Parse a feature table file (plain, gzip or bzip2)
pub fn parse_feature_table_file(path: &Path) -> Result<FeatureTable> {
    let reader = open_text_reader(path).map_err(|e| GeneLocatorError::file(path, e))?;
    let table = parse_feature_table_reader(reader).map_err(|e| e.in_file(path))?;

    info!(
        "Feature table {}: {} lines, {} features, {} qualifiers",
        path.display(),
        table.line_count(),
        table.len(),
        table.qualifier_count()
    );
    Ok(table)
}

/// Parse a feature table from bytes (for testing)
pub fn parse_feature_table_bytes(data: &[u8]) -> RecordResult<FeatureTable> {
    parse_feature_table_reader(BufReader::new(data))
}
