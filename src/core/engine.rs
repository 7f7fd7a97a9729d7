//! Position annotation engine
//!
//! Resolves genomic coordinates to the gene/CDS annotation of the feature
//! table entries that contain them.
//!
//! Resolution walks the containing features in table order:
//! - `gene` sets gene type/name and the feature range, then keeps scanning
//! - `CDS` sets product, protein id and note, then stops (first CDS wins)
//! - any other kind is reported as a [`MissingEntry`] tagged with that kind
//!
//! A coordinate with no containing feature at all gets a `Missing` entry.
//!
//! Two search strategies produce identical results: a linear scan over the
//! table (O(U·L) for U coordinates and L features) and an interval index
//! built with rust-lapper (O(log L + k) per coordinate).

use crate::core::error::RecordResult;
use crate::core::feature_table::{FeatureGroup, FeatureTable};
use log::{debug, info};
use rust_lapper::{Interval, Lapper};
use std::collections::HashMap;
use std::fmt;

/// Feature kind carrying gene type and name
pub const GENE_KIND: &str = "gene";

/// Feature kind carrying product, protein id and note
pub const CDS_KIND: &str = "CDS";

/// Reason recorded for coordinates outside every feature
pub const MISSING_REASON: &str = "Missing";

/// Qualifier offset of the gene type/name line after a gene header
const GENE_NAME_OFFSET: usize = 0;
/// Qualifier offsets after a CDS header
const CDS_PRODUCT_OFFSET: usize = 0;
const CDS_PROTEIN_ID_OFFSET: usize = 2;
const CDS_NOTE_OFFSET: usize = 3;

/// Resolved metadata for one coordinate; all fields empty until filled
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub gene_type: String,
    pub gene_name: String,
    pub start_pos: Option<u64>,
    pub end_pos: Option<u64>,
    pub product: String,
    pub protein_id: String,
    pub note: String,
}

impl Annotation {
    /// True when no feature contributed to this annotation
    pub fn is_empty(&self) -> bool {
        *self == Annotation::default()
    }
}

/// A coordinate that could not be resolved to a gene/CDS annotation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MissingEntry {
    pub reason: String,
    pub position: String,
}

impl MissingEntry {
    pub fn new(reason: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            position: position.into(),
        }
    }

    /// Entry for a coordinate outside every feature
    pub fn missing(position: impl Into<String>) -> Self {
        Self::new(MISSING_REASON, position)
    }
}

impl fmt::Display for MissingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.reason, self.position)
    }
}

/// A coordinate to annotate: its original text (the lookup key) and value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetPosition {
    pub text: String,
    pub value: u64,
}

impl TargetPosition {
    pub fn new(text: impl Into<String>, value: u64) -> Self {
        Self {
            text: text.into(),
            value,
        }
    }
}

/// Outcome of resolving a single coordinate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub annotation: Annotation,
    /// Kinds of other containing features, in table order
    pub other_kinds: Vec<String>,
    /// Whether any feature contained the coordinate
    pub found: bool,
}

/// Search strategy used to find containing features
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Scan every feature in table order
    #[default]
    Linear,
    /// Query an interval index, then restore table order
    Interval,
}

enum SearchIndex {
    Linear,
    Interval(Lapper<u64, usize>),
}

/// Annotation engine over a parsed feature table
pub struct AnnotationEngine {
    table: FeatureTable,
    index: SearchIndex,
}

impl AnnotationEngine {
    /// Create an engine using the given search strategy
    pub fn new(table: FeatureTable, strategy: SearchStrategy) -> Self {
        let index = match strategy {
            SearchStrategy::Linear => SearchIndex::Linear,
            SearchStrategy::Interval => SearchIndex::Interval(build_lapper(&table)),
        };
        Self { table, index }
    }

    /// Create an engine with the default linear scan
    pub fn linear(table: FeatureTable) -> Self {
        Self::new(table, SearchStrategy::Linear)
    }

    pub fn strategy(&self) -> SearchStrategy {
        match self.index {
            SearchIndex::Linear => SearchStrategy::Linear,
            SearchIndex::Interval(_) => SearchStrategy::Interval,
        }
    }

    pub fn table(&self) -> &FeatureTable {
        &self.table
    }

    /// Indices of features containing `position`, in table order
    pub fn containing(&self, position: u64) -> Vec<usize> {
        match &self.index {
            SearchIndex::Interval(lapper) if position < u64::MAX => {
                let mut hits: Vec<usize> = lapper
                    .find(position, position + 1)
                    .map(|iv| iv.val)
                    .collect();
                hits.sort_unstable();
                hits
            }
            // Exclusive Lapper stops cannot reach u64::MAX
            _ => self
                .table
                .groups()
                .iter()
                .enumerate()
                .filter(|(_, group)| group.range().contains(position))
                .map(|(idx, _)| idx)
                .collect(),
        }
    }

    /// Resolve one coordinate
    pub fn resolve(&self, position: u64) -> RecordResult<Resolution> {
        let mut resolution = Resolution::default();

        match &self.index {
            SearchIndex::Linear => {
                // Lazy scan so a CDS match ends the walk early
                let hits = self
                    .table
                    .groups()
                    .iter()
                    .filter(|group| group.range().contains(position));
                apply_features(&mut resolution, hits)?;
            }
            SearchIndex::Interval(_) => {
                let groups = self.table.groups();
                let hits = self.containing(position).into_iter().map(|idx| &groups[idx]);
                apply_features(&mut resolution, hits)?;
            }
        }

        Ok(resolution)
    }

    /// Resolve every target coordinate
    ///
    /// Each distinct coordinate text gets exactly one annotation entry.
    pub fn annotate_all(&self, positions: &[TargetPosition]) -> RecordResult<AnnotationSet> {
        let mut set = AnnotationSet::with_capacity(positions.len());

        for target in positions {
            if set.annotations.contains_key(&target.text) {
                continue;
            }

            let resolution = self.resolve(target.value)?;
            for kind in resolution.other_kinds {
                set.missing.push(MissingEntry::new(kind, target.text.as_str()));
            }
            if !resolution.found && !set.has_missing(&target.text) {
                set.missing.push(MissingEntry::missing(target.text.as_str()));
            }

            debug!(
                "Position {}: gene='{}' product='{}'",
                target.text, resolution.annotation.gene_name, resolution.annotation.product
            );
            set.annotations
                .insert(target.text.clone(), resolution.annotation);
        }

        info!(
            "Annotated {} positions against {} features ({} missing entries)",
            set.len(),
            self.table.len(),
            set.missing.len()
        );
        Ok(set)
    }
}

/// Fold containing features, in table order, into a resolution
fn apply_features<'a, I>(resolution: &mut Resolution, hits: I) -> RecordResult<()>
where
    I: Iterator<Item = &'a FeatureGroup>,
{
    for group in hits {
        resolution.found = true;
        let annotation = &mut resolution.annotation;

        match group.kind() {
            GENE_KIND => {
                let name = group.qualifier(GENE_NAME_OFFSET)?;
                annotation.gene_type = name.key()?.to_string();
                annotation.gene_name = name.value()?.to_string();

                let range = group.range();
                annotation.start_pos = Some(range.start);
                annotation.end_pos = Some(range.end);
            }
            CDS_KIND => {
                annotation.product = group.qualifier(CDS_PRODUCT_OFFSET)?.value()?.to_string();
                annotation.protein_id = group.qualifier(CDS_PROTEIN_ID_OFFSET)?.value()?.to_string();
                annotation.note = group.qualifier(CDS_NOTE_OFFSET)?.value()?.to_string();
                break;
            }
            other => resolution.other_kinds.push(other.to_string()),
        }
    }
    Ok(())
}

/// Build an interval index over feature header ranges
///
/// Ranges are inclusive, Lapper intervals are half-open, so `stop = end + 1`.
fn build_lapper(table: &FeatureTable) -> Lapper<u64, usize> {
    let intervals: Vec<Interval<u64, usize>> = table
        .groups()
        .iter()
        .enumerate()
        .map(|(idx, group)| {
            let range = group.range();
            Interval {
                start: range.start,
                stop: range.end.saturating_add(1),
                val: idx,
            }
        })
        .collect();
    Lapper::new(intervals)
}

/// Resolved annotations keyed by coordinate text, plus the missing list
#[derive(Debug, Clone, Default)]
pub struct AnnotationSet {
    pub annotations: HashMap<String, Annotation>,
    pub missing: Vec<MissingEntry>,
}

impl AnnotationSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            annotations: HashMap::with_capacity(capacity),
            missing: Vec::new(),
        }
    }

    pub fn get(&self, position: &str) -> Option<&Annotation> {
        self.annotations.get(position)
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Number of coordinates that received any annotation field
    pub fn resolved_count(&self) -> usize {
        self.annotations.values().filter(|a| !a.is_empty()).count()
    }

    /// Whether the missing list already names this coordinate
    pub fn has_missing(&self, position: &str) -> bool {
        self.missing.iter().any(|m| m.position == position)
    }

    /// Missing entries sorted by their `reason\tposition` text
    pub fn sorted_missing(&self) -> Vec<&MissingEntry> {
        let mut entries: Vec<(String, &MissingEntry)> =
            self.missing.iter().map(|m| (m.to_string(), m)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.into_iter().map(|(_, m)| m).collect()
    }
}
