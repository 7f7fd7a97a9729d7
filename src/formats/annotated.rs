//! Annotated pair table and missing-positions report
//!
//! Joins each accepted pair back to the annotations of its two coordinates.
//! Rows are rendered in full before any file is created, so an inconsistent
//! join never leaves a partial table behind.

use crate::core::io::create_buf_writer;
use crate::core::{Annotation, AnnotationError, AnnotationSet, GeneLocatorError, Result};
use crate::formats::pairs::PositionPair;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

/// Column names of the annotated table
pub const ANNOTATED_HEADER: [&str; 19] = [
    "position_1",
    "start_pos_1",
    "end_pos_1",
    "gene_type_1",
    "gene_name_1",
    "product_1",
    "protein_id_1",
    "note_1",
    "position_2",
    "start_pos_2",
    "end_pos_2",
    "gene_type_2",
    "gene_name_2",
    "product_2",
    "protein_id_2",
    "note_2",
    "distance",
    "label",
    "score",
];

/// Title line of the missing-positions report
pub const MISSING_TITLE: &str =
    "-------------------------------- MISSING POSITIONS --------------------------------";

/// Suffix appended to the output file name for the missing report
pub const MISSING_SUFFIX: &str = "_missing_pos.txt";

fn push_annotation(row: &mut String, position: &str, annotation: &Annotation) {
    let start = annotation.start_pos.map(|p| p.to_string()).unwrap_or_default();
    let end = annotation.end_pos.map(|p| p.to_string()).unwrap_or_default();
    // Writing to a String cannot fail
    let _ = write!(
        row,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t",
        position,
        start,
        end,
        annotation.gene_type,
        annotation.gene_name,
        annotation.product,
        annotation.protein_id,
        annotation.note
    );
}

/// Render one output row per pair
pub fn render_rows(
    pairs: &[PositionPair],
    annotations: &AnnotationSet,
) -> std::result::Result<Vec<String>, AnnotationError> {
    pairs
        .iter()
        .map(|pair| {
            let mut row = String::with_capacity(256);
            for target in [&pair.pos_1, &pair.pos_2] {
                let annotation = annotations
                    .get(&target.text)
                    .ok_or_else(|| AnnotationError::MissingAnnotation(target.text.clone()))?;
                push_annotation(&mut row, &target.text, annotation);
            }
            row.push_str(&pair.distance);
            row.push('\t');
            row.push_str(&pair.label);
            row.push('\t');
            row.push_str(&pair.score_text);
            Ok(row)
        })
        .collect()
}

/// Write the annotated table (header plus one row per pair)
///
/// Returns the number of data rows written.
pub fn write_annotated_table<W: Write>(
    writer: &mut W,
    pairs: &[PositionPair],
    annotations: &AnnotationSet,
) -> Result<usize> {
    let rows = render_rows(pairs, annotations)?;
    write_rows(writer, &rows)?;
    Ok(rows.len())
}

fn write_rows<W: Write>(writer: &mut W, rows: &[String]) -> std::io::Result<()> {
    writeln!(writer, "{}", ANNOTATED_HEADER.join("\t"))?;
    for row in rows {
        writeln!(writer, "{}", row)?;
    }
    Ok(())
}

/// Write the missing-positions report: title, count, sorted entries
pub fn write_missing_report<W: Write>(writer: &mut W, annotations: &AnnotationSet) -> Result<usize> {
    let entries = annotations.sorted_missing();

    writeln!(writer, "{}", MISSING_TITLE)?;
    writeln!(writer, "Missing positions: {}", entries.len())?;
    for entry in &entries {
        writeln!(writer, "{}", entry)?;
    }
    Ok(entries.len())
}

/// Write the annotated table to a file
pub fn write_annotated_file(
    path: &Path,
    pairs: &[PositionPair],
    annotations: &AnnotationSet,
) -> Result<usize> {
    // Fail on a broken join before the file exists
    let rows = render_rows(pairs, annotations)?;

    let mut writer = create_buf_writer(path).map_err(|e| GeneLocatorError::file(path, e))?;
    write_rows(&mut writer, &rows)?;
    writer.flush()?;
    Ok(rows.len())
}

/// Write the missing-positions report to a file
pub fn write_missing_file(path: &Path, annotations: &AnnotationSet) -> Result<usize> {
    let mut writer = create_buf_writer(path).map_err(|e| GeneLocatorError::file(path, e))?;
    let count = write_missing_report(&mut writer, annotations)?;
    writer.flush()?;
    Ok(count)
}
