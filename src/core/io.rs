//! Text I/O helpers
//!
//! Buffered readers with transparent gzip/bzip2 decompression, buffered
//! writers, and tab-separated field splitting.

use memchr::memchr_iter;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read};
use std::path::Path;

/// Default buffer size for BufReader/BufWriter (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Compression format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip compressed (.gz)
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

/// Detect compression format from file path and/or content
///
/// Extension wins; otherwise the gzip (1f 8b) and bzip2 ("BZh") magic bytes
/// are checked.
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    if extension == "gz" {
        return Ok(CompressionFormat::Gzip);
    }
    if extension == "bz2" {
        return Ok(CompressionFormat::Bzip2);
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;

    if bytes_read >= 2 && magic[0] == 0x1f && magic[1] == 0x8b {
        return Ok(CompressionFormat::Gzip);
    }
    if bytes_read >= 3 && magic[0] == 0x42 && magic[1] == 0x5a && magic[2] == 0x68 {
        return Ok(CompressionFormat::Bzip2);
    }

    Ok(CompressionFormat::Plain)
}

/// Open a text file for buffered reading, decompressing when needed
pub fn open_text_reader(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let format = detect_compression(path)?;
    let file = File::open(path)?;

    let reader: Box<dyn BufRead> = match format {
        CompressionFormat::Gzip => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            flate2::read::GzDecoder::new(file),
        )),
        CompressionFormat::Bzip2 => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            bzip2::read::BzDecoder::new(file),
        )),
        CompressionFormat::Plain => Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)),
    };
    Ok(reader)
}

/// Create a buffered writer for an output file
pub fn create_buf_writer(path: &Path) -> io::Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file))
}

/// Split a line on tab characters
///
/// Empty fields are kept, so `"\t\t\tkey\tvalue"` yields five fields.
pub fn split_fields(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut fields = Vec::with_capacity(8);
    let mut start = 0;

    for tab_pos in memchr_iter(b'\t', bytes) {
        // tabs are ASCII so these are always char boundaries
        fields.push(&line[start..tab_pos]);
        start = tab_pos + 1;
    }
    fields.push(&line[start..]);
    fields
}
