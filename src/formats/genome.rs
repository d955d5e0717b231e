//! Assembly metadata files
//!
//! - `chrom.sizes`: two columns, chromosome and length, no header
//! - centromeres: `(chrom, mid)` or `(chrom, start, end, ...)`, optionally
//!   headed; a header naming `mid` makes that column explicit
//!
//! Lines starting with `#` are ignored in both.

use crate::core::arms::ChromosomeSizes;
use crate::core::GenomeError;
use crate::core::io::{open_text, split_fields, LineIterator};
use indexmap::IndexMap;
use std::path::Path;

/// Whether a name is an assembled primary chromosome:
/// `chr<digits>`, `chrX`, `chrY` or `chrM`
pub fn is_primary_chrom(name: &str) -> bool {
    match name.strip_prefix("chr") {
        Some("X") | Some("Y") | Some("M") => true,
        Some(rest) => !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Read a chrom.sizes file, preserving file order
pub fn read_chrom_sizes(path: &Path, primary_only: bool) -> Result<ChromosomeSizes, GenomeError> {
    if !path.exists() {
        return Err(GenomeError::FileNotFound(path.to_path_buf()));
    }
    let mut lines = LineIterator::new(open_text(path)?);
    let mut sizes = ChromosomeSizes::new();

    while let Some(line) = lines.next_line() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let fields = split_fields(line);
        if fields.len() < 2 {
            let message = format!("expected chrom and length, got '{}'", line);
            return Err(invalid(path, lines.line_number(), message));
        }
        let chrom = fields[0].to_string();
        let length: u64 = match fields[1].trim().parse() {
            Ok(length) => length,
            Err(_) => {
                let message = format!("invalid length '{}'", fields[1]);
                return Err(invalid(path, lines.line_number(), message));
            }
        };
        if primary_only && !is_primary_chrom(&chrom) {
            continue;
        }
        sizes.insert(chrom, length);
    }

    Ok(sizes)
}

/// Read centromere midpoints as `(chrom, mid)` pairs.
///
/// Two-column rows are explicit midpoints, returned as written with repeats
/// included. Wider rows are `(chrom, start, end, ...)` blocks merged per
/// chromosome to the outermost span and reduced to its midpoint, unless a
/// header names a `mid` column, whose values are then taken as explicit.
pub fn read_centromeres(path: &Path) -> Result<Vec<(String, u64)>, GenomeError> {
    if !path.exists() {
        return Err(GenomeError::FileNotFound(path.to_path_buf()));
    }
    let mut lines = LineIterator::new(open_text(path)?);
    let mut explicit = Vec::new();
    let mut spans: IndexMap<String, (u64, u64)> = IndexMap::new();
    let mut first = true;
    let mut mid_idx: Option<usize> = None;

    while let Some(line) = lines.next_line() {
        let line = line?.to_string();
        let line_number = lines.line_number();
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let fields = split_fields(&line);
        if fields.len() < 2 {
            let message = format!("expected at least two columns, got '{}'", line);
            return Err(invalid(path, line_number, message));
        }
        let second: Option<u64> = fields[1].trim().parse().ok();
        if first && second.is_none() {
            // header
            first = false;
            mid_idx = fields.iter().skip(1).position(|f| f.trim() == "mid").map(|i| i + 1);
            continue;
        }
        first = false;

        let chrom = fields[0].to_string();
        let number = |idx: usize| -> Result<u64, GenomeError> {
            fields[idx].trim().parse().map_err(|_| {
                invalid(path, line_number, format!("invalid integer '{}'", fields[idx]))
            })
        };

        if fields.len() == 2 {
            explicit.push((chrom, number(1)?));
            continue;
        }
        if let Some(idx) = mid_idx.filter(|&i| i < fields.len()) {
            explicit.push((chrom, number(idx)?));
            continue;
        }

        let start = number(1)?;
        let end = number(2)?;
        let span = spans.entry(chrom).or_insert((start, end));
        span.0 = span.0.min(start);
        span.1 = span.1.max(end);
    }

    explicit.extend(
        spans
            .into_iter()
            .map(|(chrom, (start, end))| (chrom, (start + end) / 2)),
    );
    Ok(explicit)
}

fn invalid(path: &Path, line: usize, message: String) -> GenomeError {
    GenomeError::InvalidLine {
        path: path.to_path_buf(),
        line,
        message,
    }
}
