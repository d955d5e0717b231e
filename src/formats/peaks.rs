//! CTCF peak files
//!
//! Tab-delimited with a header naming at least `chrom`, `start` and `end`.
//! Other columns are carried along untouched; `mid` is (re)computed.

use crate::core::{PeakFormatError, TableError};
use crate::core::interval::{GenomicInterval, Located};
use crate::core::table::Table;
use std::collections::HashSet;
use std::path::Path;

/// Columns every peak file must carry
pub const REQUIRED_COLUMNS: [&str; 3] = ["chrom", "start", "end"];

/// A single peak with its raw cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peak {
    pub interval: GenomicInterval,
    /// `(start + end) / 2`
    pub mid: u64,
    /// Raw cells aligned with `PeakSet::columns`, including `mid`
    pub fields: Vec<String>,
}

impl Located for Peak {
    fn chrom(&self) -> &str {
        &self.interval.chrom
    }

    fn start(&self) -> u64 {
        self.interval.start
    }

    fn end(&self) -> u64 {
        self.interval.end
    }
}

/// Peaks plus their header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeakSet {
    pub columns: Vec<String>,
    pub peaks: Vec<Peak>,
}

impl PeakSet {
    /// Load peaks from a (possibly compressed) file
    pub fn read_path<P: AsRef<Path>>(path: P) -> Result<Self, PeakFormatError> {
        let path = path.as_ref();
        let table = Table::read_path(path).map_err(|e| match e {
            TableError::MissingHeader => PeakFormatError::Empty(path.to_path_buf()),
            other => table_error(other),
        })?;
        Self::from_table(table)
    }

    /// Validate the header and parse coordinates
    pub fn from_table(table: Table) -> Result<Self, PeakFormatError> {
        let idx = table
            .locate_columns(&REQUIRED_COLUMNS)
            .map_err(|_| PeakFormatError::MissingColumns {
                required: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
                found: table.columns.clone(),
            })?;
        let (chrom_idx, start_idx, end_idx) = (idx[0], idx[1], idx[2]);

        let mut columns = table.columns;
        let mid_idx = match columns.iter().position(|c| c == "mid") {
            Some(i) => i,
            None => {
                columns.push("mid".to_string());
                columns.len() - 1
            }
        };

        let mut peaks = Vec::with_capacity(table.rows.len());
        for (i, mut fields) in table.rows.into_iter().enumerate() {
            // header is line 1
            let line = i + 2;
            let start = parse_coord(cell(&fields, start_idx), "start", line)?;
            let end = parse_coord(cell(&fields, end_idx), "end", line)?;
            let interval = GenomicInterval::new(cell(&fields, chrom_idx), start, end).map_err(|e| {
                PeakFormatError::InvalidRow {
                    line,
                    message: e.to_string(),
                }
            })?;
            let mid = (start + end) / 2;
            match fields.get_mut(mid_idx) {
                Some(cell) => *cell = mid.to_string(),
                None => fields.push(mid.to_string()),
            }
            peaks.push(Peak {
                interval,
                mid,
                fields,
            });
        }

        Ok(Self { columns, peaks })
    }

    /// Keep only peaks on the given chromosomes
    pub fn restrict_to(self, chromnames: &[String]) -> Self {
        let keep: HashSet<&str> = chromnames.iter().map(String::as_str).collect();
        let before = self.peaks.len();
        let peaks: Vec<Peak> = self
            .peaks
            .into_iter()
            .filter(|p| keep.contains(p.interval.chrom.as_str()))
            .collect();
        if peaks.len() < before {
            log::debug!(
                "dropped {} peaks on chromosomes absent from the matrix",
                before - peaks.len()
            );
        }
        Self {
            columns: self.columns,
            peaks,
        }
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }
}

#[inline]
fn cell(fields: &[String], idx: usize) -> &str {
    fields.get(idx).map(String::as_str).unwrap_or("")
}

fn parse_coord(value: &str, column: &str, line: usize) -> Result<u64, PeakFormatError> {
    value.trim().parse().map_err(|_| PeakFormatError::InvalidRow {
        line,
        message: format!("invalid integer '{}' in column '{}'", value, column),
    })
}

fn table_error(err: TableError) -> PeakFormatError {
    match err {
        TableError::Io(e) => PeakFormatError::Io(e),
        TableError::RaggedRow {
            line,
            expected,
            found,
        } => PeakFormatError::InvalidRow {
            line,
            message: format!("expected {} fields, found {}", expected, found),
        },
        other => PeakFormatError::InvalidRow {
            line: 0,
            message: other.to_string(),
        },
    }
}
