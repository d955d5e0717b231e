//! Insulation tables and boundary output
//!
//! An insulation table has one row per genomic bin per view region, with at
//! least `chrom`, `start`, `end` and one `is_boundary_<window>` column per
//! scored window. All other columns are kept as raw text.

use crate::core::{TableError, TableResult};
use crate::core::interval::{GenomicInterval, Located};
use crate::core::table::{parse_bool, parse_u64, Table};
use std::io::{BufRead, Write};
use std::path::Path;

/// Name of the added CTCF support column
pub const HAS_CTCF_COLUMN: &str = "has_ctcf";

/// Boundary flag column for a window size in base pairs
pub fn boundary_column(window: u64) -> String {
    format!("is_boundary_{}", window)
}

/// One bin of an insulation table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsulationRow {
    pub interval: GenomicInterval,
    /// Raw cells aligned with `InsulationTable::columns`
    pub values: Vec<String>,
}

impl Located for InsulationRow {
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

/// Per-bin insulation scores as produced by the scorer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsulationTable {
    columns: Vec<String>,
    rows: Vec<InsulationRow>,
}

impl InsulationTable {
    /// Parse bins from a generic table
    pub fn from_table(table: Table) -> TableResult<Self> {
        let chrom_idx = table.require_column("chrom")?;
        let start_idx = table.require_column("start")?;
        let end_idx = table.require_column("end")?;

        let mut rows = Vec::with_capacity(table.rows.len());
        for (i, values) in table.rows.into_iter().enumerate() {
            let line = i + 2;
            if values.len() != table.columns.len() {
                return Err(TableError::RaggedRow {
                    line,
                    expected: table.columns.len(),
                    found: values.len(),
                });
            }
            let start = parse_u64(&values[start_idx], "start", line)?;
            let end = parse_u64(&values[end_idx], "end", line)?;
            if start > end {
                return Err(TableError::InvalidNumber {
                    line,
                    column: "end".to_string(),
                    value: values[end_idx].clone(),
                });
            }
            rows.push(InsulationRow {
                interval: GenomicInterval {
                    chrom: values[chrom_idx].clone(),
                    start,
                    end,
                },
                values,
            });
        }

        Ok(Self {
            columns: table.columns,
            rows,
        })
    }

    pub fn read<R: BufRead>(reader: R) -> TableResult<Self> {
        Self::from_table(Table::read(reader)?)
    }

    pub fn read_path<P: AsRef<Path>>(path: P) -> TableResult<Self> {
        Self::from_table(Table::read_path(path)?)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[InsulationRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parsed `is_boundary_<window>` flags, one per row
    pub fn boundary_flags(&self, window: u64) -> TableResult<Vec<bool>> {
        let column = boundary_column(window);
        let idx = self
            .columns
            .iter()
            .position(|c| *c == column)
            .ok_or_else(|| TableError::MissingColumn(column.clone()))?;
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| parse_bool(&row.values[idx], &column, i + 2))
            .collect()
    }
}

/// An insulation bin with its CTCF support and boundary call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryRecord {
    pub row: InsulationRow,
    pub is_boundary: bool,
    pub has_ctcf: bool,
}

impl BoundaryRecord {
    /// Called boundary with CTCF support
    #[inline]
    pub fn is_ctcf_boundary(&self) -> bool {
        self.is_boundary && self.has_ctcf
    }
}

/// Render records as a table: insulation columns plus `has_ctcf`
pub fn boundary_table(columns: &[String], records: &[BoundaryRecord]) -> TableResult<Table> {
    let mut table = Table::new(columns.to_vec());
    table.rows = records.iter().map(|r| r.row.values.clone()).collect();
    let has_ctcf: Vec<bool> = records.iter().map(|r| r.has_ctcf).collect();
    table.push_bool_column(HAS_CTCF_COLUMN, &has_ctcf)?;
    Ok(table)
}

/// Write records as a headed tab-delimited table, no index column
pub fn write_boundaries<W: Write>(
    columns: &[String],
    records: &[BoundaryRecord],
    writer: W,
) -> TableResult<()> {
    boundary_table(columns, records)?.write(writer)
}
