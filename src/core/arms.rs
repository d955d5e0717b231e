//! Chromosome arm splitting
//!
//! Partitions each chromosome into at most two arms (p and q) by
//! subtracting its centromere midpoint from the full chromosome interval.

use crate::core::error::{InputResult, InvalidInputError};
use crate::core::interval::{subtract, GenomicInterval, Located};
use crate::core::table::Table;
use indexmap::IndexMap;
use std::io::Write;

/// Chromosome name -> length, in assembly order
pub type ChromosomeSizes = IndexMap<String, u64>;

/// Chromosome name -> centromere midpoint
pub type Midpoints = IndexMap<String, u64>;

/// Accepted shapes for chromosome sizes
#[derive(Debug, Clone)]
pub enum ChromSizesInput {
    /// chrom -> length, start implied 0
    Mapping(ChromosomeSizes),
    /// A table with either `(chrom, length)` or `(chrom, start, end)` columns
    Table { table: Table, columns: Vec<String> },
}

/// Accepted shapes for centromere midpoints
#[derive(Debug, Clone)]
pub enum MidpointsInput {
    /// chrom -> midpoint
    Mapping(Midpoints),
    /// A table with `(chrom, mid)` columns. Rows may repeat a chromosome.
    Table {
        table: Table,
        columns: (String, String),
    },
}

impl From<ChromosomeSizes> for ChromSizesInput {
    fn from(sizes: ChromosomeSizes) -> Self {
        ChromSizesInput::Mapping(sizes)
    }
}

impl From<Midpoints> for MidpointsInput {
    fn from(mids: Midpoints) -> Self {
        MidpointsInput::Mapping(mids)
    }
}

impl ChromSizesInput {
    /// `(chrom, length)` table
    pub fn lengths(table: Table, chrom: &str, length: &str) -> Self {
        ChromSizesInput::Table {
            table,
            columns: vec![chrom.to_string(), length.to_string()],
        }
    }

    /// `(chrom, start, end)` table; every start must be 0
    pub fn bed(table: Table, chrom: &str, start: &str, end: &str) -> Self {
        ChromSizesInput::Table {
            table,
            columns: vec![chrom.to_string(), start.to_string(), end.to_string()],
        }
    }
}

impl MidpointsInput {
    pub fn table(table: Table, chrom: &str, mid: &str) -> Self {
        MidpointsInput::Table {
            table,
            columns: (chrom.to_string(), mid.to_string()),
        }
    }
}

/// A named chromosome arm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arm {
    pub interval: GenomicInterval,
    pub name: String,
}

impl Located for Arm {
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

/// Write arms as headerless BED4 (chrom, start, end, name)
pub fn write_bed4<W: Write>(arms: &[Arm], mut writer: W) -> std::io::Result<()> {
    for arm in arms {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            arm.interval.chrom, arm.interval.start, arm.interval.end, arm.name
        )?;
    }
    writer.flush()
}

/// Splits chromosomes into p/q arms around their midpoints
#[derive(Debug, Clone)]
pub struct ArmSplitter {
    suffixes: [String; 2],
}

impl Default for ArmSplitter {
    fn default() -> Self {
        Self::with_suffixes("_p", "_q")
    }
}

impl ArmSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom suffixes for the lower and upper arm
    pub fn with_suffixes(lower: &str, upper: &str) -> Self {
        Self {
            suffixes: [lower.to_string(), upper.to_string()],
        }
    }

    /// Split every chromosome around its midpoint
    ///
    /// Output keeps the chromosome order of `chrom_sizes`, with the pieces of
    /// each chromosome grouped and the lower arm first. A chromosome without
    /// a midpoint yields a single lower arm.
    pub fn split(
        &self,
        chrom_sizes: ChromSizesInput,
        midpoints: MidpointsInput,
    ) -> InputResult<Vec<Arm>> {
        let (chroms, mids) = normalize(chrom_sizes, midpoints)?;

        let mut mids_by_chrom: IndexMap<&str, Vec<GenomicInterval>> = IndexMap::new();
        for mid in &mids {
            mids_by_chrom.entry(mid.chrom.as_str()).or_default().push(mid.clone());
        }

        let mut arms = Vec::with_capacity(chroms.len() * 2);
        for chrom in &chroms {
            let cuts = mids_by_chrom
                .get(chrom.chrom.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let pieces = subtract(chrom, cuts);
            if pieces.len() > self.suffixes.len() {
                return Err(InvalidInputError::TooManyArms {
                    chrom: chrom.chrom.clone(),
                    pieces: pieces.len(),
                });
            }
            for (piece, suffix) in pieces.into_iter().zip(&self.suffixes) {
                let name = format!("{}{}", piece.chrom, suffix);
                arms.push(Arm {
                    interval: piece,
                    name,
                });
            }
        }

        log::debug!("split {} chromosomes into {} arms", chroms.len(), arms.len());
        Ok(arms)
    }
}

/// Normalize both inputs to interval lists: full chromosomes and
/// zero-length midpoints.
fn normalize(
    chrom_sizes: ChromSizesInput,
    midpoints: MidpointsInput,
) -> InputResult<(Vec<GenomicInterval>, Vec<GenomicInterval>)> {
    let chroms = match chrom_sizes {
        ChromSizesInput::Mapping(sizes) => sizes
            .into_iter()
            .map(|(chrom, length)| GenomicInterval::new(chrom, 0, length))
            .collect::<InputResult<Vec<_>>>()?,
        ChromSizesInput::Table { table, columns } => match columns.len() {
            2 => {
                let idx = locate(&table, &columns, "chromsizes")?;
                table
                    .rows
                    .iter()
                    .map(|row| {
                        let length = cell_u64(row, idx[1], &columns[1], "chromsizes")?;
                        GenomicInterval::new(cell(row, idx[0]), 0, length)
                    })
                    .collect::<InputResult<Vec<_>>>()?
            }
            3 => {
                let mut unique = columns.clone();
                unique.sort();
                unique.dedup();
                if unique.len() != columns.len() {
                    return Err(InvalidInputError::DuplicateColumns {
                        what: "chromsizes",
                        columns,
                    });
                }
                let idx = locate(&table, &columns, "chromsizes")?;
                let mut chroms = Vec::with_capacity(table.len());
                for row in &table.rows {
                    let chrom = cell(row, idx[0]);
                    let start = cell_u64(row, idx[1], &columns[1], "chromsizes")?;
                    let end = cell_u64(row, idx[2], &columns[2], "chromsizes")?;
                    if start != 0 {
                        return Err(InvalidInputError::NonZeroStart {
                            chrom: chrom.to_string(),
                            start,
                        });
                    }
                    chroms.push(GenomicInterval::new(chrom, start, end)?);
                }
                chroms
            }
            found => {
                return Err(InvalidInputError::ColumnCount {
                    what: "chromsizes",
                    expected: "2 or 3",
                    found,
                })
            }
        },
    };

    let mids: Vec<GenomicInterval> = match midpoints {
        MidpointsInput::Mapping(mids) => mids
            .into_iter()
            .map(|(chrom, mid)| GenomicInterval::point(chrom, mid))
            .collect(),
        MidpointsInput::Table { table, columns } => {
            let names = [columns.0, columns.1];
            let idx = locate(&table, &names, "midpoints")?;
            table
                .rows
                .iter()
                .map(|row| {
                    let mid = cell_u64(row, idx[1], &names[1], "midpoints")?;
                    Ok(GenomicInterval::point(cell(row, idx[0]), mid))
                })
                .collect::<InputResult<Vec<_>>>()?
        }
    };

    Ok((chroms, mids))
}

fn locate(table: &Table, columns: &[String], what: &'static str) -> InputResult<Vec<usize>> {
    let names: Vec<&str> = columns.iter().map(String::as_str).collect();
    table
        .locate_columns(&names)
        .map_err(|missing| InvalidInputError::MissingColumns { what, missing })
}

#[inline]
fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

fn cell_u64(row: &[String], idx: usize, column: &str, what: &'static str) -> InputResult<u64> {
    let value = cell(row, idx);
    value.trim().parse().map_err(|_| InvalidInputError::InvalidNumber {
        what,
        column: column.to_string(),
        value: value.to_string(),
    })
}
