//! Generic tab-delimited tables
//!
//! A header line followed by rows of string cells. Typed access happens at
//! the call site through column lookups.

use crate::core::error::{TableError, TableResult};
use crate::core::io::{create_writer, open_text, split_fields, LineIterator};
use std::io::{BufRead, Write};
use std::path::Path;

/// Header plus rows of raw cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from string literals, mainly for tests and adapters
    pub fn from_rows<S: AsRef<str>>(columns: &[S], rows: &[Vec<S>]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.as_ref().to_string()).collect())
                .collect(),
        }
    }

    /// Read a headed table. Blank lines are skipped; every row must match
    /// the header width.
    pub fn read<R: BufRead>(reader: R) -> TableResult<Self> {
        let mut lines = LineIterator::new(reader);

        let columns: Vec<String> = match lines.next_line() {
            Some(line) => split_fields(line?).into_iter().map(str::to_string).collect(),
            None => return Err(TableError::MissingHeader),
        };

        let mut rows = Vec::new();
        while let Some(line) = lines.next_line() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let row: Vec<String> = split_fields(line).into_iter().map(str::to_string).collect();
            if row.len() != columns.len() {
                return Err(TableError::RaggedRow {
                    line: lines.line_number(),
                    expected: columns.len(),
                    found: row.len(),
                });
            }
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Read a headed table from a possibly compressed file
    pub fn read_path<P: AsRef<Path>>(path: P) -> TableResult<Self> {
        Self::read(open_text(path)?)
    }

    /// Write header and rows, tab-separated, no index column
    pub fn write<W: Write>(&self, mut writer: W) -> TableResult<()> {
        writeln!(writer, "{}", self.columns.join("\t"))?;
        for row in &self.rows {
            writeln!(writer, "{}", row.join("\t"))?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_path<P: AsRef<Path>>(&self, path: P) -> TableResult<()> {
        self.write(create_writer(path)?)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of a column, or `TableError::MissingColumn`
    pub fn require_column(&self, name: &str) -> TableResult<usize> {
        self.column_index(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Positions of all `names`, or the list of those absent
    pub fn locate_columns(&self, names: &[&str]) -> Result<Vec<usize>, Vec<String>> {
        let mut found = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.column_index(name) {
                Some(idx) => found.push(idx),
                None => missing.push(name.to_string()),
            }
        }
        if missing.is_empty() {
            Ok(found)
        } else {
            Err(missing)
        }
    }

    /// Append a boolean column, one value per row
    pub fn push_bool_column(&mut self, name: &str, values: &[bool]) -> TableResult<()> {
        if values.len() != self.rows.len() {
            return Err(TableError::LengthMismatch {
                column: name.to_string(),
                expected: self.rows.len(),
                found: values.len(),
            });
        }
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(format_bool(*value).to_string());
        }
        Ok(())
    }
}

/// Parse an unsigned integer cell; `line` is 1-based including the header
pub fn parse_u64(value: &str, column: &str, line: usize) -> TableResult<u64> {
    value.trim().parse().map_err(|_| TableError::InvalidNumber {
        line,
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// Parse a boolean cell as written by pandas or by hand
pub fn parse_bool(value: &str, column: &str, line: usize) -> TableResult<bool> {
    match value.trim() {
        "True" | "true" | "TRUE" | "1" => Ok(true),
        "False" | "false" | "FALSE" | "0" => Ok(false),
        other => Err(TableError::InvalidBool {
            line,
            column: column.to_string(),
            value: other.to_string(),
        }),
    }
}

/// Boolean rendering compatible with pandas-written tables
#[inline]
pub fn format_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}
