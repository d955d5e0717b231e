//! Error types for ctcf-boundaries
//!
//! Defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for boundary calling
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// Malformed chromosome sizes, midpoints or intervals
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Contact matrix could not be opened
    #[error("Matrix open error: {0}")]
    MatrixOpen(#[from] MatrixOpenError),

    /// Peak file problems
    #[error("Peak format error: {0}")]
    PeakFormat(#[from] PeakFormatError),

    /// Arm view failed well-formedness checks
    #[error("View validation error: {0}")]
    ViewValidation(#[from] ViewValidationError),

    /// Malformed tab-delimited table
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Insulation scorer failures
    #[error("Scorer error: {0}")]
    Scorer(#[from] ScorerError),

    /// Genome assembly metadata problems
    #[error("Genome metadata error: {0}")]
    Genome(#[from] GenomeError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while normalizing or splitting chromosome inputs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidInputError {
    /// Wrong number of column names for the input shape
    #[error("{what}: expected {expected} column names, got {found}")]
    ColumnCount {
        what: &'static str,
        expected: &'static str,
        found: usize,
    },

    /// Required columns absent from a table
    #[error("{what}: missing required columns {missing:?}")]
    MissingColumns {
        what: &'static str,
        missing: Vec<String>,
    },

    /// The same column named twice
    #[error("{what}: column names must be unique, got {columns:?}")]
    DuplicateColumns {
        what: &'static str,
        columns: Vec<String>,
    },

    /// Chromosome table with a non-zero start
    #[error("all values in starts column must be zero, {chrom} starts at {start}")]
    NonZeroStart { chrom: String, start: u64 },

    /// Subtraction produced more than two pieces
    #[error("chromosome {chrom} split into {pieces} arms (more than two), check midpoints for duplicates or malformed input")]
    TooManyArms { chrom: String, pieces: usize },

    /// Cell that should hold an integer coordinate
    #[error("{what}: invalid integer '{value}' in column '{column}'")]
    InvalidNumber {
        what: &'static str,
        column: String,
        value: String,
    },

    /// Interval with start > end
    #[error("invalid interval {chrom}:{start}-{end} (start > end)")]
    InvalidInterval { chrom: String, start: u64, end: u64 },

    /// Bin size of zero
    #[error("bin size must be greater than zero")]
    ZeroBinSize,

    /// Resolution whose insulation window does not fit in a u64
    #[error("resolution {resolution} bp is too large for a {bins}-bin insulation window")]
    ResolutionTooLarge { resolution: u64, bins: u64 },
}

/// Contact matrix could be opened neither at the requested resolution nor as a flat file
#[derive(Debug, Error)]
#[error("cannot open contact matrix {path:?} (resolution {resolution:?}): {message}")]
pub struct MatrixOpenError {
    pub path: PathBuf,
    pub resolution: Option<u64>,
    pub message: String,
}

/// Errors in the CTCF peak file
#[derive(Debug, Error)]
pub enum PeakFormatError {
    /// Header lacks chrom/start/end
    #[error("peak file must contain at least columns {required:?}, found {found:?}")]
    MissingColumns {
        required: Vec<String>,
        found: Vec<String>,
    },

    /// No header line at all
    #[error("peak file {0:?} is empty")]
    Empty(PathBuf),

    /// Data line that cannot be parsed
    #[error("invalid peak at line {line}: {message}")]
    InvalidRow { line: usize, message: String },

    /// I/O error while reading peaks
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while validating the chromosome-arm view
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewValidationError {
    /// Matrix chromosome without any arm
    #[error("matrix chromosome {0} has no corresponding arm in the genome assembly")]
    MissingChromosome(String),

    /// Region name used twice
    #[error("duplicate view region name {0}")]
    DuplicateName(String),

    /// Two regions overlap
    #[error("view regions {first} and {second} overlap")]
    Overlapping { first: String, second: String },

    /// Zero-length region
    #[error("view region {0} is empty")]
    EmptyRegion(String),

    /// Region on a chromosome absent from the matrix
    #[error("view region {name} is on chromosome {chrom}, which is not in the matrix")]
    UnknownChromosome { name: String, chrom: String },
}

/// Errors in generic tab-delimited tables
#[derive(Debug, Error)]
pub enum TableError {
    /// Missing header line
    #[error("table has no header line")]
    MissingHeader,

    /// Column lookup failed
    #[error("missing column '{0}'")]
    MissingColumn(String),

    /// Row width differs from header width
    #[error("line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Integer parse failure
    #[error("line {line}: invalid integer '{value}' in column '{column}'")]
    InvalidNumber {
        line: usize,
        column: String,
        value: String,
    },

    /// Boolean parse failure
    #[error("line {line}: invalid boolean '{value}' in column '{column}'")]
    InvalidBool {
        line: usize,
        column: String,
        value: String,
    },

    /// Flag column length differs from row count
    #[error("column '{column}' has {found} values for {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the external insulation scorer
#[derive(Debug, Error)]
pub enum ScorerError {
    /// Program could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Program exited unsuccessfully
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// Output could not be parsed
    #[error("unreadable scorer output: {0}")]
    Output(#[from] TableError),

    /// Scratch file I/O
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors while loading genome assembly metadata
#[derive(Debug, Error)]
pub enum GenomeError {
    /// Assembly file not found
    #[error("genome file not found: {0:?}")]
    FileNotFound(PathBuf),

    /// Malformed line
    #[error("{path:?} line {line}: {message}")]
    InvalidLine {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for boundary calling operations
pub type Result<T> = std::result::Result<T, BoundaryError>;

/// Result type alias for input normalization and arm splitting
pub type InputResult<T> = std::result::Result<T, InvalidInputError>;

/// Result type alias for table operations
pub type TableResult<T> = std::result::Result<T, TableError>;
