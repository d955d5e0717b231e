//! Core genomic-coordinate functionality
//!
//! Interval arithmetic, chromosome arm splitting, bin-level overlap and
//! view validation, plus the error types and table I/O they share.

pub mod arms;
mod error;
pub mod interval;
pub mod io;
pub mod overlap;
pub mod table;
pub mod view;

pub use arms::{
    write_bed4, Arm, ArmSplitter, ChromSizesInput, ChromosomeSizes, Midpoints, MidpointsInput,
};
pub use error::{
    BoundaryError, GenomeError, InputResult, InvalidInputError, MatrixOpenError,
    PeakFormatError, Result, ScorerError, TableError, TableResult, ViewValidationError,
};
pub use interval::{bin_index, subtract, GenomicInterval, Located};
pub use overlap::{flag_overlap, BinOverlapIndexer, Flagged};
pub use table::Table;
pub use view::View;
