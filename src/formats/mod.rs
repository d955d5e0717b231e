//! File format adapters
//!
//! Peak files, insulation tables with boundary output, and assembly metadata.

pub mod genome;
pub mod insulation;
pub mod peaks;

pub use genome::{is_primary_chrom, read_centromeres, read_chrom_sizes};
pub use insulation::{
    boundary_column, write_boundaries, BoundaryRecord, InsulationRow, InsulationTable,
    HAS_CTCF_COLUMN,
};
pub use peaks::{Peak, PeakSet};
