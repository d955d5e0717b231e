//! ctcf-boundaries - CTCF-supported insulation boundaries from Hi-C
//!
//! Splits chromosomes into arms around their centromeres, scores insulation
//! per arm with an external scorer, and keeps the boundary bins that share a
//! bin with a CTCF peak.
//!
//! # Example
//!
//! ```ignore
//! use ctcf_boundaries::{AssemblyDir, BoundaryCaller, CoolerCli, CooltoolsCli, PipelineConfig};
//!
//! let store = CoolerCli::default();
//! let genome = AssemblyDir::new("genomes");
//! let scorer = CooltoolsCli::default();
//! let caller = BoundaryCaller::new(&store, &genome, &scorer, PipelineConfig::default());
//!
//! let stats = caller.run("sample.mcool".as_ref(), Some("ctcf.tsv".as_ref()), "out.tsv".as_ref())?;
//! ```

pub mod core;
pub mod external;
pub mod formats;
pub mod pipeline;

// Re-export commonly used types
pub use crate::core::{
    bin_index, flag_overlap, subtract, Arm, ArmSplitter, BinOverlapIndexer, BoundaryError,
    ChromSizesInput, ChromosomeSizes, GenomicInterval, InvalidInputError, Located,
    MatrixOpenError, Midpoints, MidpointsInput, PeakFormatError, Table, View,
    ViewValidationError,
};
pub use external::{
    AssemblyDir, CoolerCli, CooltoolsCli, GenomeCatalog, InsulationScorer, MatrixHandle,
    MatrixStore,
};
pub use formats::{BoundaryRecord, InsulationRow, InsulationTable, Peak, PeakSet};
pub use pipeline::{BoundaryCaller, BoundaryStats, PipelineConfig};
