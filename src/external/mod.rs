//! External collaborators
//!
//! The contact-matrix store, genome metadata and insulation scorer live
//! outside this crate. The pipeline reaches them only through the traits
//! below; the bundled adapters drive the `cooler` and `cooltools` command
//! line tools and read assembly files from a local directory.

mod assembly;
mod cooler;
mod cooltools;

pub use assembly::AssemblyDir;
pub use cooler::{parse_chromnames, CoolerCli};
pub use cooltools::CooltoolsCli;

use crate::core::arms::{ChromSizesInput, MidpointsInput};
use crate::core::{GenomeError, MatrixOpenError, ScorerError};
use crate::core::view::View;
use crate::formats::insulation::InsulationTable;
use std::path::Path;
use std::process::Command;

/// An opened contact matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixHandle {
    /// URI understood by the matrix tools, e.g. `file.mcool::/resolutions/10000`
    pub uri: String,
    /// Chromosomes in matrix order
    pub chromnames: Vec<String>,
    /// Bin size reported by the matrix, when known
    pub bin_size: Option<u64>,
}

/// Opens contact matrices
pub trait MatrixStore {
    /// Open `path` at `resolution`; `None` opens the file as a single-resolution matrix
    fn open(&self, path: &Path, resolution: Option<u64>) -> Result<MatrixHandle, MatrixOpenError>;
}

/// Supplies chromosome sizes and centromeres for a named assembly
pub trait GenomeCatalog {
    fn fetch_chrom_sizes(&self, genome: &str) -> Result<ChromSizesInput, GenomeError>;
    fn fetch_centromeres(&self, genome: &str) -> Result<MidpointsInput, GenomeError>;
}

/// Computes per-bin insulation scores and boundary calls
pub trait InsulationScorer {
    /// Score `matrix` over `view` for every window (bp). The result holds an
    /// `is_boundary_<window>` column per window.
    fn compute(
        &self,
        matrix: &MatrixHandle,
        windows: &[u64],
        view: &View,
        nproc: usize,
    ) -> Result<InsulationTable, ScorerError>;
}

/// Failure of an external command
#[derive(Debug)]
pub(crate) enum CommandError {
    Spawn(std::io::Error),
    Failed { status: String, stderr: String },
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Spawn(e) => write!(f, "failed to start: {}", e),
            CommandError::Failed { status, stderr } => write!(f, "exited with {}: {}", status, stderr),
        }
    }
}

/// Run a command to completion, returning its stdout
pub(crate) fn run_capture(command: &mut Command) -> Result<String, CommandError> {
    log::debug!("running {:?}", command);
    let output = command.output().map_err(CommandError::Spawn)?;
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(CommandError::Failed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
