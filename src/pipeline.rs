//! Boundary calling pipeline
//!
//! Four stages, strictly in order:
//!
//! 1. load peaks, the contact matrix and assembly metadata
//! 2. build the chromosome-arm view in matrix chromosome order
//! 3. score insulation over the view
//! 4. keep boundaries with CTCF support and write them out
//!
//! Only the last stage touches the output path.

use crate::core::arms::{ArmSplitter, ChromSizesInput, MidpointsInput};
use crate::core::{InputResult, InvalidInputError, Result};
use crate::core::io::write_atomic;
use crate::core::overlap::flag_overlap;
use crate::core::view::View;
use crate::external::{GenomeCatalog, InsulationScorer, MatrixHandle, MatrixStore};
use crate::formats::insulation::{boundary_column, write_boundaries, BoundaryRecord, InsulationTable};
use crate::formats::peaks::PeakSet;
use log::info;
use std::path::Path;

/// Default matrix resolution in base pairs
pub const DEFAULT_RESOLUTION: u64 = 10_000;

/// Default worker count handed to the scorer
pub const DEFAULT_NPROC: usize = 4;

/// Default assembly name
pub const DEFAULT_GENOME: &str = "hg38";

/// Insulation window in bins
pub const WINDOW_BINS: u64 = 10;

/// Pipeline parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub resolution: u64,
    pub nproc: usize,
    pub genome: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            nproc: DEFAULT_NPROC,
            genome: DEFAULT_GENOME.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Insulation window: always ten bins
    pub fn window(&self) -> InputResult<u64> {
        self.resolution
            .checked_mul(WINDOW_BINS)
            .ok_or(InvalidInputError::ResolutionTooLarge {
                resolution: self.resolution,
                bins: WINDOW_BINS,
            })
    }

    /// Reject settings no run can succeed with
    pub fn validate(&self) -> InputResult<()> {
        if self.resolution == 0 {
            return Err(InvalidInputError::ZeroBinSize);
        }
        self.window()?;
        Ok(())
    }
}

/// Everything stage 1 produces
#[derive(Debug, Clone)]
pub struct LoadedInputs {
    pub matrix: MatrixHandle,
    pub chrom_sizes: ChromSizesInput,
    pub centromeres: MidpointsInput,
    pub peaks: Option<PeakSet>,
}

/// Pipeline statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryStats {
    pub window: u64,
    pub arms: usize,
    pub peaks: usize,
    pub bins: usize,
    pub boundaries: usize,
    pub ctcf_supported: usize,
    pub written: usize,
}

/// Calls CTCF-supported insulation boundaries using injected collaborators
pub struct BoundaryCaller<'a> {
    store: &'a dyn MatrixStore,
    genome: &'a dyn GenomeCatalog,
    scorer: &'a dyn InsulationScorer,
    config: PipelineConfig,
    splitter: ArmSplitter,
}

impl<'a> BoundaryCaller<'a> {
    pub fn new(
        store: &'a dyn MatrixStore,
        genome: &'a dyn GenomeCatalog,
        scorer: &'a dyn InsulationScorer,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            genome,
            scorer,
            config,
            splitter: ArmSplitter::default(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Stage 1. Peaks are read and validated before the matrix is opened.
    pub fn load(&self, cool_file: &Path, peaks_file: Option<&Path>) -> Result<LoadedInputs> {
        let peaks = match peaks_file {
            Some(path) => {
                info!("Loading peaks: {:?}", path);
                Some(PeakSet::read_path(path)?)
            }
            None => None,
        };

        info!(
            "Opening contact matrix: {:?} at {} bp",
            cool_file, self.config.resolution
        );
        let matrix = self.store.open(cool_file, Some(self.config.resolution))?;
        info!(
            "Matrix {} has {} chromosomes",
            matrix.uri,
            matrix.chromnames.len()
        );

        info!("Fetching assembly metadata: {}", self.config.genome);
        let chrom_sizes = self.genome.fetch_chrom_sizes(&self.config.genome)?;
        let centromeres = self.genome.fetch_centromeres(&self.config.genome)?;

        let peaks = peaks.map(|set| set.restrict_to(&matrix.chromnames));
        if let Some(set) = &peaks {
            info!("{} peaks on matrix chromosomes", set.len());
        }

        Ok(LoadedInputs {
            matrix,
            chrom_sizes,
            centromeres,
            peaks,
        })
    }

    /// Stage 2. Split arms and order them like the matrix chromosomes.
    pub fn build_view(
        &self,
        chrom_sizes: ChromSizesInput,
        centromeres: MidpointsInput,
        chromnames: &[String],
    ) -> Result<View> {
        let arms = self.splitter.split(chrom_sizes, centromeres)?;
        let view = View::for_chromosomes(&arms, chromnames)?;
        info!("View has {} arms over {} chromosomes", view.len(), chromnames.len());
        Ok(view)
    }

    /// Stage 3. Blocks until the scorer finishes.
    pub fn score(&self, matrix: &MatrixHandle, view: &View) -> Result<InsulationTable> {
        let window = self.config.window()?;
        info!(
            "Computing insulation (window {} bp, {} processes)",
            window, self.config.nproc
        );
        let table = self.scorer.compute(matrix, &[window], view, self.config.nproc)?;
        info!("Scored {} bins", table.len());
        Ok(table)
    }

    /// Stage 4 without the write: every bin with its boundary and CTCF flags
    pub fn annotate(
        &self,
        insulation: &InsulationTable,
        peaks: Option<&PeakSet>,
    ) -> Result<Vec<BoundaryRecord>> {
        let is_boundary = insulation.boundary_flags(self.config.window()?)?;
        let no_peaks = PeakSet::default();
        let peaks = peaks.unwrap_or(&no_peaks);
        let flagged = flag_overlap(insulation.rows(), &peaks.peaks, self.config.resolution)?;

        Ok(flagged
            .into_iter()
            .zip(is_boundary)
            .map(|(flagged, is_boundary)| BoundaryRecord {
                row: flagged.row.clone(),
                is_boundary,
                has_ctcf: flagged.flag,
            })
            .collect())
    }

    /// Run all four stages, writing CTCF-supported boundaries to `out_path`
    pub fn run(&self, cool_file: &Path, peaks_file: Option<&Path>, out_path: &Path) -> Result<BoundaryStats> {
        self.config.validate()?;

        let inputs = self.load(cool_file, peaks_file)?;
        let view = self.build_view(inputs.chrom_sizes, inputs.centromeres, &inputs.matrix.chromnames)?;
        let insulation = self.score(&inputs.matrix, &view)?;
        let records = self.annotate(&insulation, inputs.peaks.as_ref())?;

        let window = self.config.window()?;
        let mut stats = BoundaryStats {
            window,
            arms: view.len(),
            peaks: inputs.peaks.as_ref().map_or(0, PeakSet::len),
            bins: records.len(),
            ..Default::default()
        };
        for record in &records {
            stats.boundaries += record.is_boundary as usize;
            stats.ctcf_supported += record.has_ctcf as usize;
        }

        let kept: Vec<BoundaryRecord> = records.into_iter().filter(BoundaryRecord::is_ctcf_boundary).collect();
        stats.written = kept.len();

        info!(
            "Writing {} CTCF boundaries ({}) to {:?}",
            kept.len(),
            boundary_column(window),
            out_path
        );
        write_atomic(out_path, |writer| write_boundaries(insulation.columns(), &kept, writer))?;

        Ok(stats)
    }
}
