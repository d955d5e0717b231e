//! End-to-end tests for the boundary pipeline with in-memory collaborators

use ctcf_boundaries::core::{
    BoundaryError, ChromSizesInput, GenomeError, InvalidInputError, MatrixOpenError,
    MidpointsInput, PeakFormatError, ScorerError, Table, ViewValidationError,
};
use ctcf_boundaries::external::{GenomeCatalog, InsulationScorer, MatrixHandle, MatrixStore};
use ctcf_boundaries::{BoundaryCaller, ChromosomeSizes, InsulationTable, Midpoints, PipelineConfig, View};
use std::cell::{Cell, RefCell};
use std::path::Path;
use tempfile::TempDir;

struct FakeStore {
    chromnames: Vec<String>,
    opened: Cell<usize>,
}

impl FakeStore {
    fn new(chromnames: &[&str]) -> Self {
        Self {
            chromnames: chromnames.iter().map(|c| c.to_string()).collect(),
            opened: Cell::new(0),
        }
    }
}

impl MatrixStore for FakeStore {
    fn open(&self, path: &Path, resolution: Option<u64>) -> Result<MatrixHandle, MatrixOpenError> {
        self.opened.set(self.opened.get() + 1);
        Ok(MatrixHandle {
            uri: path.to_string_lossy().into_owned(),
            chromnames: self.chromnames.clone(),
            bin_size: resolution,
        })
    }
}

struct FakeGenome {
    sizes: Vec<(&'static str, u64)>,
    mids: Vec<(&'static str, u64)>,
}

impl GenomeCatalog for FakeGenome {
    fn fetch_chrom_sizes(&self, _genome: &str) -> Result<ChromSizesInput, GenomeError> {
        let sizes: ChromosomeSizes = self.sizes.iter().map(|(c, l)| (c.to_string(), *l)).collect();
        Ok(sizes.into())
    }

    fn fetch_centromeres(&self, _genome: &str) -> Result<MidpointsInput, GenomeError> {
        let mids: Midpoints = self.mids.iter().map(|(c, m)| (c.to_string(), *m)).collect();
        Ok(mids.into())
    }
}

/// Returns a canned insulation table and records the view it was given
struct FakeScorer {
    output: String,
    seen: RefCell<Option<(Vec<u64>, Vec<String>, usize)>>,
}

impl FakeScorer {
    fn new(output: &str) -> Self {
        Self {
            output: output.to_string(),
            seen: RefCell::new(None),
        }
    }
}

impl InsulationScorer for FakeScorer {
    fn compute(
        &self,
        _matrix: &MatrixHandle,
        windows: &[u64],
        view: &View,
        nproc: usize,
    ) -> Result<InsulationTable, ScorerError> {
        let names = view.regions().iter().map(|a| a.name.clone()).collect();
        *self.seen.borrow_mut() = Some((windows.to_vec(), names, nproc));
        Ok(InsulationTable::read(self.output.as_bytes())?)
    }
}

const INSULATION: &str = "chrom\tstart\tend\tregion\tlog2_insulation_score_1000\tis_boundary_1000\n\
chr1\t200\t300\tchr1_p\t-0.10\tFalse\n\
chr1\t300\t400\tchr1_p\t-0.90\tTrue\n\
chr1\t600\t700\tchr1_q\t-0.20\tFalse\n\
chr1\t700\t800\tchr1_q\t-0.70\tTrue\n";

const PEAKS: &str = "chrom\tstart\tend\tname\n\
chr1\t310\t330\tpeak1\n\
chr1\t620\t640\tpeak2\n\
chr9\t100\t200\tpeak3\n";

fn config() -> PipelineConfig {
    PipelineConfig {
        resolution: 100,
        nproc: 2,
        genome: "toy".to_string(),
    }
}

fn toy_genome() -> FakeGenome {
    FakeGenome {
        sizes: vec![("chr1", 1000)],
        mids: vec![("chr1", 500)],
    }
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_end_to_end_keeps_ctcf_boundaries() {
    let dir = tempfile::tempdir().unwrap();
    let peaks = write_file(&dir, "peaks.tsv", PEAKS);
    let out = dir.path().join("boundaries.tsv");

    let store = FakeStore::new(&["chr1"]);
    let genome = toy_genome();
    let scorer = FakeScorer::new(INSULATION);
    let caller = BoundaryCaller::new(&store, &genome, &scorer, config());

    let stats = caller
        .run(Path::new("sample.mcool"), Some(&peaks), &out)
        .unwrap();

    assert_eq!(stats.arms, 2);
    assert_eq!(stats.peaks, 2);
    assert_eq!(stats.bins, 4);
    assert_eq!(stats.boundaries, 2);
    assert_eq!(stats.ctcf_supported, 2);
    assert_eq!(stats.written, 1);

    let (windows, names, nproc) = scorer.seen.borrow().clone().unwrap();
    assert_eq!(windows, vec![1000]);
    assert_eq!(names, vec!["chr1_p", "chr1_q"]);
    assert_eq!(nproc, 2);

    let table = Table::read_path(&out).unwrap();
    assert_eq!(
        table.columns,
        vec![
            "chrom",
            "start",
            "end",
            "region",
            "log2_insulation_score_1000",
            "is_boundary_1000",
            "has_ctcf"
        ]
    );
    assert_eq!(
        table.rows,
        vec![vec!["chr1", "300", "400", "chr1_p", "-0.90", "True", "True"]]
    );
}

#[test]
fn test_single_boundary_bin_with_peak() {
    let mut insulation = String::from("chrom\tstart\tend\tregion\tis_boundary_1000\n");
    for bin in 0..10u64 {
        let region = if bin < 5 { "chr1_p" } else { "chr1_q" };
        let flag = if bin == 3 { "True" } else { "False" };
        insulation.push_str(&format!(
            "chr1\t{}\t{}\t{}\t{}\n",
            bin * 100,
            (bin + 1) * 100,
            region,
            flag
        ));
    }

    let dir = tempfile::tempdir().unwrap();
    let peaks = write_file(&dir, "peaks.tsv", "chrom\tstart\tend\nchr1\t350\t360\n");
    let out = dir.path().join("boundaries.tsv");

    let store = FakeStore::new(&["chr1"]);
    let genome = toy_genome();
    let scorer = FakeScorer::new(&insulation);
    let stats = BoundaryCaller::new(&store, &genome, &scorer, config())
        .run(Path::new("sample.mcool"), Some(&peaks), &out)
        .unwrap();

    assert_eq!(stats.bins, 10);
    assert_eq!(stats.written, 1);
    let table = Table::read_path(&out).unwrap();
    assert_eq!(
        table.rows,
        vec![vec!["chr1", "300", "400", "chr1_p", "True", "True"]]
    );
}

#[test]
fn test_output_reads_back_as_insulation_table() {
    let dir = tempfile::tempdir().unwrap();
    let peaks = write_file(&dir, "peaks.tsv", PEAKS);
    let out = dir.path().join("boundaries.tsv");

    let store = FakeStore::new(&["chr1"]);
    let genome = toy_genome();
    let scorer = FakeScorer::new(INSULATION);
    BoundaryCaller::new(&store, &genome, &scorer, config())
        .run(Path::new("sample.mcool"), Some(&peaks), &out)
        .unwrap();

    let written = InsulationTable::read_path(&out).unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written.boundary_flags(1000).unwrap(), vec![true]);
    assert_eq!(written.rows()[0].interval.start, 300);
}

#[test]
fn test_peak_header_checked_before_matrix_open() {
    let dir = tempfile::tempdir().unwrap();
    let peaks = write_file(&dir, "peaks.tsv", "chrom\tstart\tname\nchr1\t310\tpeak1\n");
    let out = dir.path().join("boundaries.tsv");

    let store = FakeStore::new(&["chr1"]);
    let genome = toy_genome();
    let scorer = FakeScorer::new(INSULATION);
    let err = BoundaryCaller::new(&store, &genome, &scorer, config())
        .run(Path::new("sample.mcool"), Some(&peaks), &out)
        .unwrap_err();

    assert!(matches!(
        err,
        BoundaryError::PeakFormat(PeakFormatError::MissingColumns { .. })
    ));
    assert_eq!(store.opened.get(), 0);
    assert!(scorer.seen.borrow().is_none());
    assert!(!out.exists());
}

#[test]
fn test_matrix_chromosome_without_arm() {
    let dir = tempfile::tempdir().unwrap();
    let peaks = write_file(&dir, "peaks.tsv", PEAKS);
    let out = dir.path().join("boundaries.tsv");

    let store = FakeStore::new(&["chr1", "chr2"]);
    let genome = toy_genome();
    let scorer = FakeScorer::new(INSULATION);
    let err = BoundaryCaller::new(&store, &genome, &scorer, config())
        .run(Path::new("sample.mcool"), Some(&peaks), &out)
        .unwrap_err();

    match err {
        BoundaryError::ViewValidation(e) => {
            assert_eq!(e, ViewValidationError::MissingChromosome("chr2".to_string()))
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(scorer.seen.borrow().is_none());
    assert!(!out.exists());
}

#[test]
fn test_view_follows_matrix_order() {
    let store = FakeStore::new(&["chr2", "chr1"]);
    let genome = FakeGenome {
        sizes: vec![("chr1", 1000), ("chr2", 800), ("chr3", 600)],
        mids: vec![("chr1", 500), ("chr2", 300), ("chr3", 200)],
    };
    let scorer = FakeScorer::new(INSULATION);
    let caller = BoundaryCaller::new(&store, &genome, &scorer, config());

    let inputs = caller.load(Path::new("sample.cool"), None).unwrap();
    let view = caller
        .build_view(inputs.chrom_sizes, inputs.centromeres, &inputs.matrix.chromnames)
        .unwrap();
    let names: Vec<&str> = view.regions().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["chr2_p", "chr2_q", "chr1_p", "chr1_q"]);
}

#[test]
fn test_without_peaks_nothing_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("boundaries.tsv");

    let store = FakeStore::new(&["chr1"]);
    let genome = toy_genome();
    let scorer = FakeScorer::new(INSULATION);
    let stats = BoundaryCaller::new(&store, &genome, &scorer, config())
        .run(Path::new("sample.mcool"), None, &out)
        .unwrap();

    assert_eq!(stats.ctcf_supported, 0);
    assert_eq!(stats.written, 0);
    let table = Table::read_path(&out).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.columns.last().map(String::as_str), Some("has_ctcf"));
}

#[test]
fn test_zero_resolution_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("boundaries.tsv");

    let store = FakeStore::new(&["chr1"]);
    let genome = toy_genome();
    let scorer = FakeScorer::new(INSULATION);
    let err = BoundaryCaller::new(
        &store,
        &genome,
        &scorer,
        PipelineConfig {
            resolution: 0,
            ..config()
        },
    )
    .run(Path::new("sample.mcool"), None, &out)
    .unwrap_err();

    assert!(matches!(err, BoundaryError::InvalidInput(_)));
    assert_eq!(store.opened.get(), 0);
}

#[test]
fn test_overflowing_window_rejected_before_matrix_open() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("boundaries.tsv");

    let store = FakeStore::new(&["chr1"]);
    let genome = toy_genome();
    let scorer = FakeScorer::new(INSULATION);
    let err = BoundaryCaller::new(
        &store,
        &genome,
        &scorer,
        PipelineConfig {
            resolution: u64::MAX / 5,
            ..config()
        },
    )
    .run(Path::new("sample.mcool"), None, &out)
    .unwrap_err();

    assert!(matches!(
        err,
        BoundaryError::InvalidInput(InvalidInputError::ResolutionTooLarge { .. })
    ));
    assert_eq!(store.opened.get(), 0);
    assert!(!out.exists());
}

#[test]
fn test_failed_run_keeps_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let peaks = write_file(&dir, "peaks.tsv", PEAKS);
    let out = write_file(&dir, "boundaries.tsv", "previous\n");

    let store = FakeStore::new(&["chr1"]);
    let genome = toy_genome();
    // scored at another window, so the boundary column is missing
    let scorer = FakeScorer::new("chrom\tstart\tend\tis_boundary_5000\nchr1\t300\t400\tTrue\n");
    let err = BoundaryCaller::new(&store, &genome, &scorer, config())
        .run(Path::new("sample.mcool"), Some(&peaks), &out)
        .unwrap_err();

    assert!(matches!(err, BoundaryError::Table(_)));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "previous\n");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_stats_report_window() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("boundaries.tsv");

    let store = FakeStore::new(&["chr1"]);
    let genome = toy_genome();
    let scorer = FakeScorer::new(INSULATION);
    let stats = BoundaryCaller::new(&store, &genome, &scorer, config())
        .run(Path::new("sample.mcool"), None, &out)
        .unwrap();
    assert_eq!(stats.window, 1000);
}
