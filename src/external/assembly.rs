//! Genome metadata from a local assembly directory

use super::GenomeCatalog;
use crate::core::arms::{ChromSizesInput, MidpointsInput};
use crate::core::GenomeError;
use crate::core::table::Table;
use crate::formats::genome::{read_centromeres, read_chrom_sizes};
use std::path::{Path, PathBuf};

/// Directory holding `<genome>.chrom.sizes` and `<genome>.centromeres.tsv`
#[derive(Debug, Clone)]
pub struct AssemblyDir {
    root: PathBuf,
    primary_only: bool,
}

impl AssemblyDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            primary_only: true,
        }
    }

    /// Keep only `chr1..chrN`, `chrX`, `chrY` and `chrM` (default true)
    pub fn primary_only(mut self, primary_only: bool) -> Self {
        self.primary_only = primary_only;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn chrom_sizes_path(&self, genome: &str) -> PathBuf {
        self.root.join(format!("{}.chrom.sizes", genome))
    }

    pub fn centromeres_path(&self, genome: &str) -> PathBuf {
        self.root.join(format!("{}.centromeres.tsv", genome))
    }
}

impl GenomeCatalog for AssemblyDir {
    fn fetch_chrom_sizes(&self, genome: &str) -> Result<ChromSizesInput, GenomeError> {
        let sizes = read_chrom_sizes(&self.chrom_sizes_path(genome), self.primary_only)?;
        log::debug!("{}: {} chromosomes", genome, sizes.len());
        Ok(ChromSizesInput::Mapping(sizes))
    }

    fn fetch_centromeres(&self, genome: &str) -> Result<MidpointsInput, GenomeError> {
        let mids = read_centromeres(&self.centromeres_path(genome))?;
        let rows: Vec<Vec<String>> = mids
            .into_iter()
            .map(|(chrom, mid)| vec![chrom, mid.to_string()])
            .collect();
        let mut table = Table::new(vec!["chrom".to_string(), "mid".to_string()]);
        table.rows = rows;
        Ok(MidpointsInput::table(table, "chrom", "mid"))
    }
}
