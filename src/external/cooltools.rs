//! Insulation scores through `cooltools insulation`

use super::{run_capture, CommandError, InsulationScorer, MatrixHandle};
use crate::core::ScorerError;
use crate::core::io::create_writer;
use crate::core::view::View;
use crate::formats::insulation::InsulationTable;
use std::process::Command;

/// Runs `cooltools insulation` with the view written to a scratch BED file
#[derive(Debug, Clone)]
pub struct CooltoolsCli {
    program: String,
}

impl Default for CooltoolsCli {
    fn default() -> Self {
        Self::new("cooltools")
    }
}

impl CooltoolsCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl InsulationScorer for CooltoolsCli {
    fn compute(
        &self,
        matrix: &MatrixHandle,
        windows: &[u64],
        view: &View,
        nproc: usize,
    ) -> Result<InsulationTable, ScorerError> {
        // removed on drop
        let scratch = tempfile::tempdir()?;
        let view_path = scratch.path().join("view.bed");
        let out_path = scratch.path().join("insulation.tsv");
        view.write_bed(create_writer(&view_path)?)?;

        let mut command = Command::new(&self.program);
        command.arg("insulation").arg(&matrix.uri);
        for window in windows {
            command.arg(window.to_string());
        }
        command
            .arg("--view")
            .arg(&view_path)
            .arg("--nproc")
            .arg(nproc.to_string())
            .arg("-o")
            .arg(&out_path);

        run_capture(&mut command).map_err(|e| match e {
            CommandError::Spawn(source) => ScorerError::Spawn {
                program: self.program.clone(),
                source,
            },
            CommandError::Failed { status, stderr } => ScorerError::Failed {
                program: self.program.clone(),
                status,
                stderr,
            },
        })?;

        let table = InsulationTable::read_path(&out_path)?;
        log::debug!("{} returned {} bins", self.program, table.len());
        Ok(table)
    }
}
