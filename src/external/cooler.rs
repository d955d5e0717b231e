//! Contact matrices through the `cooler` command line tool

use super::{run_capture, CommandError, MatrixHandle, MatrixStore};
use crate::core::MatrixOpenError;
use std::path::Path;
use std::process::Command;

/// Opens `.cool`/`.mcool` files by asking `cooler` for their chromosomes
#[derive(Debug, Clone)]
pub struct CoolerCli {
    program: String,
}

impl Default for CoolerCli {
    fn default() -> Self {
        Self::new("cooler")
    }
}

impl CoolerCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn chromnames(&self, uri: &str) -> Result<Vec<String>, CommandError> {
        let stdout = run_capture(
            Command::new(&self.program)
                .args(["dump", "-t", "chroms"])
                .arg(uri),
        )?;
        Ok(parse_chromnames(&stdout))
    }

    fn bin_size(&self, uri: &str) -> Option<u64> {
        run_capture(
            Command::new(&self.program)
                .args(["info", "-f", "bin-size"])
                .arg(uri),
        )
        .ok()
        .and_then(|out| out.trim().parse().ok())
    }

    fn handle(&self, uri: String, chromnames: Vec<String>) -> MatrixHandle {
        let bin_size = self.bin_size(&uri);
        MatrixHandle {
            uri,
            chromnames,
            bin_size,
        }
    }
}

impl MatrixStore for CoolerCli {
    fn open(&self, path: &Path, resolution: Option<u64>) -> Result<MatrixHandle, MatrixOpenError> {
        let base = path.to_string_lossy().into_owned();
        let mut failures = Vec::new();

        if let Some(res) = resolution {
            let uri = format!("{}::/resolutions/{}", base, res);
            match self.chromnames(&uri) {
                Ok(names) => return Ok(self.handle(uri, names)),
                Err(e) => {
                    log::warn!("cannot open {} ({}), falling back to {}", uri, e, base);
                    failures.push(format!("{}: {}", uri, e));
                }
            }
        }

        match self.chromnames(&base) {
            Ok(names) => {
                let handle = self.handle(base, names);
                if let (Some(res), Some(bin)) = (resolution, handle.bin_size) {
                    if res != bin {
                        log::warn!(
                            "matrix {} has bin size {}, requested resolution {}",
                            handle.uri,
                            bin,
                            res
                        );
                    }
                }
                Ok(handle)
            }
            Err(e) => {
                failures.push(format!("{}: {}", base, e));
                Err(MatrixOpenError {
                    path: path.to_path_buf(),
                    resolution,
                    message: failures.join("; "),
                })
            }
        }
    }
}

/// Chromosome names from `cooler dump -t chroms` output (`name\tlength` lines)
pub fn parse_chromnames(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.split('\t').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chromnames() {
        let out = "chr1\t248956422\nchr2\t242193529\n\nchrX\t156040895\n";
        assert_eq!(parse_chromnames(out), vec!["chr1", "chr2", "chrX"]);
    }

    #[test]
    fn test_parse_chromnames_empty() {
        assert!(parse_chromnames("").is_empty());
    }

    #[test]
    fn test_missing_program_is_open_error() {
        let store = CoolerCli::new("ctcf-boundaries-no-such-cooler");
        let err = store
            .open(Path::new("sample.mcool"), Some(10000))
            .unwrap_err();
        assert_eq!(err.resolution, Some(10000));
        assert!(err.message.contains("sample.mcool::/resolutions/10000"));
        assert!(err.message.contains("failed to start"));
    }

    #[cfg(unix)]
    const FAKE_COOLER: &str = r#"case "$*" in
  *resolutions*) [ -n "$MULTIRES" ] || { echo "group not found" >&2; exit 1; } ;;
esac
case "$1" in
  dump) printf 'chr1\t1000\nchr2\t800\n' ;;
  info) echo 100 ;;
  *) exit 2 ;;
esac
"#;

    #[cfg(unix)]
    #[test]
    fn test_falls_back_to_flat_file() {
        use crate::external::testing::fake_program;

        let dir = tempfile::tempdir().unwrap();
        let program = fake_program(dir.path(), "cooler", FAKE_COOLER);
        let store = CoolerCli::new(program.to_string_lossy());

        let handle = store.open(Path::new("x.cool"), Some(100)).unwrap();
        assert_eq!(
            handle,
            MatrixHandle {
                uri: "x.cool".to_string(),
                chromnames: vec!["chr1".to_string(), "chr2".to_string()],
                bin_size: Some(100),
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_opens_requested_resolution() {
        use crate::external::testing::fake_program;

        let dir = tempfile::tempdir().unwrap();
        let body = format!("MULTIRES=1\n{}", FAKE_COOLER);
        let program = fake_program(dir.path(), "cooler", &body);
        let store = CoolerCli::new(program.to_string_lossy());

        let handle = store.open(Path::new("x.mcool"), Some(100)).unwrap();
        assert_eq!(handle.uri, "x.mcool::/resolutions/100");
        assert_eq!(handle.chromnames, vec!["chr1", "chr2"]);
        assert_eq!(handle.bin_size, Some(100));
    }

    #[cfg(unix)]
    #[test]
    fn test_flat_file_failure_reports_both_attempts() {
        use crate::external::testing::fake_program;

        let dir = tempfile::tempdir().unwrap();
        let program = fake_program(dir.path(), "cooler", "echo broken >&2\nexit 1\n");
        let store = CoolerCli::new(program.to_string_lossy());

        let err = store.open(Path::new("x.cool"), Some(100)).unwrap_err();
        assert!(err.message.contains("x.cool::/resolutions/100"));
        assert!(err.message.contains("broken"));
    }
}
