//! ctcf-boundaries CLI entry point
//!
//! Calls insulation boundaries on a .cool/.mcool file and keeps those
//! supported by a CTCF peak.

use anyhow::Context;
use clap::Parser;
use ctcf_boundaries::pipeline::{DEFAULT_GENOME, DEFAULT_NPROC, DEFAULT_RESOLUTION};
use ctcf_boundaries::{AssemblyDir, BoundaryCaller, CoolerCli, CooltoolsCli, PipelineConfig};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "ctcf-boundaries")]
#[command(about = "Call CTCF boundaries from a .cool file and peak annotations")]
#[command(version)]
#[command(author = "ctcf-boundaries Contributors")]
struct Cli {
    /// Path to the .cool/.mcool file
    cool_file: PathBuf,
    /// Path to the tab-delimited CTCF peak file (header with chrom, start, end)
    ctcf_peaks: PathBuf,
    /// Path to the output boundary table
    out_path: PathBuf,
    /// Resolution of the .cool file in bp
    #[arg(long, default_value_t = DEFAULT_RESOLUTION)]
    resolution: u64,
    /// Number of processes for the insulation scorer
    #[arg(long, default_value_t = DEFAULT_NPROC)]
    nproc: usize,
    /// Genome assembly name
    #[arg(long, default_value = DEFAULT_GENOME)]
    genome: String,
    /// Directory with <genome>.chrom.sizes and <genome>.centromeres.tsv
    #[arg(long, env = "CTCF_BOUNDARIES_GENOME_DIR", default_value = "genomes")]
    genome_dir: PathBuf,
    /// Keep unplaced and alternate contigs from chrom.sizes
    #[arg(long)]
    all_chroms: bool,
    /// cooler executable
    #[arg(long, default_value = "cooler")]
    cooler: String,
    /// cooltools executable
    #[arg(long, default_value = "cooltools")]
    cooltools: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let start = Instant::now();

    let store = CoolerCli::new(cli.cooler);
    let genome = AssemblyDir::new(cli.genome_dir).primary_only(!cli.all_chroms);
    let scorer = CooltoolsCli::new(cli.cooltools);
    let config = PipelineConfig {
        resolution: cli.resolution,
        nproc: cli.nproc,
        genome: cli.genome,
    };
    let caller = BoundaryCaller::new(&store, &genome, &scorer, config);

    eprintln!(
        "Calling CTCF boundaries: {:?} + {:?} -> {:?}",
        cli.cool_file, cli.ctcf_peaks, cli.out_path
    );
    let stats = caller
        .run(&cli.cool_file, Some(&cli.ctcf_peaks), &cli.out_path)
        .with_context(|| format!("Failed to call boundaries for {:?}", cli.cool_file))?;

    eprintln!("\n=== Boundary Statistics ===");
    eprintln!("Window:          {} bp", stats.window);
    eprintln!("View arms:       {}", stats.arms);
    eprintln!("CTCF peaks:      {}", stats.peaks);
    eprintln!("Scored bins:     {}", stats.bins);
    eprintln!("Boundaries:      {}", stats.boundaries);
    eprintln!("CTCF-supported:  {}", stats.ctcf_supported);
    eprintln!("Written:         {}", stats.written);
    eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}
