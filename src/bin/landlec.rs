use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use landlec::core::{Grid, LecProcessor};
use landlec::io::{CsvOptions, GridReader, LecWriter, VtkWriter};
use landlec::types::{LecConfig, DEFAULT_SEA_LEVEL};

/// Compute landscape elevational connectivity over a regular elevation grid
#[derive(Debug, Parser)]
#[command(name = "landlec", version, about)]
struct Cli {
    /// Input grid as X Y Z rows, no header
    #[arg(short, long)]
    input: String,

    /// Output CSV path (X Y Z LEC rows)
    #[arg(short, long)]
    output: String,

    /// Also write a VTK structured grid to this path
    #[arg(long)]
    vtk: Option<String>,

    /// Field delimiter for the input file (default: whitespace)
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Wrap opposite grid edges
    #[arg(long)]
    periodic: bool,

    /// Mirror adjacency at grid edges
    #[arg(long)]
    symmetric: bool,

    /// Disable diagonal (8-connectivity) moves
    #[arg(long)]
    no_diagonals: bool,

    /// Niche half-width as a fraction of the elevation range
    #[arg(long, default_value_t = 0.1)]
    sigmap: f64,

    /// Fixed niche half-width in elevation units (overrides --sigmap)
    #[arg(long)]
    sigmav: Option<f64>,

    /// Sea level; nodes below it are excluded from the computation
    #[arg(long, default_value_t = DEFAULT_SEA_LEVEL)]
    sea_level: f64,

    /// Worker threads (default: one per logical CPU)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Print an elevation-vs-LEC profile with this many bins
    #[arg(long)]
    profile_bins: Option<usize>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = LecConfig::from_options(
        cli.periodic,
        cli.symmetric,
        cli.sigmap,
        cli.sigmav,
        !cli.no_diagonals,
        cli.sea_level,
        cli.workers,
    )?;

    let options = CsvOptions {
        delimiter: cli.delimiter,
    };
    let records = GridReader::read_records(&cli.input, &options)
        .with_context(|| format!("failed to read grid from {}", cli.input))?;
    let grid = Grid::from_records(&records, config.boundary, config.sea_level)?;

    let mut processor = LecProcessor::new(grid, config)?;
    processor.compute()?;

    let summary = processor.summary()?;
    log::info!(
        "LEC range [{:.6}, {:.6}], mean {:.6} over {} nodes",
        summary.min,
        summary.max,
        summary.mean,
        summary.computed
    );

    if let Some(nbins) = cli.profile_bins {
        for bin in processor.elevation_profile(nbins)? {
            println!(
                "{:12.3} {:12.3} {:14.6} {:8}",
                bin.lo, bin.hi, bin.mean_lec, bin.count
            );
        }
    }

    let lec = processor.lec()?;
    LecWriter::write_csv(&cli.output, processor.grid(), lec)
        .with_context(|| format!("failed to write {}", cli.output))?;

    if let Some(vtk_path) = &cli.vtk {
        VtkWriter::write_structured_grid(vtk_path, processor.grid(), lec)
            .with_context(|| format!("failed to write {}", vtk_path))?;
    }

    Ok(())
}
