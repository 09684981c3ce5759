//! Paths command implementation.
//!
//! Writes the full trajectory matrix: one row per day, one column per trial.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use mcvar_risk::{run_seeded_simulation, TrajectoryMatrix};

use crate::commands::{resolve, PortfolioArgs, SimulationArgs};

/// Arguments for the paths command.
#[derive(Args, Debug)]
pub struct PathsArgs {
    #[command(flatten)]
    pub portfolio: PortfolioArgs,

    #[command(flatten)]
    pub simulation: SimulationArgs,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Append a column with the cross-trial mean path
    #[arg(long)]
    pub mean: bool,
}

/// Execute the paths command.
pub fn execute(args: PathsArgs) -> Result<()> {
    let run = resolve(&args.portfolio, &args.simulation)?;
    let paths = run_seeded_simulation(&run.portfolio(), &run.simulation)?;

    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            write_paths(&paths, args.mean, file)?;
            info!(path = %path.display(), days = paths.days(), simulations = paths.simulations(), "wrote paths");
        }
        None => write_paths(&paths, args.mean, std::io::stdout().lock())?,
    }

    Ok(())
}

fn write_paths<W: Write>(paths: &TrajectoryMatrix, with_mean: bool, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["day".to_string()];
    header.extend((0..paths.simulations()).map(|s| format!("sim_{}", s)));
    if with_mean {
        header.push("mean".to_string());
    }
    wtr.write_record(&header)?;

    let mean = if with_mean { paths.mean_path() } else { Vec::new() };

    for day in 0..paths.days() {
        let mut record = Vec::with_capacity(header.len());
        record.push((day + 1).to_string());
        record.extend((0..paths.simulations()).map(|s| paths.value(day, s).to_string()));
        if with_mean {
            record.push(mean[day].to_string());
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
