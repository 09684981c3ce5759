//! Stats command implementation.
//!
//! Shows the statistics the simulation would be driven by.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::commands::{resolve, PortfolioArgs, SimulationArgs};
use crate::output::{print_header, print_output};

/// Arguments for the stats command.
#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub portfolio: PortfolioArgs,
}

#[derive(Debug, Serialize, Tabled)]
struct AssetRow {
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Weight")]
    weight: f64,
    #[tabled(rename = "Mean Daily Return")]
    mean_return: f64,
    #[tabled(rename = "Daily Volatility")]
    volatility: f64,
}

#[derive(Debug, Serialize)]
struct StatsOutput<'a> {
    assets: &'a [String],
    mean_returns: &'a [f64],
    covariance: Vec<Vec<f64>>,
    observations: usize,
}

/// Execute the stats command.
pub fn execute(args: StatsArgs, format: OutputFormat) -> Result<()> {
    let run = resolve(&args.portfolio, &SimulationArgs::default())?;
    run.portfolio().validate(run.simulation.weight_policy)?;
    let stats = &run.statistics;
    let n = stats.n_assets();

    let covariance: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| stats.covariance[(i, j)]).collect())
        .collect();

    match format {
        OutputFormat::Json => {
            let output = StatsOutput {
                assets: &stats.assets,
                mean_returns: &stats.mean_returns,
                covariance,
                observations: stats.n_observations(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            let rows: Vec<AssetRow> = stats
                .assets
                .iter()
                .zip(&run.weights)
                .zip(stats.mean_returns.iter().zip(stats.volatilities()))
                .map(|((asset, weight), (mean_return, volatility))| AssetRow {
                    asset: asset.clone(),
                    weight: *weight,
                    mean_return: *mean_return,
                    volatility,
                })
                .collect();

            if format == OutputFormat::Table {
                print_header(&format!(
                    "Return Statistics ({} to {}, {} observations)",
                    run.window.0,
                    run.window.1,
                    stats.n_observations()
                ));
            }
            print_output(&rows, format)?;

            if format == OutputFormat::Table {
                print_header("Covariance Matrix");
                for (asset, row) in stats.assets.iter().zip(&covariance) {
                    let cells: Vec<String> = row.iter().map(|v| format!("{:>12.3e}", v)).collect();
                    println!("{:<8}{}", asset, cells.join(" "));
                }
            }
        }
    }

    Ok(())
}
