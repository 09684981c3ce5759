//! Simulate command implementation.
//!
//! Estimates return statistics, runs the Monte Carlo engine and reports VaR.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use mcvar_risk::{run_seeded_simulation, SimulationSummary};

use crate::cli::OutputFormat;
use crate::commands::{resolve, PortfolioArgs, SimulationArgs};
use crate::output::{bar_chart, format_money, print_header, print_info, print_output, KeyValue};

/// Arguments for the simulate command.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub portfolio: PortfolioArgs,

    #[command(flatten)]
    pub simulation: SimulationArgs,

    /// Number of bins in the final-value histogram
    #[arg(long, default_value = "30")]
    pub bins: usize,

    /// Hide the final-value histogram
    #[arg(long)]
    pub no_histogram: bool,
}

/// One row of CSV output.
#[derive(Debug, Serialize, Tabled)]
struct VarRow {
    confidence_level: f64,
    days: usize,
    simulations: usize,
    initial_value: f64,
    tail_value: f64,
    var: f64,
}

/// Execute the simulate command.
pub fn execute(args: SimulateArgs, format: OutputFormat) -> Result<()> {
    let run = resolve(&args.portfolio, &args.simulation)?;
    let config = &run.simulation;
    let portfolio = run.portfolio();
    config.validate_confidence()?;

    let paths = run_seeded_simulation(&portfolio, config)?;
    let summary = SimulationSummary::with_bins(
        &paths,
        config.confidence_level,
        config.initial_value,
        args.bins,
    )?;

    match format {
        OutputFormat::Table => {
            let settings = vec![
                KeyValue::new("Assets", run.statistics.assets.join(", ")),
                KeyValue::new(
                    "Portfolio Weights",
                    run.weights
                        .iter()
                        .map(|w| format!("{}", w))
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
                KeyValue::new("Start Date", run.window.0.to_string()),
                KeyValue::new("End Date", run.window.1.to_string()),
                KeyValue::new(
                    "Observations",
                    run.statistics.n_observations().to_string(),
                ),
                KeyValue::from_money("Initial Portfolio Value", config.initial_value),
                KeyValue::new("Days to Simulate", config.days.to_string()),
                KeyValue::new("Number of Simulations", config.simulations.to_string()),
                KeyValue::from_percent("Confidence Level", config.confidence_level),
                KeyValue::from_percent("Risk Level", config.risk_level()),
                KeyValue::new(
                    "Seed",
                    config
                        .seed
                        .map_or_else(|| "random".to_string(), |s| s.to_string()),
                ),
            ];
            print_header("Simulation and Data Settings");
            print_output(&settings, format)?;

            let results = vec![
                KeyValue::from_money("Value at Risk (VaR)", summary.var.var),
                KeyValue::from_money("Tail Ending Value", summary.var.tail_value),
                KeyValue::from_money("Mean Ending Value", summary.mean_final),
                KeyValue::from_money("Median Ending Value", summary.median_final),
                KeyValue::from_money("Worst Ending Value", summary.min_final),
                KeyValue::from_money("Best Ending Value", summary.max_final),
            ];
            print_header("Results");
            print_output(&results, format)?;

            if !args.no_histogram {
                print_header("Distribution of Final Portfolio Values");
                let rows: Vec<(String, usize)> = summary
                    .histogram
                    .iter()
                    .map(|b| (format_money(b.lower), b.count))
                    .collect();
                println!("{}", bar_chart(&rows, 40));
            }

            println!();
            print_info(&summary.interpretation());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Csv => {
            let row = VarRow {
                confidence_level: summary.var.confidence_level,
                days: summary.var.horizon_days,
                simulations: summary.var.simulations,
                initial_value: summary.var.initial_value,
                tail_value: summary.var.tail_value,
                var: summary.var.var,
            };
            print_output(&[row], format)?;
        }
        OutputFormat::Minimal => {
            println!("{:.2}", summary.var.var);
        }
    }

    Ok(())
}
