use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use portstat_core::{
    AssetMetricsRequest, Statistic, StatisticRequest, TensorStore, evaluate,
    evaluate_asset_metrics, evaluate_path_summary,
};
use serde::Serialize;

mod dataset;
mod logging;

use dataset::{load_dataset, load_request};
use logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "portstat")]
#[command(about = "Risk and return statistics over simulated asset returns")]
struct Args {
    /// Path to the JSON dataset of simulated returns
    #[arg(short, long)]
    dataset: PathBuf,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the assets and categories in the dataset
    Assets,
    /// Evaluate one statistic (e.g. sharpe_ratio, value_at_risk)
    Stat {
        /// Statistic name
        #[arg(value_parser = |s: &str| s.parse::<Statistic>())]
        statistic: Statistic,

        /// YAML request file; defaults apply when omitted
        #[arg(short, long)]
        request: Option<PathBuf>,
    },
    /// Per-asset metrics and the correlation matrix
    AssetMetrics {
        /// YAML request file; defaults apply when omitted
        #[arg(short, long)]
        request: Option<PathBuf>,
    },
    /// Per-simulation summary of the portfolio paths
    Paths {
        /// YAML statistic request file; defaults apply when omitted
        #[arg(short, long)]
        request: Option<PathBuf>,
    },
}

fn print_json<T: Serialize>(value: &T) -> color_eyre::Result<()> {
    let json = serde_json::to_string_pretty(value).wrap_err("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level);

    let store = TensorStore::new();
    let universe = load_dataset(&args.dataset)
        .wrap_err_with(|| format!("Failed to load dataset {}", args.dataset.display()))?;
    store.initialize(universe)?;

    match args.command {
        Command::Assets => {
            let universe = store.get_tensor()?;
            print_json(&universe.listing())?;
        }
        Command::Stat { statistic, request } => {
            let request: StatisticRequest = load_request(request.as_deref())?;
            let response = evaluate(&store, statistic, &request)
                .wrap_err_with(|| format!("Failed to evaluate {statistic}"))?;
            tracing::info!(
                statistic = statistic.as_str(),
                n_assets_used = response.n_assets_used,
                "Statistic evaluated"
            );
            print_json(&response)?;
        }
        Command::AssetMetrics { request } => {
            let request: AssetMetricsRequest = load_request(request.as_deref())?;
            let report = evaluate_asset_metrics(&store, &request)
                .wrap_err("Failed to compute asset metrics")?;
            tracing::info!(n_assets_used = report.n_assets_used, "Asset metrics computed");
            print_json(&report)?;
        }
        Command::Paths { request } => {
            let request: StatisticRequest = load_request(request.as_deref())?;
            let summary = evaluate_path_summary(&store, &request)
                .wrap_err("Failed to summarize portfolio paths")?;
            tracing::info!(
                simulations = summary.total_return.len(),
                "Portfolio paths summarized"
            );
            print_json(&summary)?;
        }
    }

    Ok(())
}
