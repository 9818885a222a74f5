pub mod config;
pub mod csv_source;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod simulator;
pub mod types;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use arb_solver_core::{BellmanFordSolver, RateGraph};
use common::types::CurrencyIndex;
use csv_source::CsvRateSource;
use error::Error;
use orchestrator::Orchestrator;
use report::{CycleSink, JsonReportSink, LogSink};
use simulator::SimulatedRateSource;
use types::{DataSource, RateSource};

/// Detects currency arbitrage cycles in a rate matrix.
#[derive(Debug, Parser)]
#[command(name = "executor", version)]
struct Cli {
    /// Config file; defaults to crates/executor/Config.toml under the working directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    source: Option<DataSource>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match crate::config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    config.logging.init();

    let source = cli.source.unwrap_or(DataSource::Sim);
    if let Err(e) = run(&source, &config).await {
        error!(error = %e, "Pipeline failed");
        std::process::exit(1);
    }

    info!("Pipeline shut down.");
}

async fn run(source: &DataSource, config: &Config) -> Result<(), Error> {
    let currencies = CurrencyIndex::new(config.market.currencies.clone())?;

    let rates = rate_source(source, config).fetch(&currencies).await?;
    let graph = Arc::new(RateGraph::new(currencies, rates)?);

    let solver = BellmanFordSolver::new(config.detector.extraction);
    let orchestrator = Orchestrator::new(
        Arc::clone(&graph),
        solver,
        config.detector.threshold_pct,
        config.detector.parallel,
    );
    let results = orchestrator.scan_all().await?;

    let mut sinks: Vec<Box<dyn CycleSink>> = vec![Box::new(LogSink)];
    if let Some(path) = &config.report.json_path {
        sinks.push(Box::new(JsonReportSink::new(path.clone())));
    }
    for sink in &sinks {
        sink.present(graph.currencies(), graph.rates(), &results)?;
    }

    Ok(())
}

fn rate_source(source: &DataSource, config: &Config) -> Box<dyn RateSource> {
    match source {
        DataSource::Sim => {
            info!("Using simulated rate source");
            Box::new(SimulatedRateSource::new(config.simulator.clone()))
        }
        DataSource::Csv { path } => {
            info!(path = %path.display(), "Using CSV rate source");
            Box::new(CsvRateSource::new(path.clone()))
        }
    }
}
