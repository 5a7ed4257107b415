use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use yield_engine::config::EngineConfig;
use yield_engine::engine::Engine;
use yield_engine::{api, backtest};

mod cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Serve { host, port, config } => {
            let engine = build_engine(config.as_deref())?;
            runtime()?.block_on(api::serve(&host, port, engine))
        }
        cli::Command::Apy { config } => {
            let engine = build_engine(config.as_deref())?;
            let report = runtime()?.block_on(engine.apy_report())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        cli::Command::Backtest {
            config,
            days,
            output,
        } => backtest::run(&backtest::BacktestConfig {
            config_path: config,
            days,
            output,
        }),
    }
}

fn build_engine(config_path: Option<&Path>) -> Result<Engine> {
    let config = EngineConfig::load(config_path)?;
    Engine::new(config)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("creating tokio runtime")
}
