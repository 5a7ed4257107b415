use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Funding-rate yield aggregator and backtest risk analytics for a
/// delta-neutral yield strategy.
#[derive(Parser)]
#[command(name = "yield-engine", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the APY and backtest endpoints over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Engine config JSON (defaults are used when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compute the projected APY once and print it as JSON
    Apy {
        /// Engine config JSON (defaults are used when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Backtest the strategy against historical benchmark prices
    Backtest {
        /// Engine config JSON (defaults are used when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Days of benchmark history (overrides the config)
        #[arg(long)]
        days: Option<u32>,

        /// Also write the full result, including the series, as JSON
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}
