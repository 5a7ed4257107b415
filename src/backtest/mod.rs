pub mod metrics;
pub mod result;
pub mod series;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::config::EngineConfig;
use crate::engine::Engine;

use result::BacktestResult;

/// Longest benchmark history a single backtest may ask for.
pub const MAX_BACKTEST_DAYS: u32 = 1825;

/// Reject history lengths outside `1..=MAX_BACKTEST_DAYS`.
pub fn check_days(days: u32) -> Result<u32> {
    if days == 0 || days > MAX_BACKTEST_DAYS {
        bail!("days must be between 1 and {MAX_BACKTEST_DAYS}, got {days}");
    }
    Ok(days)
}

/// Configuration for a CLI backtest run.
pub struct BacktestConfig {
    pub config_path: Option<PathBuf>,
    /// Overrides the configured benchmark history length.
    pub days: Option<u32>,
    pub output: Option<PathBuf>,
}

/// Run a backtest from the CLI.
pub fn run(config: &BacktestConfig) -> Result<()> {
    let engine_config = EngineConfig::load(config.config_path.as_deref())?;
    let days = check_days(config.days.unwrap_or(engine_config.benchmark.days))?;
    let engine = Engine::new(engine_config)?;

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    let result = rt.block_on(engine.backtest(days))?;

    BacktestResult::print_table(std::slice::from_ref(&result));

    if let Some(ref output_path) = config.output {
        let json = serde_json::to_string_pretty(&result).context("serializing backtest result")?;
        std::fs::write(output_path, json)
            .with_context(|| format!("writing {}", output_path.display()))?;
        println!("  Wrote {}", output_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_days() {
        assert_eq!(check_days(1).unwrap(), 1);
        assert_eq!(check_days(MAX_BACKTEST_DAYS).unwrap(), MAX_BACKTEST_DAYS);
        assert!(check_days(0).is_err());
        assert!(check_days(MAX_BACKTEST_DAYS + 1).is_err());
        assert!(check_days(200_000_000).is_err());
    }

    #[test]
    fn test_run_rejects_out_of_range_days() {
        let config = BacktestConfig {
            config_path: None,
            days: Some(200_000_000),
            output: None,
        };
        let err = run(&config).unwrap_err();
        assert!(err.to_string().contains("days must be between"));
    }
}
