use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::venues::VenueKind;

/// Engine-wide configuration. Every constant the pipeline depends on lives
/// here so callers (and tests) can override it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Asset whose funding rates are aggregated (e.g. "ETH").
    pub asset: String,
    /// Symbols adapters are allowed to put into outbound requests.
    pub allowed_assets: Vec<String>,
    /// Venues queried on every request, in tie-breaking order.
    pub venues: Vec<VenueKind>,
    /// Per-venue request timeout in seconds.
    pub venue_timeout_secs: u64,
    pub strategy: StrategyConfig,
    pub staking: StakingConfig,
    pub benchmark: BenchmarkConfig,
    pub series: SeriesConfig,
    pub risk: RiskConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            asset: "ETH".to_string(),
            allowed_assets: vec!["ETH".to_string(), "BTC".to_string(), "SOL".to_string()],
            venues: vec![
                VenueKind::Hyperliquid,
                VenueKind::Binance,
                VenueKind::Bybit,
                VenueKind::Okx,
                VenueKind::Dydx,
            ],
            venue_timeout_secs: 10,
            strategy: StrategyConfig::default(),
            staking: StakingConfig::default(),
            benchmark: BenchmarkConfig::default(),
            series: SeriesConfig::default(),
            risk: RiskConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn venue_timeout(&self) -> Duration {
        Duration::from_secs(self.venue_timeout_secs)
    }
}

/// Caller-side defaults for the yield model. The model itself has none.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub leverage: f64,
    /// Edge captured per turnover event, as a fraction.
    pub spread_edge: f64,
    /// Capture events per year.
    pub turnover_rate: f64,
    /// All-in annual cost drag (fees, slippage).
    pub cost_rate: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            leverage: 1.0,
            spread_edge: 0.0005,
            turnover_rate: 12.0,
            cost_rate: 0.01,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StakingConfig {
    /// Endpoint exposing a smoothed (SMA) APR, in percent.
    pub sma_url: String,
    /// Endpoint exposing the last observed APR, in percent.
    pub last_url: String,
    /// Used when both endpoints fail. Annual fraction.
    pub fallback_yield: f64,
    pub timeout_secs: u64,
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            sma_url: "https://eth-api.lido.fi/v1/protocol/steth/apr/sma".to_string(),
            last_url: "https://eth-api.lido.fi/v1/protocol/steth/apr/last".to_string(),
            fallback_yield: 0.035,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Hyperliquid coin used as the benchmark price series.
    pub coin: String,
    pub days: u32,
    pub api_url: String,
    pub timeout_secs: u64,
    /// First price of the synthetic fallback series.
    pub fallback_start_price: f64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            coin: "ETH".to_string(),
            days: 90,
            api_url: "https://api.hyperliquid.xyz/info".to_string(),
            timeout_secs: 10,
            fallback_start_price: 2500.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Value both series take at index 0.
    pub base_value: f64,
    /// Upper bound on the absolute per-day noise term.
    pub noise_amplitude: f64,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            base_value: 100.0,
            noise_amplitude: 0.0004,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub periods_per_year: f64,
    pub risk_free_rate: f64,
    /// Benchmark steps with |return| below this are excluded from beta.
    pub beta_noise_floor: f64,
    /// Minimum qualifying steps before beta is estimated at all.
    pub beta_min_steps: usize,
    /// Reported beta is clamped to [-bound, bound].
    pub beta_bound: f64,
    /// Below this R² the clamped beta is scaled down.
    pub beta_r2_threshold: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            periods_per_year: 365.0,
            risk_free_rate: 0.04,
            beta_noise_floor: 0.001,
            beta_min_steps: 11,
            beta_bound: 0.15,
            beta_r2_threshold: 0.05,
        }
    }
}
