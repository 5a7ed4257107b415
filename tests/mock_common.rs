#![allow(dead_code)]

use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;

use yield_engine::config::EngineConfig;
use yield_engine::venues::{FundingInterval, RateVenue, Symbol};

/// Nothing listens on port 1, so requests there fail fast.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

/// Mock venue with a fixed per-interval rate, optional failure and delay.
pub struct MockVenue {
    pub name: String,
    pub interval: FundingInterval,
    pub rate: Option<f64>,
    pub delay: Duration,
}

impl MockVenue {
    pub fn eight_hourly(name: &str, rate: f64) -> Box<dyn RateVenue> {
        Box::new(Self {
            name: name.to_string(),
            interval: FundingInterval::EightHourly,
            rate: Some(rate),
            delay: Duration::ZERO,
        })
    }

    pub fn hourly(name: &str, rate: f64) -> Box<dyn RateVenue> {
        Box::new(Self {
            name: name.to_string(),
            interval: FundingInterval::Hourly,
            rate: Some(rate),
            delay: Duration::ZERO,
        })
    }

    /// Quotes an 8h rate whose annualized value is `annual`.
    pub fn annualized(name: &str, annual: f64) -> Box<dyn RateVenue> {
        Self::eight_hourly(name, annual / 1095.0)
    }

    pub fn failing(name: &str) -> Box<dyn RateVenue> {
        Box::new(Self {
            name: name.to_string(),
            interval: FundingInterval::EightHourly,
            rate: None,
            delay: Duration::ZERO,
        })
    }

    pub fn slow(name: &str, rate: f64, delay: Duration) -> Box<dyn RateVenue> {
        Box::new(Self {
            name: name.to_string(),
            interval: FundingInterval::EightHourly,
            rate: Some(rate),
            delay,
        })
    }
}

#[async_trait]
impl RateVenue for MockVenue {
    fn name(&self) -> &str {
        &self.name
    }

    fn interval(&self) -> FundingInterval {
        self.interval
    }

    async fn fetch_rate(&self, _client: &reqwest::Client, _symbol: &Symbol) -> Result<f64> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.rate {
            Some(rate) => Ok(rate),
            None => bail!("{} unavailable", self.name),
        }
    }
}

/// Config whose external collaborators are all unreachable, with the spread
/// and turnover terms zeroed.
pub fn offline_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.venue_timeout_secs = 1;
    config.staking.sma_url = format!("{UNREACHABLE}/sma");
    config.staking.last_url = format!("{UNREACHABLE}/last");
    config.staking.timeout_secs = 1;
    config.benchmark.api_url = format!("{UNREACHABLE}/info");
    config.benchmark.timeout_secs = 1;
    config.strategy.spread_edge = 0.0;
    config.strategy.turnover_rate = 0.0;
    config
}
