pub mod report;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::backtest::check_days;
use crate::backtest::metrics::RiskMetrics;
use crate::backtest::result::BacktestResult;
use crate::backtest::series::generate_series;
use crate::benchmark;
use crate::config::EngineConfig;
use crate::model::{ExpectedYield, ModelError, YieldModelParams, expected_yield};
use crate::staking::{self, StakingYield};
use crate::venues::{self, AggregatedRate, RateVenue, Symbol, VenueQuote};

pub use report::ApyReport;

/// Everything one pass of the yield pipeline observed and derived.
#[derive(Debug, Clone)]
pub struct YieldSnapshot {
    /// Per-venue results in venue order; `None` where a venue had no data.
    pub quotes: Vec<Option<VenueQuote>>,
    pub funding: AggregatedRate,
    pub staking: StakingYield,
    pub params: YieldModelParams,
    pub expected: ExpectedYield,
}

/// Runs the venue fetch → aggregate → yield model pipeline, and the
/// backtest built on top of it.
///
/// Holds no mutable state; one engine can serve concurrent requests.
pub struct Engine {
    pub config: EngineConfig,
    pub venues: Vec<Box<dyn RateVenue>>,
    client: reqwest::Client,
}

impl Engine {
    /// Build an engine with the venues listed in `config`.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let venues = venues::build_all(&config.venues);
        Self::with_venues(config, venues)
    }

    pub fn with_venues(config: EngineConfig, venues: Vec<Box<dyn RateVenue>>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.venue_timeout())
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            config,
            venues,
            client,
        })
    }

    /// Query all venues and the staking source, then run the yield model.
    ///
    /// Only a model failure is reported as an error; venue and staking
    /// outages degrade to "no data" and the fallback yield respectively.
    pub async fn snapshot(&self) -> Result<YieldSnapshot, ModelError> {
        let quotes_fut = self.fetch_quotes();
        let staking_fut = staking::fetch_staking_yield(&self.client, &self.config.staking);
        let (quotes, staking) = tokio::join!(quotes_fut, staking_fut);

        let funding = venues::aggregate(&quotes);
        if !funding.has_venue() {
            tracing::warn!("no venue returned a funding rate, using 0");
        } else if funding.best_venue_annual_rate < 0.0 {
            tracing::info!(
                venue = %funding.best_venue,
                rate = funding.best_venue_annual_rate,
                "best funding rate is negative, flooring at 0"
            );
        }

        let params =
            YieldModelParams::from_strategy(&self.config.strategy, funding.usable_rate(), staking.value);
        let expected = expected_yield(&params, &funding)?;

        tracing::debug!(
            venue = %expected.best_venue,
            apy = expected.apy_simple,
            staking = staking.value,
            "computed expected yield"
        );

        Ok(YieldSnapshot {
            quotes,
            funding,
            staking,
            params,
            expected,
        })
    }

    /// The JSON payload served for an APY request.
    pub async fn apy_report(&self) -> Result<ApyReport, ModelError> {
        let snapshot = self.snapshot().await?;
        Ok(ApyReport::from_snapshot(&snapshot, Utc::now()))
    }

    /// Generate the strategy series against `days` of benchmark history and
    /// compute its risk metrics.
    pub async fn backtest(&self, days: u32) -> Result<BacktestResult> {
        let days = check_days(days)?;
        let snapshot = self.snapshot().await.context("computing expected yield")?;

        let mut bench_config = self.config.benchmark.clone();
        bench_config.days = days;
        let bench = benchmark::load_benchmark(&self.client, &bench_config, Utc::now()).await;

        let series = generate_series(&bench.prices(), &snapshot.params, &self.config.series)
            .context("generating strategy series")?;
        let metrics = RiskMetrics::compute(&series, &self.config.risk);

        Ok(BacktestResult {
            label: format!("{} delta-neutral {:.1}x", self.config.asset, snapshot.params.leverage),
            benchmark_source: bench.source,
            expected_yield: snapshot.expected,
            metrics,
            series,
        })
    }

    async fn fetch_quotes(&self) -> Vec<Option<VenueQuote>> {
        match Symbol::parse(&self.config.asset, &self.config.allowed_assets) {
            Ok(symbol) => {
                venues::fetch_all(&self.venues, &self.client, &symbol, self.config.venue_timeout()).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "refusing to query venues");
                vec![None; self.venues.len()]
            }
        }
    }
}
