use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::config::StakingConfig;

// ── API response types ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SmaResponse {
    data: SmaData,
}

#[derive(Debug, Deserialize)]
struct SmaData {
    #[serde(rename = "smaApr")]
    sma_apr: f64,
}

#[derive(Debug, Deserialize)]
struct LastResponse {
    data: LastData,
}

#[derive(Debug, Deserialize)]
struct LastData {
    apr: f64,
}

// ── Public API ───────────────────────────────────────────────────────

/// Where the staking yield figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StakingSource {
    Sma,
    Last,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StakingYield {
    /// Annual fraction (0.035 = 3.5%).
    pub value: f64,
    pub source: StakingSource,
}

/// Fetch the staking APR, trying the smoothed endpoint first, then the last
/// observed value, then the configured fallback. Never fails.
pub async fn fetch_staking_yield(client: &reqwest::Client, config: &StakingConfig) -> StakingYield {
    let timeout = Duration::from_secs(config.timeout_secs);

    match fetch_sma(client, &config.sma_url, timeout).await {
        Ok(value) => {
            return StakingYield {
                value,
                source: StakingSource::Sma,
            };
        }
        Err(e) => tracing::warn!(error = %format!("{e:#}"), "staking SMA unavailable"),
    }

    match fetch_last(client, &config.last_url, timeout).await {
        Ok(value) => {
            return StakingYield {
                value,
                source: StakingSource::Last,
            };
        }
        Err(e) => tracing::warn!(error = %format!("{e:#}"), "staking last APR unavailable"),
    }

    tracing::info!(fallback = config.fallback_yield, "using fallback staking yield");
    StakingYield {
        value: config.fallback_yield,
        source: StakingSource::Fallback,
    }
}

// ── Internal helpers ─────────────────────────────────────────────────

async fn fetch_sma(client: &reqwest::Client, url: &str, timeout: Duration) -> Result<f64> {
    let resp = client
        .get(url)
        .timeout(timeout)
        .send()
        .await?
        .error_for_status()?
        .json::<SmaResponse>()
        .await
        .context("decoding SMA APR")?;
    percent_to_fraction(resp.data.sma_apr)
}

async fn fetch_last(client: &reqwest::Client, url: &str, timeout: Duration) -> Result<f64> {
    let resp = client
        .get(url)
        .timeout(timeout)
        .send()
        .await?
        .error_for_status()?
        .json::<LastResponse>()
        .await
        .context("decoding last APR")?;
    percent_to_fraction(resp.data.apr)
}

/// Endpoints report APR in percent.
fn percent_to_fraction(apr_pct: f64) -> Result<f64> {
    if !apr_pct.is_finite() || !(0.0..100.0).contains(&apr_pct) {
        bail!("implausible staking APR {apr_pct}%");
    }
    Ok(apr_pct / 100.0)
}
