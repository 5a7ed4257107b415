use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;

use super::{FundingInterval, RateVenue, Symbol, parse_rate};

const API_URL: &str = "https://api.bybit.com/v5/market/tickers";

#[derive(Debug, Deserialize)]
struct TickersResponse {
    #[serde(rename = "retCode")]
    ret_code: i64,
    #[serde(rename = "retMsg", default)]
    ret_msg: String,
    result: Option<TickersResult>,
}

#[derive(Debug, Deserialize)]
struct TickersResult {
    #[serde(default)]
    list: Vec<Ticker>,
}

#[derive(Debug, Deserialize)]
struct Ticker {
    symbol: String,
    #[serde(rename = "fundingRate")]
    funding_rate: String,
}

/// Bybit linear perpetuals. Funding settles every 8 hours.
pub struct Bybit {
    pub api_url: String,
}

impl Default for Bybit {
    fn default() -> Self {
        Self {
            api_url: API_URL.to_string(),
        }
    }
}

#[async_trait]
impl RateVenue for Bybit {
    fn name(&self) -> &str {
        "bybit"
    }

    fn interval(&self) -> FundingInterval {
        FundingInterval::EightHourly
    }

    async fn fetch_rate(&self, client: &reqwest::Client, symbol: &Symbol) -> Result<f64> {
        let market = format!("{}USDT", symbol.as_str());
        let resp = client
            .get(&self.api_url)
            .query(&[("category", "linear"), ("symbol", market.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<TickersResponse>()
            .await
            .context("decoding tickers")?;
        extract_funding(&resp, &market)
    }
}

fn extract_funding(resp: &TickersResponse, market: &str) -> Result<f64> {
    if resp.ret_code != 0 {
        bail!("bybit error {}: {}", resp.ret_code, resp.ret_msg);
    }
    let ticker = resp
        .result
        .as_ref()
        .and_then(|r| r.list.iter().find(|t| t.symbol == market))
        .with_context(|| format!("{market} not listed on bybit"))?;
    parse_rate("fundingRate", &ticker.funding_rate)
}
