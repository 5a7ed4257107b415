use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{FundingInterval, RateVenue, Symbol, parse_rate};

const API_URL: &str = "https://indexer.dydx.trade/v4/perpetualMarkets";

#[derive(Debug, Deserialize)]
struct MarketsResponse {
    markets: HashMap<String, Market>,
}

#[derive(Debug, Deserialize)]
struct Market {
    #[serde(rename = "nextFundingRate")]
    next_funding_rate: String,
}

/// dYdX v4 indexer. Funding settles every hour.
pub struct Dydx {
    pub api_url: String,
}

impl Default for Dydx {
    fn default() -> Self {
        Self {
            api_url: API_URL.to_string(),
        }
    }
}

#[async_trait]
impl RateVenue for Dydx {
    fn name(&self) -> &str {
        "dydx"
    }

    fn interval(&self) -> FundingInterval {
        FundingInterval::Hourly
    }

    async fn fetch_rate(&self, client: &reqwest::Client, symbol: &Symbol) -> Result<f64> {
        let ticker = format!("{}-USD", symbol.as_str());
        let resp = client
            .get(&self.api_url)
            .query(&[("ticker", ticker.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<MarketsResponse>()
            .await
            .context("decoding perpetualMarkets")?;
        extract_funding(&resp, &ticker)
    }
}

fn extract_funding(resp: &MarketsResponse, ticker: &str) -> Result<f64> {
    let market = resp
        .markets
        .get(ticker)
        .with_context(|| format!("{ticker} not listed on dydx"))?;
    parse_rate("nextFundingRate", &market.next_funding_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_funding() {
        let raw = r#"{"markets":{"ETH-USD":{"ticker":"ETH-USD","status":"ACTIVE","nextFundingRate":"0.0000081"}}}"#;
        let resp: MarketsResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_funding(&resp, "ETH-USD").unwrap(), 0.0000081);
        assert!(extract_funding(&resp, "BTC-USD").is_err());
    }
}
