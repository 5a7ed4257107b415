use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{FundingInterval, RateVenue, Symbol, parse_rate};

const API_URL: &str = "https://fapi.binance.com/fapi/v1/premiumIndex";

#[derive(Debug, Deserialize)]
struct PremiumIndex {
    symbol: String,
    #[serde(rename = "lastFundingRate")]
    last_funding_rate: String,
}

/// Binance USDⓈ-M futures. Funding settles every 8 hours.
pub struct Binance {
    pub api_url: String,
}

impl Default for Binance {
    fn default() -> Self {
        Self {
            api_url: API_URL.to_string(),
        }
    }
}

#[async_trait]
impl RateVenue for Binance {
    fn name(&self) -> &str {
        "binance"
    }

    fn interval(&self) -> FundingInterval {
        FundingInterval::EightHourly
    }

    async fn fetch_rate(&self, client: &reqwest::Client, symbol: &Symbol) -> Result<f64> {
        let market = format!("{}USDT", symbol.as_str());
        let resp = client
            .get(&self.api_url)
            .query(&[("symbol", market.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<PremiumIndex>()
            .await
            .context("decoding premiumIndex")?;
        extract_funding(&resp, &market)
    }
}

fn extract_funding(resp: &PremiumIndex, market: &str) -> Result<f64> {
    if resp.symbol != market {
        anyhow::bail!("binance returned {} for {market}", resp.symbol);
    }
    parse_rate("lastFundingRate", &resp.last_funding_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_funding() {
        let raw = r#"{"symbol":"ETHUSDT","markPrice":"3000.1","lastFundingRate":"0.00010000","nextFundingTime":1700000000000}"#;
        let resp: PremiumIndex = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_funding(&resp, "ETHUSDT").unwrap(), 0.0001);
        assert!(extract_funding(&resp, "BTCUSDT").is_err());
    }

    #[test]
    fn test_malformed_payload() {
        assert!(serde_json::from_str::<PremiumIndex>(r#"{"code":-1121,"msg":"Invalid symbol."}"#).is_err());

        let raw = r#"{"symbol":"ETHUSDT","lastFundingRate":""}"#;
        let resp: PremiumIndex = serde_json::from_str(raw).unwrap();
        assert!(extract_funding(&resp, "ETHUSDT").is_err());
    }
}
