use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;

use super::{FundingInterval, RateVenue, Symbol, parse_rate};

const API_URL: &str = "https://www.okx.com/api/v5/public/funding-rate";

#[derive(Debug, Deserialize)]
struct FundingResponse {
    code: String,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Vec<FundingEntry>,
}

#[derive(Debug, Deserialize)]
struct FundingEntry {
    #[serde(rename = "instId")]
    inst_id: String,
    #[serde(rename = "fundingRate")]
    funding_rate: String,
}

/// OKX USDT-margined swaps. Funding settles every 8 hours.
pub struct Okx {
    pub api_url: String,
}

impl Default for Okx {
    fn default() -> Self {
        Self {
            api_url: API_URL.to_string(),
        }
    }
}

#[async_trait]
impl RateVenue for Okx {
    fn name(&self) -> &str {
        "okx"
    }

    fn interval(&self) -> FundingInterval {
        FundingInterval::EightHourly
    }

    async fn fetch_rate(&self, client: &reqwest::Client, symbol: &Symbol) -> Result<f64> {
        let inst_id = format!("{}-USDT-SWAP", symbol.as_str());
        let resp = client
            .get(&self.api_url)
            .query(&[("instId", inst_id.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<FundingResponse>()
            .await
            .context("decoding funding-rate")?;
        extract_funding(&resp, &inst_id)
    }
}

fn extract_funding(resp: &FundingResponse, inst_id: &str) -> Result<f64> {
    if resp.code != "0" {
        bail!("okx error {}: {}", resp.code, resp.msg);
    }
    let entry = resp
        .data
        .iter()
        .find(|e| e.inst_id == inst_id)
        .with_context(|| format!("{inst_id} not listed on okx"))?;
    parse_rate("fundingRate", &entry.funding_rate)
}
