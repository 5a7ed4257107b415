use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{FundingInterval, RateVenue, Symbol, parse_rate};

const API_URL: &str = "https://api.hyperliquid.xyz/info";

// ── API response types ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Meta {
    universe: Vec<AssetMeta>,
}

#[derive(Debug, Deserialize)]
struct AssetMeta {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AssetCtx {
    funding: String,
}

/// `metaAndAssetCtxs` returns `[meta, ctxs]`, index-aligned by asset.
type MetaAndAssetCtxs = (Meta, Vec<AssetCtx>);

// ── Venue ────────────────────────────────────────────────────────────

/// Hyperliquid perps. Funding settles every hour.
pub struct Hyperliquid {
    pub api_url: String,
}

impl Default for Hyperliquid {
    fn default() -> Self {
        Self {
            api_url: API_URL.to_string(),
        }
    }
}

#[async_trait]
impl RateVenue for Hyperliquid {
    fn name(&self) -> &str {
        "hyperliquid"
    }

    fn interval(&self) -> FundingInterval {
        FundingInterval::Hourly
    }

    async fn fetch_rate(&self, client: &reqwest::Client, symbol: &Symbol) -> Result<f64> {
        let body = serde_json::json!({ "type": "metaAndAssetCtxs" });
        let resp = client
            .post(&self.api_url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<MetaAndAssetCtxs>()
            .await
            .context("decoding metaAndAssetCtxs")?;
        extract_funding(&resp, symbol)
    }
}

fn extract_funding((meta, ctxs): &MetaAndAssetCtxs, symbol: &Symbol) -> Result<f64> {
    let idx = meta
        .universe
        .iter()
        .position(|a| a.name == symbol.as_str())
        .with_context(|| format!("{} not listed on hyperliquid", symbol.as_str()))?;
    let ctx = ctxs
        .get(idx)
        .with_context(|| format!("no asset context at index {idx}"))?;
    parse_rate("funding", &ctx.funding)
}
