pub mod aggregate;
pub mod binance;
pub mod bybit;
pub mod dydx;
pub mod hyperliquid;
pub mod okx;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use aggregate::{AggregatedRate, aggregate};

// ── Funding interval ────────────────────────────────────────────────

/// Native funding settlement interval of a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundingInterval {
    Hourly,
    EightHourly,
}

impl FundingInterval {
    pub fn hours(self) -> u32 {
        match self {
            FundingInterval::Hourly => 1,
            FundingInterval::EightHourly => 8,
        }
    }
}

// ── Quote ───────────────────────────────────────────────────────────

/// A normalized funding-rate quote from one venue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueQuote {
    pub venue_name: String,
    /// Rate paid per funding interval, as a fraction.
    pub raw_rate: f64,
    pub interval_hours: u32,
    /// `raw_rate * (24 / interval_hours) * 365`.
    pub annualized_rate: f64,
}

impl VenueQuote {
    /// Build a quote from a per-interval rate. Returns `None` when the rate or
    /// its annualized value is not finite.
    pub fn new(venue_name: &str, raw_rate: f64, interval: FundingInterval) -> Option<Self> {
        let annualized_rate = raw_rate * (24.0 / interval.hours() as f64) * 365.0;
        if !raw_rate.is_finite() || !annualized_rate.is_finite() {
            return None;
        }
        Some(Self {
            venue_name: venue_name.to_string(),
            raw_rate,
            interval_hours: interval.hours(),
            annualized_rate,
        })
    }
}

// ── Asset allow-list ────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum SymbolError {
    #[error("asset `{0}` is not in the allow-list")]
    NotAllowed(String),

    #[error("asset `{0}` contains characters outside [A-Z0-9]")]
    InvalidCharacters(String),
}

/// An asset symbol that has passed the allow-list check and is safe to embed
/// in request URLs and bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(raw: &str, allowed: &[String]) -> Result<Self, SymbolError> {
        let upper = raw.trim().to_uppercase();
        if upper.is_empty() || !upper.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
            return Err(SymbolError::InvalidCharacters(raw.to_string()));
        }
        if !allowed.iter().any(|a| a.eq_ignore_ascii_case(&upper)) {
            return Err(SymbolError::NotAllowed(upper));
        }
        Ok(Self(upper))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ── Venue trait ─────────────────────────────────────────────────────

/// Which funding-rate venues the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueKind {
    Hyperliquid,
    Binance,
    Bybit,
    Okx,
    Dydx,
}

/// A public funding-rate endpoint.
///
/// Implementations issue exactly one read-only request and validate the
/// payload into a per-interval rate. Timeouts and error mapping are handled
/// by [`fetch_quote`], so adapters only need to return `Err` on any failure.
#[async_trait]
pub trait RateVenue: Send + Sync {
    fn name(&self) -> &str;

    fn interval(&self) -> FundingInterval;

    /// Fetch the current per-interval funding rate for `symbol`.
    async fn fetch_rate(&self, client: &reqwest::Client, symbol: &Symbol) -> Result<f64>;
}

/// Build the adapters listed in the config, preserving order.
pub fn build_all(kinds: &[VenueKind]) -> Vec<Box<dyn RateVenue>> {
    kinds
        .iter()
        .map(|kind| -> Box<dyn RateVenue> {
            match kind {
                VenueKind::Hyperliquid => Box::new(hyperliquid::Hyperliquid::default()),
                VenueKind::Binance => Box::new(binance::Binance::default()),
                VenueKind::Bybit => Box::new(bybit::Bybit::default()),
                VenueKind::Okx => Box::new(okx::Okx::default()),
                VenueKind::Dydx => Box::new(dydx::Dydx::default()),
            }
        })
        .collect()
}

/// Fetch one venue's quote. Any failure (timeout, HTTP status, bad payload,
/// unlisted asset) is logged and mapped to `None`.
pub async fn fetch_quote(
    venue: &dyn RateVenue,
    client: &reqwest::Client,
    symbol: &Symbol,
    timeout: Duration,
) -> Option<VenueQuote> {
    match tokio::time::timeout(timeout, venue.fetch_rate(client, symbol)).await {
        Ok(Ok(rate)) => {
            let quote = VenueQuote::new(venue.name(), rate, venue.interval());
            if quote.is_none() {
                tracing::warn!(venue = venue.name(), rate, "discarding non-finite funding rate");
            }
            quote
        }
        Ok(Err(e)) => {
            tracing::warn!(venue = venue.name(), error = %format!("{e:#}"), "venue fetch failed");
            None
        }
        Err(_) => {
            tracing::warn!(venue = venue.name(), ?timeout, "venue fetch timed out");
            None
        }
    }
}

/// Query every venue concurrently and wait for all of them to settle.
///
/// Results come back in the same order as `venues`, regardless of arrival
/// order, so aggregation stays deterministic.
pub async fn fetch_all(
    venues: &[Box<dyn RateVenue>],
    client: &reqwest::Client,
    symbol: &Symbol,
    timeout: Duration,
) -> Vec<Option<VenueQuote>> {
    join_all(
        venues
            .iter()
            .map(|v| fetch_quote(v.as_ref(), client, symbol, timeout)),
    )
    .await
}

/// Parse a decimal string field the way venue APIs encode rates.
pub(crate) fn parse_rate(field: &str, value: &str) -> Result<f64> {
    let rate: f64 = value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("field `{field}` is not a number: {value:?}"))?;
    if !rate.is_finite() {
        anyhow::bail!("field `{field}` is not finite: {value:?}");
    }
    Ok(rate)
}
