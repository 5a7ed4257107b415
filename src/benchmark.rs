use std::f64::consts::TAU;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::BenchmarkConfig;

const DAY_MS: u64 = 86_400_000;

// ── API response types ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CandleRow {
    #[serde(rename = "t")]
    open_time: u64, // ms
    #[serde(rename = "c")]
    close: String,
}

// ── Public API ───────────────────────────────────────────────────────

/// One daily benchmark observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkSource {
    Hyperliquid,
    Synthetic,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkSeries {
    pub source: BenchmarkSource,
    pub points: Vec<PricePoint>,
}

impl BenchmarkSeries {
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }
}

/// Load the benchmark price history, substituting the synthetic series when
/// the source is unavailable or returns nothing usable.
pub async fn load_benchmark(
    client: &reqwest::Client,
    config: &BenchmarkConfig,
    now: DateTime<Utc>,
) -> BenchmarkSeries {
    match fetch_daily_closes(client, config, now).await {
        Ok(points) => BenchmarkSeries {
            source: BenchmarkSource::Hyperliquid,
            points,
        },
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "benchmark unavailable, using synthetic series");
            BenchmarkSeries {
                source: BenchmarkSource::Synthetic,
                points: synthetic_series(config.fallback_start_price, config.days, now.date_naive()),
            }
        }
    }
}

/// Deterministic stand-in price path: two overlapping cycles on top of a
/// gentle drift. Prices stay within ±17% of the drifted level, so they are
/// always positive for a positive start price.
///
/// The path is truncated at the earliest representable date.
pub fn synthetic_series(start_price: f64, days: u32, end: NaiveDate) -> Vec<PricePoint> {
    let days = days.max(1);
    let start = end
        .checked_sub_days(Days::new(u64::from(days - 1)))
        .unwrap_or(NaiveDate::MIN);
    (0..days)
        .map_while(|i| {
            let date = start
                .checked_add_days(Days::new(u64::from(i)))
                .filter(|d| *d <= end)?;
            let t = i as f64;
            let cycle = 1.0 + 0.12 * (TAU * t / 45.0).sin() + 0.05 * (TAU * t / 11.0).sin();
            let drift = 1.0008_f64.powf(t);
            Some(PricePoint {
                date,
                price: start_price * cycle * drift,
            })
        })
        .collect()
}

// ── Internal helpers ─────────────────────────────────────────────────

async fn fetch_daily_closes(
    client: &reqwest::Client,
    config: &BenchmarkConfig,
    now: DateTime<Utc>,
) -> Result<Vec<PricePoint>> {
    let end_time_ms = now.timestamp_millis().max(0) as u64;
    let start_time_ms = end_time_ms.saturating_sub(u64::from(config.days) * DAY_MS);

    let body = serde_json::json!({
        "type": "candleSnapshot",
        "req": {
            "coin": &config.coin,
            "interval": "1d",
            "startTime": start_time_ms,
            "endTime": end_time_ms,
        }
    });

    let candles = client
        .post(&config.api_url)
        .timeout(Duration::from_secs(config.timeout_secs))
        .json(&body)
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<CandleRow>>()
        .await
        .with_context(|| format!("decoding candles for {}", config.coin))?;

    candles_to_points(&candles)
}

/// Every close must parse to a positive finite price; a partially valid
/// series is rejected outright.
fn candles_to_points(candles: &[CandleRow]) -> Result<Vec<PricePoint>> {
    if candles.is_empty() {
        bail!("no candles returned");
    }
    candles
        .iter()
        .map(|c| -> Result<PricePoint> {
            let price: f64 = c
                .close
                .parse()
                .with_context(|| format!("bad close {:?}", c.close))?;
            if !price.is_finite() || price <= 0.0 {
                bail!("non-positive close {price}");
            }
            let date = DateTime::from_timestamp_millis(c.open_time as i64)
                .with_context(|| format!("bad candle time {}", c.open_time))?
                .date_naive();
            Ok(PricePoint { date, price })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_series_is_deterministic_and_positive() {
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let a = synthetic_series(2500.0, 120, end);
        let b = synthetic_series(2500.0, 120, end);
        assert_eq!(a, b);
        assert_eq!(a.len(), 120);
        assert_eq!(a.last().unwrap().date, end);
        assert_eq!(a[0].price, 2500.0);
        assert!(a.iter().all(|p| p.price > 0.0));
    }

    #[test]
    fn test_synthetic_series_stops_at_earliest_date() {
        let end = NaiveDate::MIN.checked_add_days(Days::new(3)).unwrap();
        let points = synthetic_series(2500.0, 200_000_000, end);
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].date, NaiveDate::MIN);
        assert_eq!(points.last().unwrap().date, end);
    }

    #[test]
    fn test_candles_to_points() {
        let raw = r#"[
            {"t": 1704067200000, "T": 1704153599999, "o": "2280", "h": "2300", "l": "2250", "c": "2290.5", "v": "10"},
            {"t": 1704153600000, "T": 1704239999999, "o": "2290", "h": "2400", "l": "2280", "c": "2350", "v": "12"}
        ]"#;
        let candles: Vec<CandleRow> = serde_json::from_str(raw).unwrap();
        let points = candles_to_points(&candles).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(points[1].price, 2350.0);
    }

    #[test]
    fn test_rejects_bad_candles() {
        assert!(candles_to_points(&[]).is_err());
        let candles = vec![CandleRow {
            open_time: 0,
            close: "0".to_string(),
        }];
        assert!(candles_to_points(&candles).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_source_uses_synthetic() {
        let config = BenchmarkConfig {
            api_url: "http://127.0.0.1:1/info".to_string(),
            days: 30,
            timeout_secs: 2,
            ..BenchmarkConfig::default()
        };
        let series = load_benchmark(&reqwest::Client::new(), &config, Utc::now()).await;
        assert_eq!(series.source, BenchmarkSource::Synthetic);
        assert_eq!(series.points.len(), 30);
    }
}
