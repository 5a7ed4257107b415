use serde::Serialize;
use thiserror::Error;

use crate::config::SeriesConfig;
use crate::model::YieldModelParams;

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("benchmark series is empty")]
    Empty,

    #[error("benchmark price at index {index} is not positive and finite ({price})")]
    InvalidPrice { index: usize, price: f64 },

    #[error("base value must be positive and finite, got {0}")]
    InvalidBase(f64),

    #[error("growth factor at index {index} is not positive ({factor})")]
    NonPositiveGrowth { index: usize, factor: f64 },
}

/// One step of the paired benchmark/strategy series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub index: usize,
    pub benchmark_value: f64,
    pub strategy_value: f64,
}

/// Bounded, deterministic noise for day `index`: a blend of two incommensurate
/// sinusoids, so `|noise| <= amplitude` and identical inputs reproduce
/// identical series.
pub fn deterministic_noise(index: usize, amplitude: f64) -> f64 {
    let t = index as f64;
    amplitude * (0.6 * (t * 1.7).sin() + 0.4 * (t * 0.31).cos())
}

/// Build the strategy series alongside a normalized benchmark.
///
/// The benchmark is rescaled so index 0 equals `config.base_value`. The
/// strategy starts at the same base and compounds
/// `1 + daily_funding + daily_staking + noise(i)` for every later day.
pub fn generate_series(
    benchmark_prices: &[f64],
    params: &YieldModelParams,
    config: &SeriesConfig,
) -> Result<Vec<TimeSeriesPoint>, SeriesError> {
    let base = config.base_value;
    if !base.is_finite() || base <= 0.0 {
        return Err(SeriesError::InvalidBase(base));
    }
    let first = *benchmark_prices.first().ok_or(SeriesError::Empty)?;
    for (index, &price) in benchmark_prices.iter().enumerate() {
        if !price.is_finite() || price <= 0.0 {
            return Err(SeriesError::InvalidPrice { index, price });
        }
    }

    let scale = base / first;
    let daily = params.daily_funding() + params.daily_staking();

    let mut strategy = base;
    let mut points = Vec::with_capacity(benchmark_prices.len());
    for (index, &price) in benchmark_prices.iter().enumerate() {
        if index > 0 {
            let factor = 1.0 + daily + deterministic_noise(index, config.noise_amplitude);
            if !factor.is_finite() || factor <= 0.0 {
                return Err(SeriesError::NonPositiveGrowth { index, factor });
            }
            strategy *= factor;
        }
        points.push(TimeSeriesPoint {
            index,
            benchmark_value: if index == 0 { base } else { price * scale },
            strategy_value: strategy,
        });
    }
    Ok(points)
}
