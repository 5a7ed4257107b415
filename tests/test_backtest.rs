mod mock_common;

use chrono::NaiveDate;

use yield_engine::backtest::metrics::{RiskMetrics, max_drawdown_pct};
use yield_engine::backtest::series::{TimeSeriesPoint, generate_series};
use yield_engine::benchmark::{BenchmarkSource, synthetic_series};
use yield_engine::config::{RiskConfig, SeriesConfig};
use yield_engine::engine::Engine;
use yield_engine::model::YieldModelParams;

use mock_common::*;

fn params(funding: f64, staking: f64, leverage: f64) -> YieldModelParams {
    YieldModelParams {
        leverage,
        funding_rate_annual: funding,
        staking_yield: staking,
        spread_edge: 0.0,
        turnover_rate: 0.0,
        cost_rate: 0.0,
    }
}

fn synthetic_prices(days: u32) -> Vec<f64> {
    let end = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
    synthetic_series(2500.0, days, end).iter().map(|p| p.price).collect()
}

#[test]
fn test_strictly_increasing_series() {
    let series: Vec<TimeSeriesPoint> = (0..10)
        .map(|i| TimeSeriesPoint {
            index: i,
            benchmark_value: 100.0 + 2.0 * i as f64,
            strategy_value: 100.0 + 3.0 * i as f64,
        })
        .collect();
    let m = RiskMetrics::compute(&series, &RiskConfig::default());

    assert_eq!(m.max_drawdown_pct, 0.0);
    let strat = (127.0 / 100.0 - 1.0) * 100.0;
    let bench = (118.0 / 100.0 - 1.0) * 100.0;
    assert!((m.alpha_pct - (strat - bench)).abs() < 1e-9);
}

#[test]
fn test_single_point_is_insufficient() {
    let series = generate_series(&[1234.5], &params(0.1, 0.035, 1.0), &SeriesConfig::default()).unwrap();
    let m = RiskMetrics::compute(&series, &RiskConfig::default());
    assert_eq!(m, RiskMetrics::default());
    assert_eq!(m.alpha_pct, 0.0);
    assert_eq!(m.beta_ratio, 0.0);
    assert_eq!(m.max_drawdown_pct, 0.0);
    assert_eq!(m.sharpe_ratio, 0.0);
}

#[test]
fn test_beta_stays_in_band() {
    let config = RiskConfig::default();
    for days in [2, 12, 30, 90, 365] {
        for (funding, leverage) in [(0.0, 1.0), (0.1, 1.0), (0.3, 3.0)] {
            let prices = synthetic_prices(days);
            let series = generate_series(&prices, &params(funding, 0.035, leverage), &SeriesConfig::default())
                .unwrap();
            let m = RiskMetrics::compute(&series, &config);
            assert!(m.beta_ratio.abs() <= 0.15, "beta {} out of band", m.beta_ratio);
            assert!(m.max_drawdown_pct >= 0.0);
            assert!(m.sharpe_ratio.is_finite() && m.alpha_pct.is_finite());
        }
    }

    // A strategy that is the benchmark itself is clamped, not reported at 1.0.
    let prices = synthetic_prices(120);
    let series: Vec<TimeSeriesPoint> = prices
        .iter()
        .enumerate()
        .map(|(index, &p)| TimeSeriesPoint {
            index,
            benchmark_value: p,
            strategy_value: p,
        })
        .collect();
    assert_eq!(RiskMetrics::compute(&series, &config).beta_ratio, 0.15);
}

#[test]
fn test_drawdown_zero_iff_non_decreasing() {
    let noise_free = SeriesConfig {
        base_value: 100.0,
        noise_amplitude: 0.0,
    };
    let prices = synthetic_prices(60);

    let rising = generate_series(&prices, &params(0.1, 0.035, 1.0), &noise_free).unwrap();
    assert!(rising.windows(2).all(|w| w[1].strategy_value >= w[0].strategy_value));
    assert_eq!(RiskMetrics::compute(&rising, &RiskConfig::default()).max_drawdown_pct, 0.0);

    // With zero carry the noise alone drives the path, which must dip somewhere.
    let noisy = generate_series(&prices, &params(0.0, 0.0, 1.0), &SeriesConfig::default()).unwrap();
    let values: Vec<f64> = noisy.iter().map(|p| p.strategy_value).collect();
    assert!(values.windows(2).any(|w| w[1] < w[0]));
    assert!(max_drawdown_pct(&values) > 0.0);
}

#[test]
fn test_positive_carry_earns_alpha_in_a_falling_market() {
    let falling: Vec<f64> = (0..60).map(|i| 3000.0 * 0.995_f64.powi(i)).collect();
    let series = generate_series(&falling, &params(0.15, 0.035, 1.0), &SeriesConfig::default()).unwrap();
    let m = RiskMetrics::compute(&series, &RiskConfig::default());
    assert!(m.alpha_pct > 0.0);
    assert!(m.sharpe_ratio > 0.0);
}

#[tokio::test]
async fn test_backtest_falls_back_to_synthetic_benchmark() {
    let venues = vec![MockVenue::annualized("A", 0.12)];
    let engine = Engine::with_venues(offline_config(), venues).unwrap();
    let result = engine.backtest(45).await.unwrap();

    assert_eq!(result.benchmark_source, BenchmarkSource::Synthetic);
    assert_eq!(result.series.len(), 45);
    assert_eq!(result.series[0].benchmark_value, 100.0);
    assert_eq!(result.series[0].strategy_value, 100.0);
    assert_eq!(result.expected_yield.best_venue, "A");
    assert!(result.metrics.beta_ratio.abs() <= 0.15);

    let again = engine.backtest(45).await.unwrap();
    assert_eq!(result.metrics, again.metrics);
}

#[tokio::test]
async fn test_backtest_rejects_out_of_range_days() {
    let engine = Engine::with_venues(offline_config(), vec![MockVenue::annualized("A", 0.12)]).unwrap();
    assert!(engine.backtest(0).await.is_err());
    assert!(engine.backtest(200_000_000).await.is_err());
}
