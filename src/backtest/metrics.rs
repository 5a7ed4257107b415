use serde::Serialize;

use crate::config::RiskConfig;

use super::series::TimeSeriesPoint;

/// Performance and risk statistics of a strategy series against its benchmark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RiskMetrics {
    pub alpha_pct: f64,
    pub beta_ratio: f64,
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,
}

impl RiskMetrics {
    /// Compute all four metrics. Fewer than two points yields zeroed metrics.
    pub fn compute(series: &[TimeSeriesPoint], config: &RiskConfig) -> Self {
        if series.len() < 2 {
            return Self::default();
        }
        let strategy: Vec<f64> = series.iter().map(|p| p.strategy_value).collect();
        let benchmark: Vec<f64> = series.iter().map(|p| p.benchmark_value).collect();

        Self {
            alpha_pct: finite_or_zero(alpha_pct(&strategy, &benchmark)),
            beta_ratio: finite_or_zero(beta(&strategy, &benchmark, config)),
            max_drawdown_pct: finite_or_zero(max_drawdown_pct(&strategy)),
            sharpe_ratio: finite_or_zero(sharpe_ratio(
                &strategy,
                config.periods_per_year,
                config.risk_free_rate,
            )),
        }
    }
}

// ── Drawdown ────────────────────────────────────────────────────────

/// Running-peak drawdown tracker.
struct DrawdownTracker {
    peak: f64,
    max_drawdown: f64,
}

impl DrawdownTracker {
    fn new(initial: f64) -> Self {
        Self {
            peak: initial,
            max_drawdown: 0.0,
        }
    }

    fn record(&mut self, value: f64) {
        if value > self.peak {
            self.peak = value;
        }
        let drawdown = if self.peak > 0.0 {
            (self.peak - value) / self.peak
        } else {
            0.0
        };
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
        }
    }
}

/// Largest peak-to-trough decline, in percent. Zero iff non-decreasing.
pub fn max_drawdown_pct(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };
    let mut tracker = DrawdownTracker::new(first);
    for &v in values {
        tracker.record(v);
    }
    tracker.max_drawdown * 100.0
}

// ── Alpha ───────────────────────────────────────────────────────────

fn total_return(values: &[f64]) -> f64 {
    match (values.first(), values.last()) {
        (Some(&first), Some(&last)) if first != 0.0 => (last - first) / first,
        _ => 0.0,
    }
}

/// Excess total return of strategy over benchmark, in percent.
pub fn alpha_pct(strategy: &[f64], benchmark: &[f64]) -> f64 {
    (total_return(strategy) - total_return(benchmark)) * 100.0
}

// ── Beta ────────────────────────────────────────────────────────────

pub fn simple_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| if w[0] != 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

/// Least-squares fit of strategy returns on benchmark returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetaFit {
    pub raw_beta: f64,
    pub r_squared: f64,
    pub steps: usize,
}

/// Regress strategy returns on benchmark returns over the steps where the
/// benchmark moved by at least `noise_floor`. Returns `None` when fewer than
/// `min_steps` qualify or the benchmark has no variance.
pub fn fit_beta(strategy: &[f64], benchmark: &[f64], noise_floor: f64, min_steps: usize) -> Option<BetaFit> {
    let pairs: Vec<(f64, f64)> = simple_returns(strategy)
        .into_iter()
        .zip(simple_returns(benchmark))
        .filter(|&(_, b)| b.abs() >= noise_floor)
        .collect();
    if pairs.len() < min_steps.max(2) {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_s = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_b = 0.0;
    let mut var_s = 0.0;
    for &(s, b) in &pairs {
        cov += (s - mean_s) * (b - mean_b);
        var_b += (b - mean_b).powi(2);
        var_s += (s - mean_s).powi(2);
    }
    if var_b <= 0.0 {
        return None;
    }

    let r_squared = if var_s > 0.0 {
        (cov * cov) / (var_b * var_s)
    } else {
        0.0
    };
    Some(BetaFit {
        raw_beta: cov / var_b,
        r_squared,
        steps: pairs.len(),
    })
}

/// Reported beta.
///
/// This is a reporting heuristic, not a statistical estimator: the fitted
/// beta is clamped to `±beta_bound`, and when R² falls below
/// `beta_r2_threshold` it is further scaled by `R² / threshold`. A weak fit
/// thus reports proportionally less exposure.
pub fn beta(strategy: &[f64], benchmark: &[f64], config: &RiskConfig) -> f64 {
    let Some(fit) = fit_beta(
        strategy,
        benchmark,
        config.beta_noise_floor,
        config.beta_min_steps,
    ) else {
        return 0.0;
    };

    let bound = config.beta_bound.abs();
    let mut beta = fit.raw_beta.clamp(-bound, bound);
    if config.beta_r2_threshold > 0.0 && fit.r_squared < config.beta_r2_threshold {
        beta *= fit.r_squared / config.beta_r2_threshold;
    }
    beta
}

// ── Sharpe ──────────────────────────────────────────────────────────

/// Annualized Sharpe ratio from per-step simple returns (sample stddev).
/// Zero volatility reports 0.
pub fn sharpe_ratio(values: &[f64], periods_per_year: f64, risk_free_rate: f64) -> f64 {
    let returns = simple_returns(values);
    if returns.is_empty() {
        return 0.0;
    }

    let mean_ret = returns.iter().sum::<f64>() / returns.len() as f64;
    let var = if returns.len() > 1 {
        returns.iter().map(|r| (r - mean_ret).powi(2)).sum::<f64>() / (returns.len() - 1) as f64
    } else {
        0.0
    };

    let annualized_return = mean_ret * periods_per_year;
    let annualized_vol = var.sqrt() * periods_per_year.sqrt();
    if annualized_vol > 0.0 {
        (annualized_return - risk_free_rate) / annualized_vol
    } else {
        0.0
    }
}

fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() { x } else { 0.0 }
}
