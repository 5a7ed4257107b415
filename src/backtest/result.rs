use serde::Serialize;

use crate::benchmark::BenchmarkSource;
use crate::model::ExpectedYield;

use super::metrics::RiskMetrics;
use super::series::TimeSeriesPoint;

#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub label: String,
    pub benchmark_source: BenchmarkSource,
    pub expected_yield: ExpectedYield,
    pub metrics: RiskMetrics,
    pub series: Vec<TimeSeriesPoint>,
}

impl BacktestResult {
    pub fn strategy_return_pct(&self) -> f64 {
        self.total_return_pct(|p| p.strategy_value)
    }

    pub fn benchmark_return_pct(&self) -> f64 {
        self.total_return_pct(|p| p.benchmark_value)
    }

    fn total_return_pct(&self, value: impl Fn(&TimeSeriesPoint) -> f64) -> f64 {
        match (self.series.first(), self.series.last()) {
            (Some(first), Some(last)) if value(first) > 0.0 => (value(last) / value(first) - 1.0) * 100.0,
            _ => 0.0,
        }
    }

    pub fn print_table(results: &[Self]) {
        println!("\n{}", "═".repeat(104));
        println!("  Backtest Results");
        println!("{}", "═".repeat(104));
        println!(
            "  {:<20} {:>10} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>6}",
            "Strategy", "Benchmark", "APY%", "Strat%", "Bench%", "Alpha%", "Beta", "MxDD%", "Sharpe",
        );
        println!("  {}", "-".repeat(98));
        for r in results {
            let source = match r.benchmark_source {
                BenchmarkSource::Hyperliquid => "hyperliquid",
                BenchmarkSource::Synthetic => "synthetic",
            };
            println!(
                "  {:<20} {:>10} {:>+8.2} {:>+8.2} {:>+8.2} {:>+8.2} {:>+8.3} {:>8.2} {:>6.2}",
                r.label,
                source,
                r.expected_yield.apy_simple * 100.0,
                r.strategy_return_pct(),
                r.benchmark_return_pct(),
                r.metrics.alpha_pct,
                r.metrics.beta_ratio,
                r.metrics.max_drawdown_pct,
                r.metrics.sharpe_ratio,
            );
        }
        println!("{}", "═".repeat(104));
        if let Some(r) = results.first() {
            println!(
                "  {} points, best funding venue: {} ({:+.2}% annualized)",
                r.series.len(),
                r.expected_yield.best_venue,
                r.expected_yield.best_venue_annual_rate * 100.0,
            );
        }
    }
}
