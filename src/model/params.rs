use serde::{Deserialize, Serialize};

use crate::config::StrategyConfig;

/// Inputs to the expected-yield model.
///
/// All rates are simple annual fractions (0.05 = 5%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldModelParams {
    pub leverage: f64,
    pub funding_rate_annual: f64,
    pub staking_yield: f64,
    pub spread_edge: f64,
    pub turnover_rate: f64,
    pub cost_rate: f64,
}

impl YieldModelParams {
    /// Combine caller-side strategy defaults with live market inputs.
    pub fn from_strategy(strategy: &StrategyConfig, funding_rate_annual: f64, staking_yield: f64) -> Self {
        Self {
            leverage: strategy.leverage,
            funding_rate_annual,
            staking_yield,
            spread_edge: strategy.spread_edge,
            turnover_rate: strategy.turnover_rate,
            cost_rate: strategy.cost_rate,
        }
    }

    /// Funding contribution per day, scaled by leverage.
    pub fn daily_funding(&self) -> f64 {
        self.funding_rate_annual / 365.0 * self.leverage
    }

    /// Staking contribution per day, scaled by leverage.
    pub fn daily_staking(&self) -> f64 {
        self.staking_yield / 365.0 * self.leverage
    }
}
