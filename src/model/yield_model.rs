use serde::Serialize;
use thiserror::Error;

use crate::venues::AggregatedRate;

use super::YieldModelParams;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("parameter `{field}` is not finite ({value})")]
    NonFiniteInput { field: &'static str, value: f64 },

    #[error("parameter `{field}` must be >= 0, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("model produced a non-finite {what} ({value})")]
    NonFiniteResult { what: &'static str, value: f64 },
}

/// Projected annual yield for the current market snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpectedYield {
    /// Simple annual return, `exp(apy_log) - 1`.
    pub apy_simple: f64,
    /// Expected annual log return.
    pub apy_log: f64,
    pub best_venue: String,
    pub best_venue_annual_rate: f64,
}

/// Annual log return of the strategy:
///
/// `leverage * funding + leverage * staking + turnover * spread_edge - cost`
///
/// Funding and staking compound continuously so they add in log space. The
/// spread term is a first-order approximation of discrete capture events.
pub fn expected_log_return(p: &YieldModelParams) -> Result<f64, ModelError> {
    validate(p)?;
    let log_return = p.leverage * p.funding_rate_annual
        + p.leverage * p.staking_yield
        + p.turnover_rate * p.spread_edge
        - p.cost_rate;
    if !log_return.is_finite() {
        return Err(ModelError::NonFiniteResult {
            what: "log return",
            value: log_return,
        });
    }
    Ok(log_return)
}

/// Run the model and label the result with the venue the funding came from.
pub fn expected_yield(
    params: &YieldModelParams,
    funding: &AggregatedRate,
) -> Result<ExpectedYield, ModelError> {
    let apy_log = expected_log_return(params)?;
    let apy_simple = apy_log.exp() - 1.0;
    if !apy_simple.is_finite() {
        return Err(ModelError::NonFiniteResult {
            what: "apy",
            value: apy_simple,
        });
    }
    Ok(ExpectedYield {
        apy_simple,
        apy_log,
        best_venue: funding.best_venue.clone(),
        best_venue_annual_rate: funding.best_venue_annual_rate,
    })
}

fn validate(p: &YieldModelParams) -> Result<(), ModelError> {
    let fields = [
        ("leverage", p.leverage),
        ("funding_rate_annual", p.funding_rate_annual),
        ("staking_yield", p.staking_yield),
        ("spread_edge", p.spread_edge),
        ("turnover_rate", p.turnover_rate),
        ("cost_rate", p.cost_rate),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(ModelError::NonFiniteInput { field, value });
        }
    }
    for (field, value) in [
        ("leverage", p.leverage),
        ("staking_yield", p.staking_yield),
        ("cost_rate", p.cost_rate),
    ] {
        if value < 0.0 {
            return Err(ModelError::Negative { field, value });
        }
    }
    Ok(())
}
