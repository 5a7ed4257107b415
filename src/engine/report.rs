use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::staking::StakingSource;
use crate::venues::VenueQuote;

use super::YieldSnapshot;

#[derive(Debug, Clone, Serialize)]
pub struct ApyBreakdown {
    pub best_funding_venue: String,
    /// Quoted annualized rate of the best venue, in percent (before flooring).
    pub best_funding_annual_pct: f64,
    pub staking_yield_pct: f64,
    pub staking_source: StakingSource,
    pub leverage: f64,
}

/// Response body of the APY request.
#[derive(Debug, Clone, Serialize)]
pub struct ApyReport {
    /// Simple APY in percent, rounded to 2 decimals.
    pub apy: f64,
    pub apy_decimal: f64,
    pub breakdown: ApyBreakdown,
    /// Venues that returned a quote this cycle.
    pub venues: BTreeMap<String, VenueQuote>,
    pub staking_yield: f64,
    pub timestamp: String,
}

impl ApyReport {
    pub fn from_snapshot(snapshot: &YieldSnapshot, now: DateTime<Utc>) -> Self {
        let venues = snapshot
            .quotes
            .iter()
            .flatten()
            .map(|q| (q.venue_name.clone(), q.clone()))
            .collect();

        Self {
            apy: round_to(snapshot.expected.apy_simple * 100.0, 2),
            apy_decimal: snapshot.expected.apy_simple,
            breakdown: ApyBreakdown {
                best_funding_venue: snapshot.expected.best_venue.clone(),
                best_funding_annual_pct: round_to(snapshot.expected.best_venue_annual_rate * 100.0, 4),
                staking_yield_pct: round_to(snapshot.staking.value * 100.0, 4),
                staking_source: snapshot.staking.source,
                leverage: snapshot.params.leverage,
            },
            venues,
            staking_yield: snapshot.staking.value,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

fn round_to(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (x * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(5.678, 2), 5.68);
        assert_eq!(round_to(-1.234, 2), -1.23);
        assert_eq!(round_to(0.0, 2), 0.0);
    }
}
