use serde::Serialize;

use super::VenueQuote;

/// Venue name reported when no venue produced a quote.
pub const NO_VENUE: &str = "none";

/// Outcome of aggregating one round of venue quotes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRate {
    pub best_venue: String,
    /// Annualized rate of the best venue as quoted (may be negative).
    pub best_venue_annual_rate: f64,
}

impl AggregatedRate {
    pub fn none() -> Self {
        Self {
            best_venue: NO_VENUE.to_string(),
            best_venue_annual_rate: 0.0,
        }
    }

    /// Rate passed to the yield model: negative funding is floored at zero.
    pub fn usable_rate(&self) -> f64 {
        self.best_venue_annual_rate.max(0.0)
    }

    pub fn has_venue(&self) -> bool {
        self.best_venue != NO_VENUE
    }
}

/// Pick the venue with the highest annualized rate. Missing quotes are
/// skipped; on ties the earliest venue wins.
pub fn aggregate(results: &[Option<VenueQuote>]) -> AggregatedRate {
    let mut best: Option<&VenueQuote> = None;
    for quote in results.iter().flatten() {
        match best {
            Some(b) if quote.annualized_rate <= b.annualized_rate => {}
            _ => best = Some(quote),
        }
    }

    match best {
        Some(q) => AggregatedRate {
            best_venue: q.venue_name.clone(),
            best_venue_annual_rate: q.annualized_rate,
        },
        None => AggregatedRate::none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(name: &str, annualized_rate: f64) -> Option<VenueQuote> {
        Some(VenueQuote {
            venue_name: name.to_string(),
            raw_rate: annualized_rate / 1095.0,
            interval_hours: 8,
            annualized_rate,
        })
    }

    #[test]
    fn test_picks_highest_rate() {
        let agg = aggregate(&[quote("A", 0.10), quote("B", 0.25), None]);
        assert_eq!(agg.best_venue, "B");
        assert_eq!(agg.best_venue_annual_rate, 0.25);
        assert_eq!(agg.usable_rate(), 0.25);
    }

    #[test]
    fn test_all_missing() {
        let agg = aggregate(&[None, None, None]);
        assert_eq!(agg.best_venue, "none");
        assert_eq!(agg.best_venue_annual_rate, 0.0);
        assert!(!agg.has_venue());

        assert_eq!(aggregate(&[]), AggregatedRate::none());
    }

    #[test]
    fn test_first_maximum_wins() {
        let agg = aggregate(&[None, quote("A", 0.2), quote("B", 0.2)]);
        assert_eq!(agg.best_venue, "A");
    }

    #[test]
    fn test_negative_rate_floored() {
        let agg = aggregate(&[quote("A", -0.05), quote("B", -0.02)]);
        assert_eq!(agg.best_venue, "B");
        assert_eq!(agg.best_venue_annual_rate, -0.02);
        assert_eq!(agg.usable_rate(), 0.0);
    }
}
