//! Fare accounting.
//!
//! Fares are time-based: a flat base plus a per-minute rate over the
//! effective (non-paused) trip duration, floored at a minimum fare, then
//! scaled by the surge multiplier bound to the ride at request time.

use chrono::{DateTime, Utc};

/// Fare parameters in currency-neutral units.
#[derive(Debug, Clone, Copy)]
pub struct FareParams {
    pub base_fare: f64,
    pub per_minute_rate: f64,
    pub minimum_fare: f64,
}

impl Default for FareParams {
    fn default() -> Self {
        Self {
            base_fare: 2.0,
            per_minute_rate: 0.5,
            minimum_fare: 5.0,
        }
    }
}

/// Billable seconds: wall-clock duration minus accumulated pause time,
/// never negative.
pub fn effective_seconds(
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    total_paused_seconds: i64,
) -> i64 {
    let elapsed = (ended_at - started_at).num_seconds();
    (elapsed - total_paused_seconds).max(0)
}

/// Base fare before surge, floored at the minimum fare.
pub fn calculate_base_fare(effective_seconds: i64, params: &FareParams) -> f64 {
    let minutes = effective_seconds as f64 / 60.0;
    let fare = params.base_fare + minutes * params.per_minute_rate;

    if fare < params.minimum_fare {
        params.minimum_fare
    } else {
        fare
    }
}

/// Total fare: base scaled by the surge multiplier. A multiplier below 1.0
/// (unset or corrupt) never discounts the fare.
pub fn apply_surge(base_fare: f64, surge_multiplier: f64) -> f64 {
    base_fare * surge_multiplier.max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
    }

    #[test]
    fn ten_minute_trip_fare() {
        let secs = effective_seconds(at(0), at(600), 0);
        let base = calculate_base_fare(secs, &FareParams::default());
        assert_eq!(base, 7.0);
        assert_eq!(apply_surge(base, 1.0), 7.0);
    }

    #[test]
    fn zero_second_trip_hits_minimum_fare() {
        let base = calculate_base_fare(0, &FareParams::default());
        assert_eq!(base, 5.0);
        assert_eq!(apply_surge(base, 1.5), 7.5);
    }

    #[test]
    fn paused_time_is_excluded() {
        // Start at t=0, pause 120..300, end at t=600: 180s paused, 7 min billed.
        let secs = effective_seconds(at(0), at(600), 180);
        assert_eq!(secs, 420);
        let base = calculate_base_fare(secs, &FareParams::default());
        assert_eq!(base, 5.5);
        assert_eq!(apply_surge(base, 1.0), 5.5);
    }

    #[test]
    fn effective_seconds_never_negative() {
        assert_eq!(effective_seconds(at(0), at(10), 60), 0);
    }

    #[test]
    fn surge_below_one_does_not_discount() {
        assert_eq!(apply_surge(10.0, 0.5), 10.0);
        assert_eq!(apply_surge(10.0, 2.0), 20.0);
    }

    #[test]
    fn short_trip_below_minimum_is_floored() {
        // 2 minutes: 2.0 + 1.0 = 3.0, floored to 5.0.
        let base = calculate_base_fare(120, &FareParams::default());
        assert_eq!(base, 5.0);
    }
}
