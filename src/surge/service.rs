//! Surge pricing from local supply and demand.

use std::sync::Arc;

use sqlx::PgPool;

use crate::geo;
use crate::location::LocationIndex;
use crate::repository::rides;

/// Radius used for both supply and demand counting.
pub const SURGE_RADIUS_KM: f64 = 5.0;

/// Demand/supply ratio thresholds and their multipliers.
const HIGH_SURGE_RATIO: f64 = 2.0;
const MED_SURGE_RATIO: f64 = 1.5;
const LOW_SURGE_RATIO: f64 = 1.2;
const MAX_SURGE: f64 = 2.0;

/// Surge pricer. Stateless between invocations: the multiplier is computed
/// fresh for every request, so it may change from one quote to the next.
pub struct SurgeService {
    pool: PgPool,
    location_index: Arc<dyn LocationIndex>,
}

impl SurgeService {
    pub fn new(pool: PgPool, location_index: Arc<dyn LocationIndex>) -> Self {
        Self {
            pool,
            location_index,
        }
    }

    /// Surge multiplier at a pickup location.
    ///
    /// Supply is the number of drivers the location index knows within the
    /// radius; demand is the number of active rides whose pickup falls in the
    /// same disk. An unreachable index fails open to 1.0 so pricing never
    /// blocks ride creation.
    pub async fn multiplier(&self, lat: f64, lng: f64) -> f64 {
        let supply = match self.location_index.nearby(lat, lng, SURGE_RADIUS_KM).await {
            Ok(drivers) => drivers.len(),
            Err(e) => {
                tracing::warn!(error = %e, "Location index unavailable, skipping surge");
                return 1.0;
            }
        };

        let demand = self.count_active_requests(lat, lng).await;

        multiplier_for(supply, demand)
    }

    /// Active rides (REQUESTED, ASSIGNED or IN_TRIP) with pickup within the
    /// surge radius.
    async fn count_active_requests(&self, lat: f64, lng: f64) -> usize {
        let rides = match rides::list_active(&self.pool).await {
            Ok(rides) => rides,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load active rides for surge demand");
                return 0;
            }
        };

        rides
            .iter()
            .filter(|ride| {
                geo::distance_km(ride.pickup_lat, ride.pickup_lng, lat, lng) <= SURGE_RADIUS_KM
            })
            .count()
    }
}

/// The surge table. Pure so the boundaries are unit-testable.
pub fn multiplier_for(supply: usize, demand: usize) -> f64 {
    if supply == 0 {
        if demand > 0 {
            return MAX_SURGE;
        }
        return 1.0;
    }

    let ratio = demand as f64 / supply as f64;

    if ratio >= HIGH_SURGE_RATIO {
        MAX_SURGE
    } else if ratio >= MED_SURGE_RATIO {
        1.5
    } else if ratio >= LOW_SURGE_RATIO {
        1.25
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_supply_with_demand_is_max_surge() {
        assert_eq!(multiplier_for(0, 1), 2.0);
        assert_eq!(multiplier_for(0, 50), 2.0);
    }

    #[test]
    fn zero_supply_without_demand_is_flat() {
        assert_eq!(multiplier_for(0, 0), 1.0);
    }

    #[test]
    fn ratio_table_boundaries() {
        // ratio = 1.2 exactly
        assert_eq!(multiplier_for(5, 6), 1.25);
        // ratio = 1.5 exactly
        assert_eq!(multiplier_for(2, 3), 1.5);
        // ratio = 2.0 exactly
        assert_eq!(multiplier_for(3, 6), 2.0);
    }

    #[test]
    fn ratio_below_low_threshold_is_flat() {
        assert_eq!(multiplier_for(10, 0), 1.0);
        assert_eq!(multiplier_for(10, 11), 1.0);
    }

    #[test]
    fn ratio_between_thresholds() {
        // 1.3 -> 1.25 tier
        assert_eq!(multiplier_for(10, 13), 1.25);
        // 1.7 -> 1.5 tier
        assert_eq!(multiplier_for(10, 17), 1.5);
        // 3.0 -> capped at max
        assert_eq!(multiplier_for(10, 30), 2.0);
    }
}
