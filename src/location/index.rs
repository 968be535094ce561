//! Location index trait and in-memory adapter.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::geo;

/// Location index failure (e.g. a remote geo store being unreachable).
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location index unavailable: {0}")]
    Unavailable(String),
}

/// A driver's position relative to a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverPosition {
    pub driver_id: Uuid,
    pub lat: f64,
    pub lng: f64,
    pub distance_km: f64,
}

/// Geospatial set of driver positions with radius queries.
#[async_trait]
pub trait LocationIndex: Send + Sync {
    /// Store or overwrite a driver's position.
    async fn upsert(&self, driver_id: Uuid, lat: f64, lng: f64) -> Result<(), LocationError>;

    /// Drivers within `radius_km` of the query point, ascending by distance.
    async fn nearby(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> Result<Vec<DriverPosition>, LocationError>;

    /// Remove a driver's position. Removing a missing driver is not an error.
    async fn remove(&self, driver_id: Uuid) -> Result<(), LocationError>;
}

/// In-memory location index.
#[derive(Debug, Default)]
pub struct InMemoryLocationIndex {
    positions: RwLock<HashMap<Uuid, (f64, f64)>>,
}

impl InMemoryLocationIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocationIndex for InMemoryLocationIndex {
    async fn upsert(&self, driver_id: Uuid, lat: f64, lng: f64) -> Result<(), LocationError> {
        self.positions.write().await.insert(driver_id, (lat, lng));
        Ok(())
    }

    async fn nearby(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> Result<Vec<DriverPosition>, LocationError> {
        let positions = self.positions.read().await;

        let mut results: Vec<DriverPosition> = positions
            .iter()
            .filter_map(|(id, (d_lat, d_lng))| {
                let distance_km = geo::distance_km(lat, lng, *d_lat, *d_lng);
                if distance_km <= radius_km {
                    Some(DriverPosition {
                        driver_id: *id,
                        lat: *d_lat,
                        lng: *d_lng,
                        distance_km,
                    })
                } else {
                    None
                }
            })
            .collect();

        results.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(results)
    }

    async fn remove(&self, driver_id: Uuid) -> Result<(), LocationError> {
        self.positions.write().await.remove(&driver_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_overwrites_previous_position() {
        let index = InMemoryLocationIndex::new();
        let driver = Uuid::new_v4();

        index.upsert(driver, 12.0, 77.0).await.unwrap();
        index.upsert(driver, 12.5, 77.5).await.unwrap();

        let nearby = index.nearby(12.5, 77.5, 1.0).await.unwrap();
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].lat, 12.5);
        assert_eq!(nearby[0].lng, 77.5);
    }

    #[tokio::test]
    async fn repeated_identical_upserts_are_idempotent() {
        let index = InMemoryLocationIndex::new();
        let driver = Uuid::new_v4();

        index.upsert(driver, 12.0, 77.0).await.unwrap();
        let first = index.nearby(12.0, 77.0, 1.0).await.unwrap();

        index.upsert(driver, 12.0, 77.0).await.unwrap();
        let second = index.nearby(12.0, 77.0, 1.0).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn nearby_sorts_ascending_by_distance() {
        let index = InMemoryLocationIndex::new();
        let near = Uuid::new_v4();
        let nearer = Uuid::new_v4();
        let far = Uuid::new_v4();

        index.upsert(near, 12.02, 77.0).await.unwrap();
        index.upsert(nearer, 12.005, 77.0).await.unwrap();
        index.upsert(far, 12.04, 77.0).await.unwrap();

        let nearby = index.nearby(12.0, 77.0, 10.0).await.unwrap();
        assert_eq!(nearby.len(), 3);
        assert_eq!(nearby[0].driver_id, nearer);
        assert_eq!(nearby[1].driver_id, near);
        assert_eq!(nearby[2].driver_id, far);
        assert!(nearby[0].distance_km <= nearby[1].distance_km);
        assert!(nearby[1].distance_km <= nearby[2].distance_km);
    }

    #[tokio::test]
    async fn nearby_excludes_drivers_outside_radius() {
        let index = InMemoryLocationIndex::new();
        let close = Uuid::new_v4();
        let distant = Uuid::new_v4();

        index.upsert(close, 12.01, 77.0).await.unwrap();
        // Roughly 110 km north of the query point.
        index.upsert(distant, 13.0, 77.0).await.unwrap();

        let nearby = index.nearby(12.0, 77.0, 5.0).await.unwrap();
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].driver_id, close);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let index = InMemoryLocationIndex::new();
        let driver = Uuid::new_v4();

        index.upsert(driver, 12.0, 77.0).await.unwrap();
        index.remove(driver).await.unwrap();
        index.remove(driver).await.unwrap();
        index.remove(Uuid::new_v4()).await.unwrap();

        let nearby = index.nearby(12.0, 77.0, 5.0).await.unwrap();
        assert!(nearby.is_empty());
    }
}
