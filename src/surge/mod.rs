pub mod service;

pub use service::{multiplier_for, SurgeService, SURGE_RADIUS_KM};
