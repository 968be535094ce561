pub mod fare;
pub mod model;
pub mod service;

pub use fare::{apply_surge, calculate_base_fare, effective_seconds, FareParams};
pub use model::*;
pub use service::TripService;
