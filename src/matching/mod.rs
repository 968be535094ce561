pub mod service;

pub use service::{MatchRequest, MatchResult, MatchingService};
