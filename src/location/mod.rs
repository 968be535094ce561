//! Driver location index: radius queries over last-known driver positions.
//!
//! The index is ephemeral and non-authoritative. It answers "who is near this
//! pickup", never "who may be assigned" - driver eligibility is always decided
//! against the store, under the driver lock.

mod index;

pub use index::{DriverPosition, InMemoryLocationIndex, LocationError, LocationIndex};
