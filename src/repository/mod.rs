//! sqlx repositories, one module per table.
//!
//! Every function is generic over [`sqlx::PgExecutor`], so the same query
//! code runs against the pool or against a `&mut *tx` transaction handle.
//! Writes that must be atomic (assignment, trip start, trip end, cancel)
//! are grouped into a transaction by the calling service.

pub mod drivers;
pub mod payments;
pub mod receipts;
pub mod rides;
pub mod trips;
pub mod users;
