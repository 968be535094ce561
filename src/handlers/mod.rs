//! API handlers, one module per domain

pub mod driver;
pub mod payment;
pub mod ride;
pub mod trip;
pub mod user;
