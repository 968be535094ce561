//! Route definitions, one Router fragment per domain

mod driver;
mod payment;
mod ride;
mod trip;
mod user;

pub use driver::driver_routes;
pub use payment::payment_routes;
pub use ride::ride_routes;
pub use trip::trip_routes;
pub use user::user_routes;
