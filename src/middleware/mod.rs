//! Middleware for the ridehail API

mod logging;

pub use logging::log_requests;
