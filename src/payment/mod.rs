pub mod model;
pub mod psp;
pub mod service;

pub use model::*;
pub use psp::{MockPsp, Psp};
pub use service::PaymentService;
