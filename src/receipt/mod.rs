pub mod model;
pub mod service;

pub use model::Receipt;
pub use service::ReceiptService;
