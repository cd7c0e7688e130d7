//! Single-transaction operations outside the aggregate cascade.

mod error;
mod service;

pub use error::TransactionError;
pub use service::TransactionService;
