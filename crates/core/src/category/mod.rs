//! Single-category operations outside the aggregate cascade.

mod error;
mod service;

pub use error::CategoryError;
pub use service::CategoryService;
