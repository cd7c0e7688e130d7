//! Core budget logic for Fambud.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached only through the store traits in [`store`].
//!
//! # Modules
//!
//! - `store` - Entity store traits and the in-memory backend
//! - `budget` - Budget aggregate types and cascade orchestration
//! - `category` - Single-category operations
//! - `transaction` - Single-transaction operations
//! - `classify` - Keyword-based transaction classification
//! - `summary` - Period summaries by category
//! - `import` - Bank statement CSV import with deduplication

pub mod budget;
pub mod category;
pub mod classify;
pub mod import;
pub mod store;
pub mod summary;
pub mod transaction;
