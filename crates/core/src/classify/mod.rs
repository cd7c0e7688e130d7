//! Keyword-based transaction classification.
//!
//! A mapping table of `(keyword, category name)` pairs is loaded once per
//! run. Each transaction takes the category of the FIRST rule, in table
//! order, whose keyword occurs in its description ignoring case. The rule
//! order is significant: there is no longest-match or word-boundary logic.

mod error;
mod mapping;
mod service;


pub use error::ClassifyError;
pub use mapping::{MappingRule, MappingSource, MappingTable};
pub use service::{ClassificationReport, ClassifierService};
