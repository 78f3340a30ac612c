//! Filter implementations for the candidate pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod already_browsed;
pub mod co_occurrence;
pub mod distinct;

// Re-export for convenience
pub use already_browsed::AlreadyBrowsedFilter;
pub use co_occurrence::CoOccurrenceFilter;
pub use distinct::DistinctFilter;
