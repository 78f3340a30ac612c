//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to candidate sets.

use anyhow::Result;
use sources::{BrowsingContext, Candidate};

/// Core trait for filtering candidates.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be used in concurrent contexts
/// - Filters take ownership of the Vec<Candidate> and return a filtered Vec
/// - Filters keep the relative order of the candidates they let through
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `context` - What the user browsed
    ///
    /// # Returns
    /// * `Ok(Vec<Candidate>)` - The filtered candidates
    /// * `Err` - If filtering fails
    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &BrowsingContext,
    ) -> Result<Vec<Candidate>>;
}
