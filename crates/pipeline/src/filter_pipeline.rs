//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::traits::Filter;
use anyhow::Result;
use sources::{BrowsingContext, Candidate};

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(AlreadyBrowsedFilter)
///     .add_filter(DistinctFilter)
///     .add_filter(CoOccurrenceFilter::new(index.clone(), 0.35, NoRatersPolicy::Strict));
///
/// let filtered = pipeline.apply(candidates, &context)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    ///
    /// # Arguments
    /// * `filter` - Any type implementing the Filter trait
    ///
    /// # Returns
    /// Self for method chaining
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the filters, in the order they run
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// ## Algorithm
    /// 1. Start with the input candidates
    /// 2. For each filter in order:
    ///    a. Log filter name and input count
    ///    b. Apply the filter
    ///    c. Log output count
    /// 3. Return final filtered set
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter
    /// * `context` - Browsing context for filtering decisions
    ///
    /// # Returns
    /// * `Ok(Vec<Candidate>)` - The filtered candidates after all filters
    /// * `Err` - If any filter fails
    pub fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &BrowsingContext,
    ) -> Result<Vec<Candidate>> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, context)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{AlreadyBrowsedFilter, DistinctFilter};
    use sources::CandidateSource;

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let context = BrowsingContext::new(["1"]);

        let candidates = vec![
            Candidate::new("1", CandidateSource::Content, 0.9),
            Candidate::new("2", CandidateSource::Content, 0.8),
        ];

        assert!(pipeline.is_empty());
        let filtered = pipeline.apply(candidates, &context).unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_filters_run_in_order() {
        let context = BrowsingContext::new(["1"]);

        let pipeline = FilterPipeline::new()
            .add_filter(AlreadyBrowsedFilter)
            .add_filter(DistinctFilter);
        assert_eq!(
            pipeline.filter_names(),
            ["AlreadyBrowsedFilter", "DistinctFilter"]
        );

        let candidates = vec![
            Candidate::new("1", CandidateSource::Content, 0.9),
            Candidate::new("2", CandidateSource::Content, 0.8),
            Candidate::new("2", CandidateSource::Content, 0.7),
            Candidate::new("3", CandidateSource::Content, 0.6),
        ];

        let filtered = pipeline.apply(candidates, &context).unwrap();
        let ids: Vec<&str> = filtered.iter().map(|c| c.book_id.as_str()).collect();
        assert_eq!(ids, ["2", "3"]);
        assert_eq!(filtered[0].score, 0.8);
    }
}
