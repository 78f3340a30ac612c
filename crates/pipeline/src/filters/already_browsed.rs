//! Filter to remove books the user has already browsed.
//!
//! Runs first in the item-based stage: a browsed book is never its own
//! recommendation.

use crate::traits::Filter;
use anyhow::Result;
use sources::{BrowsingContext, Candidate};

/// Removes candidates that appear in the browsing set.
///
/// Uses the HashSet in BrowsingContext.browsed_set for O(1) lookups.
pub struct AlreadyBrowsedFilter;

impl Filter for AlreadyBrowsedFilter {
    fn name(&self) -> &str {
        "AlreadyBrowsedFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &BrowsingContext,
    ) -> Result<Vec<Candidate>> {
        Ok(candidates
            .into_iter()
            .filter(|candidate| !context.contains(&candidate.book_id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sources::CandidateSource;

    #[test]
    fn test_already_browsed_filter() {
        let context = BrowsingContext::new(["100", "200", "100"]);

        let candidates = vec![
            Candidate::new("100", CandidateSource::Content, 0.9),
            Candidate::new("101", CandidateSource::Content, 0.8),
            Candidate::new("200", CandidateSource::Content, 0.7),
            Candidate::new("300", CandidateSource::Content, 0.6),
        ];

        let filtered = AlreadyBrowsedFilter.apply(candidates, &context).unwrap();

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].book_id, "101");
        assert_eq!(filtered[1].book_id, "300");
    }
}
