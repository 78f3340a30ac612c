//! Filter that keeps one candidate per book.

use crate::traits::Filter;
use anyhow::Result;
use sources::{BrowsingContext, Candidate};
use std::collections::HashSet;

/// Drops repeated book ids, keeping the first occurrence.
///
/// A candidate pool handed in by a caller may list the same book twice;
/// each book is admitted at most once.
pub struct DistinctFilter;

impl Filter for DistinctFilter {
    fn name(&self) -> &str {
        "DistinctFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        _context: &BrowsingContext,
    ) -> Result<Vec<Candidate>> {
        let mut seen = HashSet::with_capacity(candidates.len());
        Ok(candidates
            .into_iter()
            .filter(|candidate| seen.insert(candidate.book_id.clone()))
            .collect())
    }
}
