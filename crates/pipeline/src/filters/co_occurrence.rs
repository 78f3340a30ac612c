//! Filter to keep books that tend to be rated alongside the browsed ones.
//!
//! This is the admission step of the item-based stage: correlations are only
//! worth computing for books that share enough raters with what the user
//! browsed.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::DataIndex;
use rayon::prelude::*;
use sources::{BrowsingContext, Candidate, NoRatersPolicy, RecommendError, prob_simm};
use std::sync::Arc;

/// Default minimum P(rated candidate | rated browsed book)
pub const DEFAULT_CO_OCCURRENCE_THRESHOLD: f64 = 0.35;

/// Keeps candidates whose co-rating probability reaches the threshold
/// against at least one browsed book.
///
/// ## Algorithm
/// For each candidate j, compute prob_simm(j, i) for every browsed book i.
/// Keep j if any of them is >= threshold.
///
/// Every pair is evaluated, so a browsed book without raters is reported
/// (under `NoRatersPolicy::Strict`) whenever there is anything to filter,
/// not only when it happens to be reached first.
pub struct CoOccurrenceFilter {
    data_index: Arc<DataIndex>,
    threshold: f64,
    policy: NoRatersPolicy,
}

impl CoOccurrenceFilter {
    /// Create a new CoOccurrenceFilter.
    ///
    /// # Arguments
    /// * `data_index` - Shared reference to DataIndex for rating lookups
    /// * `threshold` - Minimum conditional probability (typically 0.35)
    /// * `policy` - What to do when a browsed book has no raters
    pub fn new(data_index: Arc<DataIndex>, threshold: f64, policy: NoRatersPolicy) -> Self {
        Self {
            data_index,
            threshold,
            policy,
        }
    }

    /// Highest prob_simm(candidate, i) over the browsed books
    fn best_probability(
        &self,
        book_id: &str,
        context: &BrowsingContext,
    ) -> std::result::Result<f64, RecommendError> {
        let ratings = self.data_index.ratings();
        let mut best = 0.0f64;
        for browsed in &context.browsed {
            let p = self.policy.resolve(prob_simm(ratings, book_id, browsed))?;
            best = best.max(p);
        }
        Ok(best)
    }
}

impl Filter for CoOccurrenceFilter {
    fn name(&self) -> &str {
        "CoOccurrenceFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &BrowsingContext,
    ) -> Result<Vec<Candidate>> {
        if context.is_empty() {
            return Ok(Vec::new());
        }

        let kept: Vec<Option<Candidate>> = candidates
            .into_par_iter()
            .map(|candidate| -> std::result::Result<Option<Candidate>, RecommendError> {
                let best = self.best_probability(&candidate.book_id, context)?;
                Ok((best >= self.threshold).then_some(candidate))
            })
            .collect::<std::result::Result<_, RecommendError>>()?;

        Ok(kept.into_iter().flatten().collect())
    }
}
