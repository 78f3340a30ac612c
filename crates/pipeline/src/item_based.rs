//! Item-based collaborative re-ranking of a candidate pool.
//!
//! ## Stages
//! 1. Drop browsed books and repeated ids from the pool
//! 2. Admit books co-rated with at least one browsed book often enough
//!    (`CoOccurrenceFilter`)
//! 3. Score survivors by summed Pearson correlation (`CorrelationScorer`)
//! 4. Rank, highest score first, equal scores by descending id
//!
//! No truncation happens here; the caller decides how many to keep.

use crate::filter_pipeline::FilterPipeline;
use crate::filters::{AlreadyBrowsedFilter, CoOccurrenceFilter, DistinctFilter};
use crate::scorer::CorrelationScorer;
use anyhow::Result;
use data_loader::{BookId, DataIndex};
use sources::{BrowsingContext, Candidate, CandidateSource, NoRatersPolicy, rank_candidates};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Re-ranks a pool of book ids by rating correlation with the browsing set
pub struct ItemBasedRecommender {
    pipeline: FilterPipeline,
    scorer: CorrelationScorer,
    threshold: f64,
}

impl ItemBasedRecommender {
    /// # Arguments
    /// * `data_index` - Shared ratings and catalog
    /// * `threshold` - Minimum co-rating probability for admission
    /// * `policy` - How to treat a book without raters
    pub fn new(data_index: Arc<DataIndex>, threshold: f64, policy: NoRatersPolicy) -> Self {
        let pipeline = FilterPipeline::new()
            .add_filter(AlreadyBrowsedFilter)
            .add_filter(DistinctFilter)
            .add_filter(CoOccurrenceFilter::new(data_index.clone(), threshold, policy));

        Self {
            pipeline,
            scorer: CorrelationScorer::new(data_index, policy),
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn scorer(&self) -> &CorrelationScorer {
        &self.scorer
    }

    /// Filter, score and rank `pool` against the browsing context.
    ///
    /// Every returned book is in `pool`, was not browsed, and reached the
    /// co-rating threshold against some browsed book.
    #[instrument(skip_all, fields(pool = pool.len(), browsed = context.browsed.len()))]
    pub fn recommend(&self, context: &BrowsingContext, pool: &[BookId]) -> Result<Vec<Candidate>> {
        let candidates: Vec<Candidate> = pool
            .iter()
            .map(|id| Candidate::new(id.clone(), CandidateSource::ItemBased, 0.0))
            .collect();

        let admitted = self.pipeline.apply(candidates, context)?;
        debug!("{} of {} pool books admitted", admitted.len(), pool.len());

        let mut scored = self.scorer.score_candidates(admitted, context)?;
        rank_candidates(&mut scored);
        Ok(scored)
    }
}
