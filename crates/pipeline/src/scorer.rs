//! Collaborative scoring of admitted candidates.
//!
//! Each candidate's score is the sum of its Pearson correlations with every
//! browsed book (a book browsed twice is counted twice).

use anyhow::Result;
use data_loader::{BookId, DataIndex};
use rayon::prelude::*;
use sources::{BrowsingContext, Candidate, CandidateSource, NoRatersPolicy, RecommendError, pearson_corr};
use std::sync::Arc;

/// Scores candidates by summed Pearson correlation against the browsing set.
///
/// ## Performance Note
/// Candidates are scored in parallel with Rayon; the output keeps the
/// input order.
#[derive(Clone)]
pub struct CorrelationScorer {
    data_index: Arc<DataIndex>,
    policy: NoRatersPolicy,
}

impl CorrelationScorer {
    /// Create a new CorrelationScorer.
    pub fn new(data_index: Arc<DataIndex>, policy: NoRatersPolicy) -> Self {
        Self { data_index, policy }
    }

    /// Replace each candidate's score with its summed correlation.
    ///
    /// # Returns
    /// The same candidates, in the same order, tagged `CandidateSource::ItemBased`
    pub fn score_candidates(
        &self,
        candidates: Vec<Candidate>,
        context: &BrowsingContext,
    ) -> Result<Vec<Candidate>> {
        let scored = candidates
            .into_par_iter()
            .map(|candidate| {
                let score = self.score_single(&candidate.book_id, context)?;
                Ok(Candidate {
                    score,
                    source: CandidateSource::ItemBased,
                    ..candidate
                })
            })
            .collect::<std::result::Result<Vec<_>, RecommendError>>()?;
        Ok(scored)
    }

    /// Σ pearson_corr(book, i) over the browsed books, in browsing order.
    pub fn score_single(
        &self,
        book_id: &str,
        context: &BrowsingContext,
    ) -> std::result::Result<f64, RecommendError> {
        let mut score = 0.0;
        for browsed in &context.browsed {
            score += self.correlation(book_id, browsed)?;
        }
        Ok(score)
    }

    /// Per-browsed-book correlations, for explaining a score
    pub fn correlations(
        &self,
        book_id: &str,
        context: &BrowsingContext,
    ) -> std::result::Result<Vec<(BookId, f64)>, RecommendError> {
        context
            .browsed
            .iter()
            .map(|browsed| Ok((browsed.clone(), self.correlation(book_id, browsed)?)))
            .collect()
    }

    fn correlation(&self, book_id: &str, browsed: &str) -> std::result::Result<f64, RecommendError> {
        self.policy
            .resolve(pearson_corr(self.data_index.ratings(), book_id, browsed))
    }
}
