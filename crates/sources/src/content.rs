//! Content Source - genre/sub-genre overlap with the browsing set
//!
//! Shrinks the whole catalog to a candidate pool for the collaborative stage.
//!
//! ## Algorithm
//! 1. Take the tag weights from the BrowsingContext (relative frequency of
//!    each genre and sub-genre across the browsed books)
//! 2. Score every catalog book that was not browsed by summing the weights
//!    of its tags; tags the user never saw contribute nothing
//! 3. Rank by score (ties by descending id) and keep the first `limit`
//!
//! Zero-scored books are kept, so the output length is always
//! `min(limit, catalog size - browsed books)`.

use crate::types::{Candidate, CandidateSource, BrowsingContext, rank_candidates};
use data_loader::{Book, DataIndex};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Content-based candidate source over the whole catalog
#[derive(Clone)]
pub struct ContentSource {
    /// Shared reference to the data index (read-only, so no Mutex needed)
    data_index: Arc<DataIndex>,
}

impl ContentSource {
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self { data_index }
    }

    /// Generate the top `limit` content candidates for a browsing context
    #[instrument(skip(self, context), fields(browsed = context.browsed.len()))]
    pub fn get_candidates(&self, context: &BrowsingContext, limit: usize) -> Vec<Candidate> {
        debug!(
            "Scoring catalog of {} books against {} browsed tags",
            self.data_index.catalog().len(),
            context.tag_weights.len()
        );

        let books: Vec<&Book> = self.data_index.catalog().books().collect();

        let mut candidates: Vec<Candidate> = books
            .par_iter()
            .filter(|book| !context.contains(&book.id))
            .map(|book| {
                Candidate::new(
                    book.id.clone(),
                    CandidateSource::Content,
                    score_book(book, context),
                )
            })
            .collect();

        rank_candidates(&mut candidates);
        candidates.truncate(limit);

        debug!("Generated {} content candidates", candidates.len());
        candidates
    }
}

/// Sum of the browsing-set weights of every tag on the book
fn score_book(book: &Book, context: &BrowsingContext) -> f64 {
    book.tags().map(|tag| context.tag_weight(tag)).sum()
}
