//! Shared types for candidate generation.

use data_loader::BookId;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Which stage produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CandidateSource {
    /// Genre/sub-genre overlap with the browsing set
    Content,
    /// Summed Pearson correlation against the browsing set
    ItemBased,
}

/// A scored book produced by one of the recommendation stages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub book_id: BookId,
    pub source: CandidateSource,
    pub score: f64,
}

impl Candidate {
    pub fn new(book_id: impl Into<BookId>, source: CandidateSource, score: f64) -> Self {
        Self {
            book_id: book_id.into(),
            source,
            score,
        }
    }
}

/// Sort candidates by score, highest first; equal scores by descending id.
///
/// This is the order produced by sorting `(score, id)` pairs ascending and
/// reversing the result.
pub fn rank_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.book_id.cmp(&a.book_id))
    });
}

/// Everything the recommenders need to know about what the user browsed.
#[derive(Debug, Clone, Default)]
pub struct BrowsingContext {
    /// Browsed ids in input order, duplicates kept
    pub browsed: Vec<BookId>,
    /// Same ids as a set, for membership tests
    pub browsed_set: HashSet<BookId>,
    /// Relative frequency of each genre/sub-genre tag across the browsed books
    pub tag_weights: HashMap<String, f64>,
    /// Total number of tag occurrences the weights were normalized by
    pub total_tags: usize,
}

impl BrowsingContext {
    /// Context with the browsed ids only; tag weights are left empty
    pub fn new<I, S>(browsed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<BookId>,
    {
        let browsed: Vec<BookId> = browsed.into_iter().map(Into::into).collect();
        let browsed_set = browsed.iter().cloned().collect();
        Self {
            browsed,
            browsed_set,
            tag_weights: HashMap::new(),
            total_tags: 0,
        }
    }

    pub fn contains(&self, book_id: &str) -> bool {
        self.browsed_set.contains(book_id)
    }

    pub fn is_empty(&self) -> bool {
        self.browsed.is_empty()
    }

    /// Weight of a tag, 0.0 when none of the browsed books carries it
    pub fn tag_weight(&self, tag: &str) -> f64 {
        self.tag_weights.get(tag).copied().unwrap_or(0.0)
    }
}
