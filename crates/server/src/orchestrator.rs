//! # Recommendation Orchestrator
//!
//! This module coordinates the Top-N pipeline:
//! 1. Build the browsing context (fails on unknown book ids)
//! 2. Generate the content-based pool
//! 3. Re-rank the pool with the item-based recommender
//! 4. Truncate to N
//!
//! A single request is synchronous CPU-bound work over the shared
//! `DataIndex`. `recommend_batch` fans independent requests out to
//! `spawn_blocking` and collects them in request order.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::RecommenderConfig;
use data_loader::{BookId, DataIndex};
use pipeline::ItemBasedRecommender;
use sources::{BrowsingContext, Candidate, ContentSource, build_browsing_context};

/// Final recommendation returned to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRecommendation {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub score: f64,
    pub explanation: String,
}

/// One independent request for `recommend_batch`
#[derive(Debug, Clone)]
pub struct RecommendRequest {
    pub browsed: Vec<BookId>,
    pub limit: usize,
}

impl RecommendRequest {
    pub fn new<I, S>(browsed: I, limit: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<BookId>,
    {
        Self {
            browsed: browsed.into_iter().map(Into::into).collect(),
            limit,
        }
    }
}

/// Result of one batched request
#[derive(Debug, Clone)]
pub struct RecommendResponse {
    pub books: Vec<BookId>,
    pub elapsed: Duration,
}

/// Main orchestrator that coordinates the recommendation pipeline
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    data_index: Arc<DataIndex>,
    content: ContentSource,
    item_based: Arc<ItemBasedRecommender>,
    config: RecommenderConfig,
}

impl RecommendationOrchestrator {
    /// Orchestrator with the default configuration
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self::build(data_index, RecommenderConfig::default())
    }

    /// Orchestrator with a custom configuration
    ///
    /// # Errors
    /// Fails if the configuration does not validate
    pub fn with_config(data_index: Arc<DataIndex>, config: RecommenderConfig) -> Result<Self> {
        config.validate().context("Invalid recommender configuration")?;
        Ok(Self::build(data_index, config))
    }

    fn build(data_index: Arc<DataIndex>, config: RecommenderConfig) -> Self {
        let content = ContentSource::new(data_index.clone());
        let item_based = Arc::new(ItemBasedRecommender::new(
            data_index.clone(),
            config.co_occurrence_threshold,
            config.no_raters_policy,
        ));
        Self {
            data_index,
            content,
            item_based,
            config,
        }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn data_index(&self) -> &Arc<DataIndex> {
        &self.data_index
    }

    /// Main entry point: the top `n` book ids for a browsing list
    ///
    /// # Returns
    /// At most `n` ids, best first. Fewer if not enough books pass the
    /// co-rating threshold.
    pub fn recommend<S: AsRef<str>>(&self, browsed: &[S], n: usize) -> Result<Vec<BookId>> {
        let ranked = self.rank(browsed, n)?;
        Ok(ranked.into_iter().map(|c| c.book_id).collect())
    }

    /// Same ranking as `recommend`, enriched with book metadata and a short
    /// explanation of each score
    pub fn recommend_detailed<S: AsRef<str>>(
        &self,
        browsed: &[S],
        n: usize,
    ) -> Result<Vec<BookRecommendation>> {
        let context = self.build_browsing_context(browsed)?;
        let ranked = self.rank_with_context(&context, n)?;

        ranked
            .into_iter()
            .map(|candidate| self.describe(candidate, &context))
            .collect()
    }

    /// Run independent requests concurrently on the blocking pool.
    ///
    /// The outer error means a task panicked; each request carries its own
    /// result so one bad browsing list does not sink the batch.
    pub async fn recommend_batch(
        &self,
        requests: Vec<RecommendRequest>,
    ) -> Result<Vec<Result<RecommendResponse>>> {
        let handles: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let orchestrator = self.clone();
                tokio::task::spawn_blocking(move || -> Result<RecommendResponse> {
                    let start = Instant::now();
                    let books = orchestrator.recommend(&request.browsed, request.limit)?;
                    Ok(RecommendResponse {
                        books,
                        elapsed: start.elapsed(),
                    })
                })
            })
            .collect();

        let mut responses = Vec::with_capacity(handles.len());
        for handle in handles {
            responses.push(handle.await.context("Recommendation task panicked")?);
        }
        Ok(responses)
    }

    fn build_browsing_context<S: AsRef<str>>(&self, browsed: &[S]) -> Result<BrowsingContext> {
        build_browsing_context(self.data_index.catalog(), browsed)
            .context("Failed to build browsing context")
    }

    fn rank<S: AsRef<str>>(&self, browsed: &[S], n: usize) -> Result<Vec<Candidate>> {
        let context = self.build_browsing_context(browsed)?;
        self.rank_with_context(&context, n)
    }

    fn rank_with_context(&self, context: &BrowsingContext, n: usize) -> Result<Vec<Candidate>> {
        let start_time = Instant::now();

        let pool: Vec<BookId> = self
            .content
            .get_candidates(context, self.config.content_pool_size)
            .into_iter()
            .map(|c| c.book_id)
            .collect();
        debug!("Content pool: {} books", pool.len());

        let mut ranked = self
            .item_based
            .recommend(context, &pool)
            .context("Item-based re-ranking failed")?;
        debug!("Item-based stage kept {} books", ranked.len());

        ranked.truncate(n);

        info!(
            "Recommended {} books for {} browsed in {:.2?}",
            ranked.len(),
            context.browsed.len(),
            start_time.elapsed()
        );
        Ok(ranked)
    }

    fn describe(&self, candidate: Candidate, context: &BrowsingContext) -> Result<BookRecommendation> {
        let book = self
            .data_index
            .get_book(&candidate.book_id)
            .with_context(|| format!("Book {} missing from catalog", candidate.book_id))?;

        let correlations = self
            .item_based
            .scorer()
            .correlations(&candidate.book_id, context)?;
        let strongest = correlations
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1));

        let explanation = match strongest {
            Some((browsed_id, r)) => {
                let browsed_title = self
                    .data_index
                    .get_book(browsed_id)
                    .map(|b| b.title())
                    .unwrap_or(browsed_id.as_str());
                format!(
                    "Correlation sum {:.3} over {} browsed; closest to \"{}\" (r = {:.3})",
                    candidate.score,
                    correlations.len(),
                    browsed_title,
                    r
                )
            }
            None => format!("Correlation sum {:.3}", candidate.score),
        };

        Ok(BookRecommendation {
            book_id: candidate.book_id,
            title: book.title().to_string(),
            author: book.author().to_string(),
            score: candidate.score,
            explanation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Book;
    use sources::{NoRatersPolicy, RecommendError};

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    /// Five fantasy/sci-fi books with overlapping raters.
    ///
    /// "1" is the usual browsed book (rated by u1..u4). "2" and "3" track it,
    /// "4" runs against it, "5" shares a single rater, "6" has no ratings.
    fn build_test_data_index() -> Arc<DataIndex> {
        let mut data_index = DataIndex::new();

        data_index.insert_book(
            Book::new("1", "The Name of the Wind")
                .with_author("Patrick Rothfuss")
                .with_page_count(662)
                .with_genres(["Fantasy"])
                .with_sub_genres(["Epic"]),
        );
        data_index.insert_book(
            Book::new("2", "The Wise Man's Fear")
                .with_author("Patrick Rothfuss")
                .with_genres(["Fantasy"])
                .with_sub_genres(["Epic"]),
        );
        data_index.insert_book(
            Book::new("3", "Mistborn")
                .with_author("Brandon Sanderson")
                .with_genres(["Fantasy"]),
        );
        data_index.insert_book(
            Book::new("4", "Dune")
                .with_author("Frank Herbert")
                .with_genres(["Science Fiction"]),
        );
        data_index.insert_book(
            Book::new("5", "Neuromancer")
                .with_author("William Gibson")
                .with_genres(["Science Fiction"]),
        );
        data_index.insert_book(Book::new("6", "Unread").with_genres(["Poetry"]));

        for (user, rating) in [("u1", 5), ("u2", 4), ("u3", 2), ("u4", 1)] {
            data_index.insert_rating(user, "1", rating);
        }
        for (user, rating) in [("u1", 5), ("u2", 5), ("u3", 1), ("u4", 1)] {
            data_index.insert_rating(user, "2", rating);
        }
        for (user, rating) in [("u1", 4), ("u2", 4), ("u3", 2)] {
            data_index.insert_rating(user, "3", rating);
        }
        for (user, rating) in [("u1", 1), ("u2", 2), ("u3", 4), ("u4", 5)] {
            data_index.insert_rating(user, "4", rating);
        }
        data_index.insert_rating("u1", "5", 3);
        data_index.insert_rating("u9", "5", 3);

        data_index.compute_book_stats();
        Arc::new(data_index)
    }

    // ============================================================================
    // Unit Tests: recommend
    // ============================================================================

    #[test]
    fn test_recommend_ranks_and_truncates() {
        let orchestrator = RecommendationOrchestrator::new(build_test_data_index());

        let all = orchestrator.recommend(&["1"], 10).unwrap();
        assert_eq!(all.first().map(String::as_str), Some("2"));
        assert_eq!(all.last().map(String::as_str), Some("4"));
        assert!(!all.contains(&"1".to_string()));
        // "5" shares one of four raters, "6" has none
        assert!(!all.contains(&"5".to_string()));
        assert!(!all.contains(&"6".to_string()));

        let top = orchestrator.recommend(&["1"], 2).unwrap();
        assert_eq!(top, all[..2]);
    }

    #[test]
    fn test_recommend_zero_limit() {
        let orchestrator = RecommendationOrchestrator::new(build_test_data_index());
        assert!(orchestrator.recommend(&["1"], 0).unwrap().is_empty());
    }

    #[test]
    fn test_recommend_unknown_book() {
        let orchestrator = RecommendationOrchestrator::new(build_test_data_index());

        let err = orchestrator.recommend(&["1", "999"], 5).unwrap_err();
        assert_eq!(
            err.downcast_ref::<RecommendError>(),
            Some(&RecommendError::MissingItem { book_id: "999".into() })
        );
    }

    #[test]
    fn test_recommend_empty_browsing() {
        let orchestrator = RecommendationOrchestrator::new(build_test_data_index());
        let browsed: [&str; 0] = [];
        assert!(orchestrator.recommend(&browsed, 5).unwrap().is_empty());
    }

    #[test]
    fn test_recommend_unrated_browsed_book() {
        let data_index = build_test_data_index();

        let strict = RecommendationOrchestrator::new(data_index.clone());
        let err = strict.recommend(&["1", "6"], 5).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RecommendError>(),
            Some(RecommendError::NoRaters { book_id }) if book_id == "6"
        ));

        let config = RecommenderConfig::default().with_no_raters_policy(NoRatersPolicy::Zero);
        let lenient = RecommendationOrchestrator::with_config(data_index, config).unwrap();
        let books = lenient.recommend(&["1", "6"], 5).unwrap();
        assert!(!books.is_empty());
        assert!(!books.contains(&"6".to_string()));
    }

    #[test]
    fn test_small_pool_limits_results() {
        let config = RecommenderConfig::default().with_content_pool_size(1);
        let orchestrator =
            RecommendationOrchestrator::with_config(build_test_data_index(), config).unwrap();

        // Content order starts with "2" (shares Fantasy and Epic)
        assert_eq!(orchestrator.recommend(&["1"], 10).unwrap(), ["2"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RecommenderConfig::default().with_co_occurrence_threshold(2.0);
        assert!(RecommendationOrchestrator::with_config(build_test_data_index(), config).is_err());
    }

    // ============================================================================
    // Unit Tests: recommend_detailed
    // ============================================================================

    #[test]
    fn test_recommend_detailed_matches_recommend() {
        let orchestrator = RecommendationOrchestrator::new(build_test_data_index());

        let ids = orchestrator.recommend(&["1"], 3).unwrap();
        let detailed = orchestrator.recommend_detailed(&["1"], 3).unwrap();

        let detailed_ids: Vec<BookId> = detailed.iter().map(|r| r.book_id.clone()).collect();
        assert_eq!(ids, detailed_ids);

        let first = &detailed[0];
        assert_eq!(first.title, "The Wise Man's Fear");
        assert_eq!(first.author, "Patrick Rothfuss");
        assert!(first.score > 0.0);
        assert!(first.explanation.contains("The Name of the Wind"));
    }

    // ============================================================================
    // Unit Tests: recommend_batch
    // ============================================================================

    #[tokio::test]
    async fn test_recommend_batch_preserves_order() {
        let orchestrator = RecommendationOrchestrator::new(build_test_data_index());

        let requests = vec![
            RecommendRequest::new(["1"], 1),
            RecommendRequest::new(["404"], 3),
            RecommendRequest::new(["1"], 3),
        ];

        let responses = orchestrator.recommend_batch(requests).await.unwrap();
        assert_eq!(responses.len(), 3);

        let first = responses[0].as_ref().unwrap();
        assert_eq!(first.books, ["2"]);
        assert!(responses[1].is_err());

        let third = responses[2].as_ref().unwrap();
        assert_eq!(third.books, orchestrator.recommend(&["1"], 3).unwrap());
    }

    #[tokio::test]
    async fn test_recommend_batch_empty() {
        let orchestrator = RecommendationOrchestrator::new(build_test_data_index());
        let responses = orchestrator.recommend_batch(Vec::new()).await.unwrap();
        assert!(responses.is_empty());
    }
}
