//! Item-based re-ranking of book candidates.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate admission
//! - FilterPipeline for composing filters
//! - CorrelationScorer for summed Pearson scores
//! - ItemBasedRecommender tying the three together
//!
//! ## Architecture
//! The pipeline processes a content-based pool in stages:
//! 1. Filters remove browsed books, repeats, and books rarely co-rated with
//!    the browsing set
//! 2. CorrelationScorer scores what is left against every browsed book
//! 3. Survivors are ranked, highest score first
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::ItemBasedRecommender;
//! use sources::NoRatersPolicy;
//!
//! let item_based = ItemBasedRecommender::new(index.clone(), 0.35, NoRatersPolicy::Strict);
//! let ranked = item_based.recommend(&context, &pool)?;
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod item_based;
pub mod scorer;
pub mod traits;

// Re-export main types
pub use filter_pipeline::FilterPipeline;
pub use filters::co_occurrence::DEFAULT_CO_OCCURRENCE_THRESHOLD;
pub use item_based::ItemBasedRecommender;
pub use scorer::CorrelationScorer;
pub use traits::Filter;
