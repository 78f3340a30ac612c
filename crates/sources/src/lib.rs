//! # Sources Crate
//!
//! Candidate generation and similarity metrics for book recommendations.
//!
//! ## Components
//!
//! ### Browsing Context
//! Everything known about the request: the browsed ids and the relative
//! frequency of each genre/sub-genre across them.
//!
//! ### Content Source
//! Scores every catalog book by frequency-weighted tag overlap with the
//! browsing set and keeps the best ones as the candidate pool.
//!
//! ### Similarity Metrics
//! - Pearson correlation between two books' ratings
//! - Conditional co-rating probability P(rated u | rated v)
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{ContentSource, browsing_context::build_browsing_context};
//! use data_loader::DataIndex;
//! use std::sync::Arc;
//!
//! let data_index = Arc::new(DataIndex::load_from_files("data/goodreads".as_ref())?);
//! let context = build_browsing_context(data_index.catalog(), &["398201883", "204328712"])?;
//!
//! let content = ContentSource::new(data_index.clone());
//! let pool = content.get_candidates(&context, 60);
//! ```

pub mod browsing_context;
pub mod content;
pub mod error;
pub mod similarity;
pub mod types;

// Re-export commonly used types
pub use browsing_context::build_browsing_context;
pub use content::ContentSource;
pub use error::RecommendError;
pub use similarity::{NoRatersPolicy, pearson_corr, prob_simm};
pub use types::{BrowsingContext, Candidate, CandidateSource, rank_candidates};
