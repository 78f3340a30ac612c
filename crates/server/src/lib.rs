//! Server crate for the book recommendation engine.
//!
//! This crate contains the orchestrator that runs the Top-N pipeline
//! (content pool, item-based re-rank, truncation) and its configuration.

pub mod config;
pub mod orchestrator;

pub use config::{ConfigError, DEFAULT_CONTENT_POOL_SIZE, RecommenderConfig};
pub use orchestrator::{
    BookRecommendation, RecommendRequest, RecommendResponse, RecommendationOrchestrator,
};
