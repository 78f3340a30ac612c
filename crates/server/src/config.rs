//! Tunables for the recommendation pipeline.

use pipeline::DEFAULT_CO_OCCURRENCE_THRESHOLD;
use sources::NoRatersPolicy;
use thiserror::Error;

/// Size of the content-based pool handed to the item-based stage
pub const DEFAULT_CONTENT_POOL_SIZE: usize = 60;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Co-occurrence threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
}

/// Pipeline settings. `Default` gives the standard pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommenderConfig {
    pub content_pool_size: usize,
    pub co_occurrence_threshold: f64,
    pub no_raters_policy: NoRatersPolicy,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            content_pool_size: DEFAULT_CONTENT_POOL_SIZE,
            co_occurrence_threshold: DEFAULT_CO_OCCURRENCE_THRESHOLD,
            no_raters_policy: NoRatersPolicy::default(),
        }
    }
}

impl RecommenderConfig {
    pub fn with_content_pool_size(mut self, size: usize) -> Self {
        self.content_pool_size = size;
        self
    }

    pub fn with_co_occurrence_threshold(mut self, threshold: f64) -> Self {
        self.co_occurrence_threshold = threshold;
        self
    }

    pub fn with_no_raters_policy(mut self, policy: NoRatersPolicy) -> Self {
        self.no_raters_policy = policy;
        self
    }

    /// Reject settings no probability can be compared against
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.co_occurrence_threshold) {
            return Err(ConfigError::InvalidThreshold(self.co_occurrence_threshold));
        }
        Ok(())
    }
}
