//! Item-to-item similarity metrics over the ratings table.
//!
//! - `pearson_corr`: Pearson correlation of two books' ratings
//! - `prob_simm`: P(rated u | rated v), estimated from co-rating counts
//!
//! Both are pure functions of the `RatingsTable`. A book nobody rated has no
//! mean and no denominator; how that case is reported is decided by
//! `NoRatersPolicy`.

use crate::error::RecommendError;
use data_loader::{RatingValue, RatingsTable, UserId};
use std::collections::BTreeMap;
use tracing::debug;

/// What a metric yields when one of its books has no raters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoRatersPolicy {
    /// Surface `RecommendError::NoRaters`
    #[default]
    Strict,
    /// Treat the pair as carrying no signal (0.0)
    Zero,
}

impl NoRatersPolicy {
    /// Apply the policy to a metric result
    pub fn resolve(self, result: Result<f64, RecommendError>) -> Result<f64, RecommendError> {
        match (self, result) {
            (NoRatersPolicy::Zero, Err(RecommendError::NoRaters { book_id })) => {
                debug!("No raters for book {}, using 0.0", book_id);
                Ok(0.0)
            }
            (_, result) => result,
        }
    }
}

/// Raters of a book, or `NoRaters` if there are none
fn raters<'a>(
    ratings: &'a RatingsTable,
    book_id: &str,
) -> Result<&'a BTreeMap<UserId, RatingValue>, RecommendError> {
    ratings
        .get_book_ratings(book_id)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| RecommendError::NoRaters {
            book_id: book_id.to_string(),
        })
}

fn mean(raters: &BTreeMap<UserId, RatingValue>) -> f64 {
    let total: f64 = raters.values().map(|&r| r as f64).sum();
    total / raters.len() as f64
}

/// Pearson correlation between books `x` and `y`.
///
/// The means are taken over every rater of each book, while the covariance
/// and variances only cover users who rated both. Returns 0.0 when either
/// variance over the co-raters is zero (including when there are no
/// co-raters).
///
/// # Errors
/// `RecommendError::NoRaters` if `x` or `y` has no ratings (`x` checked first).
pub fn pearson_corr(ratings: &RatingsTable, x: &str, y: &str) -> Result<f64, RecommendError> {
    let x_raters = raters(ratings, x)?;
    let y_raters = raters(ratings, y)?;

    let rx = mean(x_raters);
    let ry = mean(y_raters);

    let mut top_sum = 0.0;
    let mut x_sum = 0.0;
    let mut y_sum = 0.0;

    for (user, &rating_x) in x_raters {
        if let Some(&rating_y) = y_raters.get(user) {
            let dx = rating_x as f64 - rx;
            let dy = rating_y as f64 - ry;
            top_sum += dx * dy;
            x_sum += dx * dx;
            y_sum += dy * dy;
        }
    }

    if x_sum == 0.0 || y_sum == 0.0 {
        return Ok(0.0);
    }
    Ok(top_sum / (x_sum.sqrt() * y_sum.sqrt()))
}

/// Conditional co-occurrence probability P(rated `u` | rated `v`).
///
/// (users who rated both) / (users who rated `v`), always in [0, 1].
///
/// # Errors
/// `RecommendError::NoRaters` if nobody rated `v`.
pub fn prob_simm(ratings: &RatingsTable, u: &str, v: &str) -> Result<f64, RecommendError> {
    let v_raters = raters(ratings, v)?;

    let both = match ratings.get_book_ratings(u) {
        Some(u_raters) => v_raters.keys().filter(|user| u_raters.contains_key(*user)).count(),
        None => 0,
    };

    Ok(both as f64 / v_raters.len() as f64)
}
