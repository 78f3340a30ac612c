//! Errors raised while building recommendations.

use data_loader::BookId;
use thiserror::Error;

/// Failures of the recommendation core.
///
/// Both are data-consistency problems: retrying with the same tables
/// reproduces them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    /// A browsed book is not in the catalog, so its genres are unknown
    #[error("Book {book_id} is not in the catalog")]
    MissingItem { book_id: BookId },

    /// A similarity metric needed a book that nobody has rated
    #[error("Book {book_id} has no ratings")]
    NoRaters { book_id: BookId },
}
