//! # Data Loader Crate
//!
//! This crate handles loading and indexing the GoodReads book dataset.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Book, Catalog, RatingsTable, DataIndex)
//! - **parser**: Parse the CSV files into Rust structs
//! - **index**: Build the index, compute stats, validate references
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data/goodreads"))?;
//!
//! let book = index.get_book("398201883").unwrap();
//! println!("{} by {}", book.title(), book.author());
//! println!("{} raters", index.ratings().rater_count(&book.id));
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{BOOKS_FILE_NAME, RATINGS_FILE_NAME};
pub use types::{
    // Type aliases
    BookId,
    UserId,
    RatingValue,
    // Core types
    Book,
    Rating,
    BookStats,
    Catalog,
    RatingsTable,
    DataIndex,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_index_creation() {
        let index = DataIndex::new();
        let (books, users, ratings) = index.counts();

        assert_eq!(books, 0);
        assert_eq!(users, 0);
        assert_eq!(ratings, 0);
    }

    #[test]
    fn test_insert_book() {
        let mut index = DataIndex::new();

        let book = Book::new("1", "The Hobbit")
            .with_author("J.R.R. Tolkien")
            .with_page_count(310)
            .with_genres(["Fantasy", "Classics"])
            .with_sub_genres(["High Fantasy"]);

        index.insert_book(book);

        let retrieved = index.get_book("1").unwrap();
        assert_eq!(retrieved.title(), "The Hobbit");
        assert_eq!(retrieved.author(), "J.R.R. Tolkien");
        assert_eq!(retrieved.page_count(), Some(310));
        assert_eq!(retrieved.tags().collect::<Vec<_>>(), ["Fantasy", "Classics", "High Fantasy"]);
    }

    #[test]
    fn test_insert_rating() {
        let mut index = DataIndex::new();

        index.insert_rating("u1", "b1", 4);
        index.insert_rating("u2", "b1", 2);

        assert_eq!(index.ratings().rater_count("b1"), 2);
        assert_eq!(index.ratings().get_rating("u1", "b1"), Some(4));
        assert_eq!(index.ratings().get_user_ratings("u2").unwrap().len(), 1);
    }

    #[test]
    fn test_rerating_keeps_latest() {
        let mut table = RatingsTable::new();
        table.insert_rating("u1", "b1", 1);
        table.insert_rating("u1", "b1", 5);

        assert_eq!(table.rater_count("b1"), 1);
        assert_eq!(table.rating_count(), 1);
        assert_eq!(table.get_rating("u1", "b1"), Some(5));
    }

    #[test]
    fn test_empty_queries() {
        let index = DataIndex::new();

        assert!(index.get_book("999").is_none());
        assert!(index.get_book_stats("999").is_none());
        assert!(index.ratings().get_user_ratings("999").is_none());
        assert!(index.ratings().get_book_ratings("999").is_none());
        assert_eq!(index.ratings().rater_count("999"), 0);
    }
}
