//! DataIndex building and indexing logic.
//!
//! This module builds the DataIndex from parsed data:
//! - Build the catalog (rejecting duplicate book ids)
//! - Build the ratings table (indexed by user and by book)
//! - Compute aggregate statistics (book stats)
//! - Validate that every rated book exists in the catalog

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::path::Path;
use tracing::info;

/// File names expected inside the data directory
pub const BOOKS_FILE_NAME: &str = "books.csv";
pub const RATINGS_FILE_NAME: &str = "ratings.csv";

impl DataIndex {
    /// Load the GoodReads dataset from a directory
    ///
    /// This is the main entry point for loading data.
    ///
    /// Steps:
    /// 1. Parse both files (books, ratings) in parallel
    /// 2. Build the catalog and ratings table
    /// 3. Compute book statistics
    /// 4. Validate data integrity
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading GoodReads dataset from {:?}", data_dir);

        let books_path = data_dir.join(BOOKS_FILE_NAME);
        let ratings_path = data_dir.join(RATINGS_FILE_NAME);

        let (books, ratings) = rayon::join(
            || parser::parse_books_file(&books_path),
            || parser::parse_ratings_file(&ratings_path),
        );
        let books = books?;
        let ratings = ratings?;

        info!("Loaded {} books, {} ratings", books.len(), ratings.len());

        let index = Self::build(books, ratings)?;

        info!("DataIndex successfully built and validated!");
        Ok(index)
    }

    /// Build a validated DataIndex from parsed records
    pub fn build(books: Vec<Book>, ratings: Vec<Rating>) -> Result<Self> {
        let mut catalog = Catalog::new();
        for book in books {
            if catalog.contains_book(&book.id) {
                return Err(DataLoadError::DuplicateKey {
                    entity: "Book".to_string(),
                    id: book.id,
                });
            }
            catalog.insert_book(book);
        }

        let mut table = RatingsTable::new();
        for rating in ratings {
            table.insert_rating(rating.user_id, rating.book_id, rating.rating);
        }

        let index = DataIndex::from_parts(catalog, table);
        index.validate()?;
        Ok(index)
    }

    /// Compute aggregate statistics for all rated books
    ///
    /// For each book: average rating and rating count.
    pub fn compute_book_stats(&mut self) {
        self.book_stats = self
            .ratings
            .book_ratings
            .par_iter()
            .map(|(book_id, raters)| {
                let rating_count = raters.len() as u32;
                let avg_rating = if rating_count > 0 {
                    let total: i64 = raters.values().map(|&r| r as i64).sum();
                    total as f64 / rating_count as f64
                } else {
                    0.0
                };
                (book_id.clone(), BookStats { avg_rating, rating_count })
            })
            .collect();
    }

    /// Validate data integrity
    ///
    /// Check that every book referenced by the ratings table exists in the
    /// catalog. Returns Ok(()) if valid, Err on the first dangling reference.
    pub fn validate(&self) -> Result<()> {
        let mut rated: Vec<&BookId> = self.ratings.rated_book_ids().collect();
        rated.sort_unstable();

        match rated.into_iter().find(|id| !self.catalog.contains_book(id)) {
            Some(missing) => Err(DataLoadError::MissingReference {
                entity: "Book".to_string(),
                id: missing.clone(),
            }),
            None => Ok(()),
        }
    }
}
