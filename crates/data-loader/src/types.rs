//! Core domain types for the GoodReads book dataset.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - Type aliases for domain clarity (BookId, UserId)
//! - `Book`, a named record instead of a positional row
//! - `Catalog` and `RatingsTable`, the two read-only tables the recommender works on
//! - `DataIndex`, which owns both plus precomputed per-book statistics

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a book (GoodReads ids are numeric strings)
pub type BookId = String;

/// Unique identifier for a user in the ratings file
pub type UserId = String;

/// Integer rating a user gave a book
pub type RatingValue = i32;

// =============================================================================
// Book
// =============================================================================

/// Represents a book in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    /// Number of pages, when the source row carried a usable number
    pub page_count: Option<u32>,
    pub author: String,
    /// Top-level genres, in source order
    pub genres: Vec<String>,
    /// Finer-grained sub-genres, in source order
    pub sub_genres: Vec<String>,
}

impl Book {
    /// Create a book with only an id and a title; everything else empty
    pub fn new(id: impl Into<BookId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            page_count: None,
            author: String::new(),
            genres: Vec::new(),
            sub_genres: Vec::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_page_count(mut self, page_count: u32) -> Self {
        self.page_count = Some(page_count);
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sub_genres<I, S>(mut self, sub_genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sub_genres = sub_genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn sub_genres(&self) -> &[String] {
        &self.sub_genres
    }

    /// All content tags of the book: genres followed by sub-genres.
    ///
    /// A tag present in both lists is yielded twice.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.genres
            .iter()
            .chain(self.sub_genres.iter())
            .map(String::as_str)
    }
}

// =============================================================================
// Rating Type
// =============================================================================

/// A single rating from a user for a book, as read from the ratings file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub book_id: BookId,
    pub rating: RatingValue,
}

// =============================================================================
// Statistics Types
// =============================================================================

/// Precomputed statistics for a book
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookStats {
    pub avg_rating: f64,
    pub rating_count: u32,
}

// =============================================================================
// Catalog
// =============================================================================

/// Every known book, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) books: HashMap<BookId, Book>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a book by ID
    pub fn get_book(&self, id: &str) -> Option<&Book> {
        self.books.get(id)
    }

    pub fn contains_book(&self, id: &str) -> bool {
        self.books.contains_key(id)
    }

    /// Insert a book, returning the record it replaced (if any)
    pub fn insert_book(&mut self, book: Book) -> Option<Book> {
        self.books.insert(book.id.clone(), book)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Iterate over all books (unspecified order)
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// All book ids, sorted
    pub fn book_ids(&self) -> Vec<&BookId> {
        let mut ids: Vec<&BookId> = self.books.keys().collect();
        ids.sort_unstable();
        ids
    }
}

// =============================================================================
// RatingsTable
// =============================================================================

/// Sparse user × book rating matrix.
///
/// Absent entries mean "not rated". Ratings are indexed both ways: by user
/// (the shape of the ratings file) and by book (what the similarity metrics
/// scan). Both sides use ordered maps so every scan visits raters in the same
/// order, which keeps floating point sums reproducible.
#[derive(Debug, Clone, Default)]
pub struct RatingsTable {
    pub(crate) user_ratings: BTreeMap<UserId, BTreeMap<BookId, RatingValue>>,
    pub(crate) book_ratings: HashMap<BookId, BTreeMap<UserId, RatingValue>>,
}

impl RatingsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rating and update both indices.
    ///
    /// Rating the same book twice keeps the latest value.
    pub fn insert_rating(
        &mut self,
        user_id: impl Into<UserId>,
        book_id: impl Into<BookId>,
        rating: RatingValue,
    ) {
        let user_id = user_id.into();
        let book_id = book_id.into();

        self.book_ratings
            .entry(book_id.clone())
            .or_default()
            .insert(user_id.clone(), rating);

        self.user_ratings
            .entry(user_id)
            .or_default()
            .insert(book_id, rating);
    }

    /// All ratings made by a user, keyed by book
    pub fn get_user_ratings(&self, user_id: &str) -> Option<&BTreeMap<BookId, RatingValue>> {
        self.user_ratings.get(user_id)
    }

    /// All ratings received by a book, keyed by user
    pub fn get_book_ratings(&self, book_id: &str) -> Option<&BTreeMap<UserId, RatingValue>> {
        self.book_ratings.get(book_id)
    }

    /// Rating a specific user gave a specific book
    pub fn get_rating(&self, user_id: &str, book_id: &str) -> Option<RatingValue> {
        self.user_ratings.get(user_id)?.get(book_id).copied()
    }

    /// Number of users who rated the book
    pub fn rater_count(&self, book_id: &str) -> usize {
        self.book_ratings.get(book_id).map_or(0, BTreeMap::len)
    }

    pub fn user_count(&self) -> usize {
        self.user_ratings.len()
    }

    /// Total number of (user, book) ratings
    pub fn rating_count(&self) -> usize {
        self.user_ratings.values().map(BTreeMap::len).sum()
    }

    /// Ids of every book that received at least one rating
    pub fn rated_book_ids(&self) -> impl Iterator<Item = &BookId> {
        self.book_ratings.keys()
    }
}

// =============================================================================
// DataIndex - The Core In-Memory Database
// =============================================================================

/// Owns the catalog, the ratings table and derived per-book statistics.
///
/// Built once by the loader, then shared read-only (usually behind an `Arc`).
#[derive(Debug, Default)]
pub struct DataIndex {
    pub(crate) catalog: Catalog,
    pub(crate) ratings: RatingsTable,
    pub(crate) book_stats: HashMap<BookId, BookStats>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-built catalog and ratings table, computing stats
    pub fn from_parts(catalog: Catalog, ratings: RatingsTable) -> Self {
        let mut index = Self {
            catalog,
            ratings,
            book_stats: HashMap::new(),
        };
        index.compute_book_stats();
        index
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ratings(&self) -> &RatingsTable {
        &self.ratings
    }

    /// Get a book by ID
    pub fn get_book(&self, id: &str) -> Option<&Book> {
        self.catalog.get_book(id)
    }

    /// Get precomputed statistics for a book
    pub fn get_book_stats(&self, book_id: &str) -> Option<&BookStats> {
        self.book_stats.get(book_id)
    }

    /// Insert a book into the catalog
    pub fn insert_book(&mut self, book: Book) {
        self.catalog.insert_book(book);
    }

    /// Insert a rating into the ratings table.
    ///
    /// Stats are not refreshed; call `compute_book_stats` after bulk inserts.
    pub fn insert_rating(
        &mut self,
        user_id: impl Into<UserId>,
        book_id: impl Into<BookId>,
        rating: RatingValue,
    ) {
        self.ratings.insert_rating(user_id, book_id, rating);
    }

    /// Get counts for debugging/validation: (books, users, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.catalog.len(),
            self.ratings.user_count(),
            self.ratings.rating_count(),
        )
    }
}
