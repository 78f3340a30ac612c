//! Parser for the GoodReads CSV files.
//!
//! - books.csv: one row per book, fixed column positions (see `BookColumns`)
//! - ratings.csv: header row of book ids, then one row per user with one cell
//!   per book; an empty cell means "not rated"
//!
//! Both files get a header row that is not data. Fields are decoded as UTF-8
//! when possible and as ISO-8859-1 otherwise, since the GoodReads exports
//! are not consistently encoded.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use csv::{ByteRecord, ReaderBuilder};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, warn};

const BOOKS_FILE: &str = "books.csv";
const RATINGS_FILE: &str = "ratings.csv";

/// Column positions in the books file
struct BookColumns;

impl BookColumns {
    const ID: usize = 0;
    const TITLE: usize = 1;
    const PAGES: usize = 6;
    const AUTHOR: usize = 14;
    const GENRES: usize = 15;
    const SUB_GENRES: usize = 16;
    const MIN_LEN: usize = Self::SUB_GENRES + 1;
}

/// Separator used inside the genre and sub-genre cells
const TAG_SEPARATOR: char = ';';

/// Open a data file, mapping "not found" to a dedicated error
fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

/// Decode a raw CSV field.
///
/// ISO-8859-1 is a single-byte encoding where each byte maps directly to a
/// Unicode code point, so the fallback never fails.
fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn field(record: &ByteRecord, idx: usize) -> String {
    record.get(idx).map(decode_field).unwrap_or_default()
}

/// 1-based line number of a record, for error messages
fn line_of(record: &ByteRecord, fallback: usize) -> usize {
    record
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(fallback)
}

/// Split a `;`-separated tag cell, dropping empty segments
///
/// Example: "Fiction;Fantasy" -> vec!["Fiction", "Fantasy"]
///          "" -> vec![]
fn parse_tags(s: &str) -> Vec<String> {
    s.split(TAG_SEPARATOR)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a page count cell. Missing or non-numeric values yield `None`.
fn parse_page_count(s: &str, book_id: &str) -> Option<u32> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<u32>() {
        Ok(pages) => Some(pages),
        Err(_) => {
            warn!("Ignoring page count {:?} for book {}", trimmed, book_id);
            None
        }
    }
}

/// Parse the books file from any reader
///
/// The first row is a header and is skipped.
pub fn parse_books<R: Read>(reader: R) -> Result<Vec<Book>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut books = Vec::new();
    let mut record = ByteRecord::new();
    let mut row_no = 1;

    while csv_reader.read_byte_record(&mut record)? {
        row_no += 1;
        let line_no = line_of(&record, row_no);

        if record.iter().all(|f| f.is_empty()) {
            continue; // Skip empty lines
        }

        if record.len() < BookColumns::MIN_LEN {
            return Err(DataLoadError::ParseError {
                file: BOOKS_FILE.to_string(),
                line: line_no,
                reason: format!(
                    "Expected at least {} columns, found {}",
                    BookColumns::MIN_LEN,
                    record.len()
                ),
            });
        }

        let id = field(&record, BookColumns::ID).trim().to_string();
        if id.is_empty() {
            return Err(DataLoadError::ParseError {
                file: BOOKS_FILE.to_string(),
                line: line_no,
                reason: "Missing book id".to_string(),
            });
        }

        let page_count = parse_page_count(&field(&record, BookColumns::PAGES), &id);

        books.push(Book {
            title: field(&record, BookColumns::TITLE),
            page_count,
            author: field(&record, BookColumns::AUTHOR),
            genres: parse_tags(&field(&record, BookColumns::GENRES)),
            sub_genres: parse_tags(&field(&record, BookColumns::SUB_GENRES)),
            id,
        });
    }

    debug!("Parsed {} books", books.len());
    Ok(books)
}

/// Parse the ratings matrix from any reader
///
/// Header: an ignored first cell followed by one book id per column.
/// Rows: user id followed by that user's rating for each column.
pub fn parse_ratings<R: Read>(reader: R) -> Result<Vec<Rating>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut record = ByteRecord::new();
    if !csv_reader.read_byte_record(&mut record)? {
        return Ok(Vec::new());
    }

    let book_ids: Vec<BookId> = record
        .iter()
        .skip(1)
        .map(|f| decode_field(f).trim().to_string())
        .collect();

    let mut ratings = Vec::new();
    let mut row_no = 1;

    while csv_reader.read_byte_record(&mut record)? {
        row_no += 1;
        let line_no = line_of(&record, row_no);

        if record.iter().all(|f| f.is_empty()) {
            continue;
        }

        let user_id = field(&record, 0).trim().to_string();
        if user_id.is_empty() {
            return Err(DataLoadError::ParseError {
                file: RATINGS_FILE.to_string(),
                line: line_no,
                reason: "Missing user id".to_string(),
            });
        }

        let cells = record.len() - 1;
        if cells > book_ids.len() {
            return Err(DataLoadError::ParseError {
                file: RATINGS_FILE.to_string(),
                line: line_no,
                reason: format!(
                    "Row has {} rating cells but the header lists {} books",
                    cells,
                    book_ids.len()
                ),
            });
        }

        for (col, cell) in record.iter().skip(1).enumerate() {
            let value = decode_field(cell);
            let value = value.trim();
            if value.is_empty() {
                continue; // Not rated
            }

            let rating = value
                .parse::<RatingValue>()
                .map_err(|e| DataLoadError::ParseError {
                    file: RATINGS_FILE.to_string(),
                    line: line_no,
                    reason: format!("Invalid rating {:?} for book {}: {}", value, book_ids[col], e),
                })?;

            ratings.push(Rating {
                user_id: user_id.clone(),
                book_id: book_ids[col].clone(),
                rating,
            });
        }
    }

    debug!("Parsed {} ratings", ratings.len());
    Ok(ratings)
}

/// Parse the books file at `path`
pub fn parse_books_file(path: &Path) -> Result<Vec<Book>> {
    parse_books(open_file(path)?)
}

/// Parse the ratings file at `path`
pub fn parse_ratings_file(path: &Path) -> Result<Vec<Rating>> {
    parse_ratings(open_file(path)?)
}
