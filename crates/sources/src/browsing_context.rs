//! Helper functions to build a BrowsingContext from the catalog
//!
//! The context gathers, once per request, what both recommendation stages
//! need: the browsed ids and the relative frequency of every genre and
//! sub-genre across the browsed books.

use crate::error::RecommendError;
use crate::types::BrowsingContext;
use data_loader::Catalog;
use std::collections::HashMap;

/// Build a BrowsingContext for the given browsed book ids
///
/// Every tag occurrence counts: a tag listed by two browsed books (or by the
/// same book browsed twice) is counted twice. Each weight is the tag count
/// divided by the total number of tag occurrences, so the weights sum to 1.
///
/// An empty browsing list is valid and yields an empty weight map.
///
/// # Errors
/// `RecommendError::MissingItem` if a browsed id is not in the catalog.
pub fn build_browsing_context<S: AsRef<str>>(
    catalog: &Catalog,
    browsed: &[S],
) -> Result<BrowsingContext, RecommendError> {
    let mut context = BrowsingContext::new(browsed.iter().map(|id| id.as_ref().to_string()));

    let mut tag_counts: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;

    for book_id in &context.browsed {
        let book = catalog
            .get_book(book_id)
            .ok_or_else(|| RecommendError::MissingItem {
                book_id: book_id.clone(),
            })?;

        for tag in book.tags() {
            *tag_counts.entry(tag.to_string()).or_insert(0) += 1;
            total += 1;
        }
    }

    context.tag_weights = tag_counts
        .into_iter()
        .map(|(tag, count)| (tag, count as f64 / total as f64))
        .collect();
    context.total_tags = total;

    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Book;

    fn create_test_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert_book(
            Book::new("1", "Dune")
                .with_genres(["Science Fiction", "Classics"])
                .with_sub_genres(["Space Opera"]),
        );
        catalog.insert_book(
            Book::new("2", "Foundation")
                .with_genres(["Science Fiction"])
                .with_sub_genres(["Space Opera"]),
        );
        catalog.insert_book(Book::new("3", "Untagged"));
        catalog
    }

    #[test]
    fn test_tag_weights() {
        let catalog = create_test_catalog();
        let context = build_browsing_context(&catalog, &["1", "2"]).unwrap();

        // 5 tag occurrences: SF x2, Space Opera x2, Classics x1
        assert_eq!(context.total_tags, 5);
        assert!((context.tag_weight("Science Fiction") - 0.4).abs() < 1e-12);
        assert!((context.tag_weight("Space Opera") - 0.4).abs() < 1e-12);
        assert!((context.tag_weight("Classics") - 0.2).abs() < 1e-12);

        let sum: f64 = context.tag_weights.values().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_browsing_counts_twice() {
        let catalog = create_test_catalog();
        let context = build_browsing_context(&catalog, &["2", "2", "1"]).unwrap();

        assert_eq!(context.total_tags, 7);
        assert!((context.tag_weight("Science Fiction") - 3.0 / 7.0).abs() < 1e-12);
        assert_eq!(context.browsed_set.len(), 2);
    }

    #[test]
    fn test_empty_browsing() {
        let catalog = create_test_catalog();
        let context = build_browsing_context::<&str>(&catalog, &[]).unwrap();

        assert!(context.is_empty());
        assert!(context.tag_weights.is_empty());
        assert_eq!(context.total_tags, 0);
    }

    #[test]
    fn test_untagged_book() {
        let catalog = create_test_catalog();
        let context = build_browsing_context(&catalog, &["3"]).unwrap();
        assert!(context.tag_weights.is_empty());
    }

    #[test]
    fn test_missing_book() {
        let catalog = create_test_catalog();
        let err = build_browsing_context(&catalog, &["1", "404"]).unwrap_err();
        assert_eq!(
            err,
            RecommendError::MissingItem {
                book_id: "404".to_string()
            }
        );
    }
}
