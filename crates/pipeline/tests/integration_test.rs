//! Integration tests for the pipeline.
//!
//! These tests run the content source and the item-based stage together
//! the way the orchestrator does.

use data_loader::{Book, BookId, DataIndex};
use pipeline::ItemBasedRecommender;
use sources::{
    BrowsingContext, ContentSource, NoRatersPolicy, build_browsing_context, prob_simm,
};
use std::sync::Arc;

const THRESHOLD: f64 = 0.35;

fn create_test_setup() -> Arc<DataIndex> {
    let mut index = DataIndex::new();

    index.insert_book(
        Book::new("100", "The Browsed One")
            .with_genres(["Fantasy"])
            .with_sub_genres(["Epic"]),
    );
    index.insert_book(
        Book::new("101", "Agreeable Epic")
            .with_genres(["Fantasy"])
            .with_sub_genres(["Epic"]),
    );
    index.insert_book(Book::new("102", "Contrary Fantasy").with_genres(["Fantasy"]));
    index.insert_book(Book::new("103", "Loved Romance").with_genres(["Romance"]));
    index.insert_book(
        Book::new("104", "Obscure Epic")
            .with_genres(["Fantasy"])
            .with_sub_genres(["Epic"]),
    );
    index.insert_book(Book::new("105", "Unrelated Horror").with_genres(["Horror"]));

    // Browsed book: rated by u1..u4
    for (user, rating) in [("u1", 5), ("u2", 4), ("u3", 2), ("u4", 1)] {
        index.insert_rating(user, "100", rating);
    }
    // Agrees with 100 on three of its four raters
    for (user, rating) in [("u1", 5), ("u2", 4), ("u3", 1)] {
        index.insert_rating(user, "101", rating);
    }
    // Disagrees on the same three
    for (user, rating) in [("u1", 1), ("u2", 2), ("u3", 5)] {
        index.insert_rating(user, "102", rating);
    }
    // Rated by all four, closely tracking 100
    for (user, rating) in [("u1", 5), ("u2", 5), ("u3", 1), ("u4", 1)] {
        index.insert_rating(user, "103", rating);
    }
    // One shared rater: P = 0.25
    index.insert_rating("u1", "104", 4);
    index.insert_rating("u5", "104", 4);
    // No shared raters
    index.insert_rating("u5", "105", 3);
    index.insert_rating("u6", "105", 2);

    index.compute_book_stats();
    Arc::new(index)
}

fn run(index: &Arc<DataIndex>, browsed: &[&str], pool_size: usize) -> Vec<BookId> {
    let context = build_browsing_context(index.catalog(), browsed).unwrap();
    let pool: Vec<BookId> = ContentSource::new(index.clone())
        .get_candidates(&context, pool_size)
        .into_iter()
        .map(|c| c.book_id)
        .collect();

    ItemBasedRecommender::new(index.clone(), THRESHOLD, NoRatersPolicy::Strict)
        .recommend(&context, &pool)
        .unwrap()
        .into_iter()
        .map(|c| c.book_id)
        .collect()
}

#[test]
fn test_content_then_item_based() {
    let index = create_test_setup();

    let ranked = run(&index, &["100"], 60);

    // 104 and 105 never reach the co-rating threshold
    assert_eq!(ranked, ["103", "101", "102"]);
}

#[test]
fn test_pool_size_limits_item_based_input() {
    let index = create_test_setup();

    // Content order is 104, 101, 102, 105, 103; a pool of two keeps 104 and 101
    let ranked = run(&index, &["100"], 2);

    assert_eq!(ranked, ["101"]);
}

#[test]
fn test_every_result_passes_threshold() {
    let index = create_test_setup();
    let browsed = ["100", "105"];

    let ranked = run(&index, &browsed, 60);

    assert!(!ranked.is_empty());
    for book_id in &ranked {
        assert!(!browsed.contains(&book_id.as_str()));
        let best = browsed
            .iter()
            .map(|i| prob_simm(index.ratings(), book_id, i).unwrap())
            .fold(0.0, f64::max);
        assert!(
            best >= THRESHOLD,
            "{book_id} admitted with co-rating probability {best}"
        );
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let index = create_test_setup();

    let first = run(&index, &["100", "102"], 60);
    let second = run(&index, &["100", "102"], 60);

    assert_eq!(first, second);
}

#[test]
fn test_item_based_on_hand_built_context() {
    let index = create_test_setup();
    let recommender = ItemBasedRecommender::new(index.clone(), THRESHOLD, NoRatersPolicy::Strict);

    // Tag weights are irrelevant to the item-based stage
    let context = BrowsingContext::new(["100"]);
    let pool: Vec<BookId> = ["105", "104", "102", "101"].map(String::from).to_vec();

    let ranked = recommender.recommend(&context, &pool).unwrap();
    let ids: Vec<&str> = ranked.iter().map(|c| c.book_id.as_str()).collect();
    assert_eq!(ids, ["101", "102"]);
}
