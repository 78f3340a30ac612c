//! Example: Generate content candidates for a browsing list
//!
//! Run with: cargo run --package sources --example generate_candidates
//!
//! This example shows how to:
//! 1. Load the GoodReads dataset
//! 2. Build a browsing context
//! 3. Generate content candidates
//! 4. Inspect pairwise similarity against the browsed books

use data_loader::DataIndex;
use sources::{build_browsing_context, pearson_corr, prob_simm, ContentSource};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    println!("=== Book Candidate Generation Example ===\n");

    let start = Instant::now();
    let data_index = Arc::new(DataIndex::load_from_files(Path::new("data/goodreads"))?);
    println!("Loaded dataset in {:?}\n", start.elapsed());

    let browsed = ["398201883", "204328712", "421459000"];
    let context = build_browsing_context(data_index.catalog(), &browsed)?;
    println!("Browsed {} books, {} distinct tags", browsed.len(), context.tag_weights.len());

    let content = ContentSource::new(data_index.clone());
    let start = Instant::now();
    let candidates = content.get_candidates(&context, 20);
    println!("Generated {} content candidates in {:?}\n", candidates.len(), start.elapsed());

    for (i, candidate) in candidates.iter().enumerate() {
        let title = data_index
            .get_book(&candidate.book_id)
            .map(|b| b.title())
            .unwrap_or("?");
        let best_prob = browsed
            .iter()
            .filter_map(|i| prob_simm(data_index.ratings(), &candidate.book_id, i).ok())
            .fold(0.0, f64::max);
        let corr: f64 = browsed
            .iter()
            .filter_map(|i| pearson_corr(data_index.ratings(), &candidate.book_id, i).ok())
            .sum();
        println!(
            "{:2}. {} (content {:.3}, max P {:.2}, pearson sum {:.3})",
            i + 1,
            title,
            candidate.score,
            best_prob,
            corr
        );
    }

    Ok(())
}
