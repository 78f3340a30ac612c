//! Simple test harness for the recommendation orchestrator.
//!
//! This binary runs the end-to-end pipeline for one browsing list.
//!
//! Environment:
//! - `BOOK_RECS_DATA_DIR`: dataset directory (default `data/goodreads`)
//! - `BOOK_RECS_BROWSED`: comma-separated browsed book ids

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use data_loader::DataIndex;
use server::RecommendationOrchestrator;

const DEFAULT_DATA_DIR: &str = "data/goodreads";
const DEFAULT_BROWSED: &str = "398201883,204328712,421459000";
const TOP_N: usize = 10;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,server=debug,sources=debug,pipeline=debug")),
        )
        .init();

    info!("Starting book recommendation test harness");

    let data_dir = env::var("BOOK_RECS_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
    let browsed: Vec<String> = env::var("BOOK_RECS_BROWSED")
        .unwrap_or_else(|_| DEFAULT_BROWSED.to_string())
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect();

    info!("Loading data index from {}...", data_dir.display());
    let data_index = Arc::new(
        DataIndex::load_from_files(&data_dir).context("Failed to load GoodReads dataset")?,
    );
    info!("Data index loaded successfully");

    let orchestrator = RecommendationOrchestrator::new(data_index.clone());

    for id in &browsed {
        let title = data_index.get_book(id).map(|b| b.title()).unwrap_or("?");
        info!("Browsed: {} ({})", title, id);
    }

    let recommendations = tokio::task::spawn_blocking({
        let orchestrator = orchestrator.clone();
        let browsed = browsed.clone();
        move || orchestrator.recommend_detailed(&browsed, TOP_N)
    })
    .await
    .context("Recommendation task panicked")??;

    info!("Received {} recommendations:", recommendations.len());
    for (i, rec) in recommendations.iter().enumerate() {
        info!("{}. {} by {} - Score: {:.3}", i + 1, rec.title, rec.author, rec.score);
        info!("   {}", rec.explanation);
    }

    Ok(())
}
