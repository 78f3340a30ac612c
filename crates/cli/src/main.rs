use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{BookId, DataIndex};
use server::{BookRecommendation, RecommendRequest, RecommendationOrchestrator, RecommenderConfig};
use sources::NoRatersPolicy;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// book-recs - Book Recommendation Engine
#[derive(Parser)]
#[command(name = "book-recs")]
#[command(about = "Book recommendations from genre overlap and rating correlation", long_about = None)]
struct Cli {
    /// Path to the GoodReads dataset directory (books.csv, ratings.csv)
    #[arg(short, long, default_value = "data/goodreads")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend books for a browsing list
    Recommend {
        /// Ids of the books the user browsed
        #[arg(long, num_args = 1.., required = true)]
        browsed: Vec<BookId>,

        /// Number of recommendations to return
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Show why each book was recommended
        #[arg(long)]
        explain: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Size of the content-based pool fed to the item-based stage
        #[arg(long)]
        pool_size: Option<usize>,

        /// Minimum co-rating probability against some browsed book
        #[arg(long)]
        threshold: Option<f64>,

        /// Treat books without ratings as uncorrelated instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Show a book's metadata and rating stats
    Book {
        /// Book ID to display
        #[arg(long)]
        book_id: BookId,
    },

    /// Search for books by title
    Search {
        /// Title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading GoodReads dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let data_index = Arc::new(
        DataIndex::load_from_files(&cli.data_dir).context("Failed to load GoodReads dataset")?,
    );
    let (books, users, ratings) = data_index.counts();
    println!(
        "{} Loaded {} books, {} users, {} ratings in {:?}",
        "✓".green(),
        books,
        users,
        ratings,
        start.elapsed()
    );

    match cli.command {
        Commands::Recommend {
            browsed,
            limit,
            explain,
            json,
            pool_size,
            threshold,
            lenient,
        } => {
            let mut config = RecommenderConfig::default();
            if let Some(size) = pool_size {
                config = config.with_content_pool_size(size);
            }
            if let Some(threshold) = threshold {
                config = config.with_co_occurrence_threshold(threshold);
            }
            if lenient {
                config = config.with_no_raters_policy(NoRatersPolicy::Zero);
            }
            handle_recommend(data_index, config, browsed, limit, explain, json).await?
        }
        Commands::Book { book_id } => handle_book(&data_index, &book_id)?,
        Commands::Search { title } => handle_search(&data_index, &title)?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(data_index, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    data_index: Arc<DataIndex>,
    config: RecommenderConfig,
    browsed: Vec<BookId>,
    limit: usize,
    explain: bool,
    json: bool,
) -> Result<()> {
    let orchestrator = RecommendationOrchestrator::with_config(data_index.clone(), config)?;

    let recommendations = tokio::task::spawn_blocking({
        let browsed = browsed.clone();
        move || orchestrator.recommend_detailed(&browsed, limit)
    })
    .await
    .context("Recommendation task panicked")??;

    if json {
        let output = serde_json::json!({
            "browsed": browsed,
            "recommendations": recommendations,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Browsed:".bold().blue());
    for id in &browsed {
        let title = data_index.get_book(id).map(|b| b.title()).unwrap_or("?");
        println!("  {} {}", "•".cyan(), title);
    }
    println!();

    print_recommendations(&recommendations, explain);
    Ok(())
}

/// Handle the 'book' command
fn handle_book(data_index: &DataIndex, book_id: &str) -> Result<()> {
    let book = data_index
        .get_book(book_id)
        .ok_or_else(|| anyhow!("Book {} not found", book_id))?;

    println!("{}", format!("Book ID: {}", book.id).bold().blue());
    println!("{}Title: {}", "• ".green(), book.title());
    println!("{}Author: {}", "• ".green(), book.author());
    match book.page_count() {
        Some(pages) => println!("{}Pages: {}", "• ".green(), pages),
        None => println!("{}Pages: unknown", "• ".green()),
    }
    println!("{}Genres: {}", "• ".green(), book.genres().join(", "));
    println!("{}Sub-genres: {}", "• ".green(), book.sub_genres().join(", "));

    match data_index.get_book_stats(book_id) {
        Some(stats) => {
            println!("{}Number of ratings: {}", "• ".cyan(), stats.rating_count);
            println!("{}Average rating: {:.2}", "• ".cyan(), stats.avg_rating);
        }
        None => println!("{}No ratings", "• ".cyan()),
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(data_index: &DataIndex, title: &str) -> Result<()> {
    let needle = title.to_lowercase();

    // (relevance, rating count, book); relevance 0 = exact, 1 = substring
    let mut matches: Vec<_> = data_index
        .catalog()
        .books()
        .filter_map(|book| {
            let haystack = book.title().to_lowercase();
            let relevance = if haystack == needle {
                0
            } else if haystack.contains(&needle) {
                1
            } else {
                return None;
            };
            let count = data_index
                .get_book_stats(&book.id)
                .map(|s| s.rating_count)
                .unwrap_or(0);
            Some((relevance, count, book))
        })
        .collect();

    matches.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| b.1.cmp(&a.1))
            .then_with(|| a.2.id.cmp(&b.2.id))
    });

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  no matches");
    }
    for (_, count, book) in matches.iter().take(20) {
        println!(
            "{}: {} by {} [{}] ({} ratings)",
            book.id.green(),
            book.title(),
            book.author(),
            book.genres().join(", "),
            count
        );
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    data_index: Arc<DataIndex>,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 || concurrent == 0 {
        bail!("--requests and --concurrent must both be positive");
    }

    let book_ids: Vec<BookId> = data_index
        .catalog()
        .book_ids()
        .into_iter()
        .cloned()
        .collect();
    if book_ids.is_empty() {
        bail!("Catalog is empty");
    }

    let orchestrator = RecommendationOrchestrator::new(data_index.clone());

    // Three random browsed books per request
    let batch: Vec<RecommendRequest> = (0..requests)
        .map(|_| {
            let browsed: Vec<BookId> = (0..3)
                .map(|_| book_ids[rand::random_range(0..book_ids.len())].clone())
                .collect();
            RecommendRequest::new(browsed, 10)
        })
        .collect();

    let start = Instant::now();
    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    let mut failures = 0;

    let mut pending = batch.into_iter().peekable();
    while pending.peek().is_some() {
        let chunk: Vec<RecommendRequest> = pending.by_ref().take(concurrent).collect();
        for response in orchestrator.recommend_batch(chunk).await? {
            match response {
                Ok(response) => timings.push(response.elapsed),
                Err(e) => {
                    warn!("Request failed: {:#}", e);
                    failures += 1;
                }
            }
        }
    }
    let total_time = start.elapsed();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} failed)", requests, failures);
    println!("Total time: {:?}", total_time);
    println!(
        "Throughput: {:.2} requests/second",
        requests as f64 / total_time.as_secs_f64()
    );

    if timings.is_empty() {
        return Ok(());
    }

    timings.sort();
    let avg_latency = timings.iter().sum::<Duration>() / timings.len() as u32;
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(&timings, 0.50));
    println!("P95 latency: {:?}", percentile(&timings, 0.95));
    println!("P99 latency: {:?}", percentile(&timings, 0.99));

    Ok(())
}

/// `sorted` must be non-empty and ascending
fn percentile(sorted: &[Duration], p: f64) -> Duration {
    let idx = ((sorted.len() as f64 * p) as usize).min(sorted.len() - 1);
    sorted[idx]
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[BookRecommendation], explain: bool) {
    println!("{}", "Book Recommendations:".bold().blue());
    if recommendations.is_empty() {
        println!("  nothing passed the co-rating threshold");
    }
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} by {} - Score: {:.3}",
            (i + 1).to_string().green(),
            rec.title,
            rec.author,
            rec.score
        );
        if explain {
            println!("   {}", rec.explanation);
        }
    }
}
