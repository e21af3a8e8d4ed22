// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Open the bookmark store and wire the checker components together
// 3. Dispatch to the appropriate subcommand handler and print results
// 4. Exit with proper code (0 = all alive, 1 = broken links, 2 = error)
// =============================================================================

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser; // Parser trait enables the parse() method

use cli::{Cli, Commands};
use link_vigil::checker::{BatchChecker, BatchEntry, BatchStatus, DeadLinkScanner, UrlHealthChecker};
use link_vigil::logging::init_logger;
use link_vigil::store::{Bookmark, BookmarkId, JsonFileStore};
use link_vigil::sweep::{run_schedule, SweepScheduler};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = nothing broken
//   Ok(1) = at least one dead or erroring link reported
//   Err   = usage or store error (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    init_logger(cli.log_level).context("failed to initialise logging")?;

    let store = Arc::new(
        JsonFileStore::open(&cli.store)
            .await
            .with_context(|| format!("failed to open bookmark store {}", cli.store.display()))?,
    );
    log::debug!("using bookmark store {}", store.path().display());

    let checker =
        UrlHealthChecker::new(&cli.checker_config()).context("failed to build HTTP client")?;

    match cli.command {
        Commands::Check { id, json } => {
            let batch = BatchChecker::new(checker, store, cli.concurrency);
            let result = batch.check_one(BookmarkId(id)).await?;

            if json {
                println!("{}", serde_json::json!({ "status": result.status }));
            } else {
                println!("Bookmark {}: {}", result.bookmark_id, result.status);
            }
            Ok(if result.status.is_broken() { 1 } else { 0 })
        }
        Commands::Batch { ids, json } => {
            let batch = BatchChecker::new(checker, store, cli.concurrency);
            let ids: Vec<BookmarkId> = ids.into_iter().map(BookmarkId).collect();

            // Keep stdout a single JSON document in --json mode
            if !json {
                println!("🌐 Checking {} bookmark(s)...\n", ids.len());
            }
            let results = batch.check_batch(&ids).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_batch_table(&results);
            }

            let broken = results
                .iter()
                .any(|entry| matches!(entry.status, BatchStatus::Dead | BatchStatus::Error));
            Ok(if broken { 1 } else { 0 })
        }
        Commands::DeadLinks { user, json } => {
            let scanner = DeadLinkScanner::new(checker, store.clone(), store, cli.concurrency);

            if !json {
                println!("🔍 Scanning bookmarks of {}...\n", user);
            }
            let dead = scanner.scan_for_user(&user).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&dead)?);
            } else {
                print_dead_links(&dead);
            }
            Ok(if dead.is_empty() { 0 } else { 1 })
        }
        Commands::Schedule { at, every, max_runs } => {
            let scheduler = Arc::new(SweepScheduler::new(checker, store, cli.concurrency));
            let summary = run_schedule(scheduler, cli::schedule_config(at, every, max_runs)).await;

            println!(
                "📊 Sweeps: {} triggered, {} completed, {} skipped, {} failed",
                summary.triggered, summary.completed, summary.skipped, summary.failed
            );
            Ok(if summary.failed > 0 { 1 } else { 0 })
        }
    }
}

// Prints batch results as a human-readable table, in request order
fn print_batch_table(results: &[BatchEntry]) {
    println!("{:<12} {:<12}", "ID", "STATUS");
    println!("{}", "=".repeat(24));

    for entry in results {
        println!("{:<12} {:<12}", entry.id, format_status(entry.status));
    }

    println!();

    let count = |wanted: BatchStatus| results.iter().filter(|e| e.status == wanted).count();

    println!("📊 Summary:");
    println!("   ✅ Alive: {}", count(BatchStatus::Alive));
    println!("   ❌ Dead: {}", count(BatchStatus::Dead));
    println!("   ⚠️  Error: {}", count(BatchStatus::Error));
    println!("   ❓ Not found: {}", count(BatchStatus::NotFound));
    println!("   📋 Total: {}", results.len());
}

fn print_dead_links(dead: &[Bookmark]) {
    if dead.is_empty() {
        println!("✅ No dead links found");
        return;
    }

    println!("{:<8} {:<60} {:<30}", "ID", "URL", "TITLE");
    println!("{}", "=".repeat(98));

    for bookmark in dead {
        // Truncate URL if too long for display
        let url_display = if bookmark.url.chars().count() > 57 {
            format!("{}...", bookmark.url.chars().take(57).collect::<String>())
        } else {
            bookmark.url.clone()
        };
        println!("{:<8} {:<60} {:<30}", bookmark.id, url_display, bookmark.title);
    }

    println!();
    println!("❌ {} dead or erroring link(s)", dead.len());
}

fn format_status(status: BatchStatus) -> String {
    match status {
        BatchStatus::Alive => "✅ ALIVE".to_string(),
        BatchStatus::Dead => "❌ DEAD".to_string(),
        BatchStatus::Error => "⚠️  ERROR".to_string(),
        BatchStatus::NotFound => "❓ NOT_FOUND".to_string(),
    }
}
