use clap::Parser;
use dotenvy::dotenv;
use serde_json::json;

use hotel_rate_tracker::config::Config;
use hotel_rate_tracker::date_utils::parse_time_bound;
use hotel_rate_tracker::db::db_manager::DbManager;
use hotel_rate_tracker::db::queries::{prices as prices_queries, runs as runs_queries};
use hotel_rate_tracker::logging;

/// Show stored runs, newest first
#[derive(Parser)]
struct Args {
    /// Path to config JSON
    #[arg(long, default_value = "config.json")]
    config: String,
    /// Path to the SQLite database (defaults to config db_path)
    #[arg(long)]
    db: Option<String>,
    /// Max number of runs to show
    #[arg(long)]
    limit: Option<usize>,
    /// Only runs with timestamp >= this (YYYY-MM-DD or ISO)
    #[arg(long)]
    since: Option<String>,
    /// Only runs with timestamp <= this (YYYY-MM-DD or ISO)
    #[arg(long)]
    until: Option<String>,
    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();

    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME")) {
        eprintln!("Failed to initialize logging: {e}");
        return Err(e);
    }

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(db_path) = args.db {
        cfg.db_path = db_path;
    }

    let since = match &args.since {
        Some(raw) => {
            Some(parse_time_bound(raw, false).ok_or_else(|| eyre::eyre!("invalid --since {raw:?}"))?)
        }
        None => None,
    };
    let until = match &args.until {
        Some(raw) => {
            Some(parse_time_bound(raw, true).ok_or_else(|| eyre::eyre!("invalid --until {raw:?}"))?)
        }
        None => None,
    };

    let db = DbManager::init(&cfg.db_path).await?;
    let mut runs = runs_queries::fetch_runs(&db.pool, None).await?;
    runs.retain(|r| since.is_none_or(|s| r.run_timestamp >= s));
    runs.retain(|r| until.is_none_or(|u| r.run_timestamp <= u));
    if let Some(limit) = args.limit {
        runs.truncate(limit);
    }

    let run_ids: Vec<i64> = runs.iter().map(|r| r.id).collect();
    let counts = prices_queries::price_counts_by_run(&db.pool, &run_ids).await?;

    if args.json {
        let data: Vec<_> = runs
            .iter()
            .map(|r| {
                json!({
                    "id": r.id,
                    "run_timestamp": r.run_timestamp.to_rfc3339(),
                    "start_date": r.start_date,
                    "end_date": r.end_date,
                    "note": r.note,
                    "price_rows": counts.get(&r.id).copied().unwrap_or(0),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    if runs.is_empty() {
        println!("No runs found.");
        return Ok(());
    }

    let header = format!(
        "{:>5}  {:<19}  {:<10}  {:<10}  {:>6}  Note",
        "ID", "Timestamp", "Start", "End", "Prices"
    );
    println!("{header}");
    println!("{}", "-".repeat(header.len()));
    for r in &runs {
        let start = r.start_date.map(|d| d.to_string()).unwrap_or_default();
        let end = r.end_date.map(|d| d.to_string()).unwrap_or_default();
        println!(
            "{:>5}  {:<19}  {:<10}  {:<10}  {:>6}  {}",
            r.id,
            r.run_timestamp.format("%Y-%m-%dT%H:%M:%S"),
            start,
            end,
            counts.get(&r.id).copied().unwrap_or(0),
            r.note.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
