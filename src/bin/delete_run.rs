use clap::Parser;
use dotenvy::dotenv;

use hotel_rate_tracker::config::Config;
use hotel_rate_tracker::date_utils::parse_time_bound;
use hotel_rate_tracker::db::db_manager::DbManager;
use hotel_rate_tracker::db::queries::runs as runs_queries;
use hotel_rate_tracker::logging;

/// Delete runs (and their prices)
#[derive(Parser)]
#[command(group = clap::ArgGroup::new("target").required(true))]
struct Args {
    /// Path to config JSON
    #[arg(long, default_value = "config.json")]
    config: String,
    /// Path to the SQLite database (defaults to config db_path)
    #[arg(long)]
    db: Option<String>,
    /// Run ID to delete
    #[arg(long, group = "target")]
    run_id: Option<i64>,
    /// Delete the most recent run
    #[arg(long, group = "target")]
    latest: bool,
    /// Delete runs with timestamp between START and END (YYYY-MM-DD or ISO)
    #[arg(long, group = "target", num_args = 2, value_names = ["START", "END"])]
    between: Option<Vec<String>>,
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

    let db = DbManager::init(&cfg.db_path).await?;

    let run_ids: Vec<i64> = if let Some(run_id) = args.run_id {
        vec![run_id]
    } else if args.latest {
        match runs_queries::latest_run(&db.pool).await? {
            Some(run) => vec![run.id],
            None => {
                println!("No runs found in DB.");
                return Ok(());
            }
        }
    } else {
        let bounds = args.between.as_ref().expect("clap group guarantees one target");
        let start = parse_time_bound(&bounds[0], false)
            .ok_or_else(|| eyre::eyre!("invalid start bound {:?}", bounds[0]))?;
        let end = parse_time_bound(&bounds[1], true)
            .ok_or_else(|| eyre::eyre!("invalid end bound {:?}", bounds[1]))?;
        runs_queries::run_ids_between(&db.pool, start, end).await?
    };

    if run_ids.is_empty() {
        println!("No matching runs to delete.");
        return Ok(());
    }

    let mut total_prices = 0u64;
    let mut total_runs = 0u64;
    for run_id in &run_ids {
        let (prices, runs) = runs_queries::delete_run(&db.pool, *run_id).await?;
        tracing::info!(run_id, prices, "deleted run");
        total_prices += prices;
        total_runs += runs;
    }
    println!("Deleted {total_runs} run(s) and {total_prices} price row(s).");

    Ok(())
}
