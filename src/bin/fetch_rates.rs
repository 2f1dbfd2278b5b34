use clap::Parser;
use dotenvy::dotenv;

use hotel_rate_tracker::config::Config;
use hotel_rate_tracker::db::db_manager::DbManager;
use hotel_rate_tracker::fetch::client::RateClient;
use hotel_rate_tracker::fetch::pipeline::run_fetch;
use hotel_rate_tracker::logging;

/// Fetch hotel rates in parallel and store them as a new run
#[derive(Parser)]
struct Args {
    /// Path to config JSON
    #[arg(long, default_value = "config.json")]
    config: String,
    /// Path to the SQLite database (defaults to config db_path)
    #[arg(long)]
    db: Option<String>,
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

    let mut db = DbManager::init(&cfg.db_path).await?;
    let client = RateClient::new(reqwest::Client::new());

    let run_id = run_fetch(&mut db, &cfg, &client).await?;
    tracing::info!(run_id, "fetch complete");
    println!("Done. Fetched and stored run_id={run_id}");

    Ok(())
}
