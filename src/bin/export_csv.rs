use std::path::PathBuf;

use clap::Parser;
use dotenvy::dotenv;

use hotel_rate_tracker::config::Config;
use hotel_rate_tracker::csv_io;
use hotel_rate_tracker::db::db_manager::DbManager;
use hotel_rate_tracker::logging;

/// Export a run back to CSV
#[derive(Parser)]
struct Args {
    /// Path to config JSON
    #[arg(long, default_value = "config.json")]
    config: String,
    /// Path to the SQLite database (defaults to config db_path)
    #[arg(long)]
    db: Option<String>,
    /// Output CSV path
    #[arg(long, default_value = "outputprice_debug.csv")]
    out: PathBuf,
    /// Run to export (defaults to the latest)
    #[arg(long)]
    run_id: Option<i64>,
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
    let run_id = csv_io::export_run_csv(&db, &cfg, args.run_id, &args.out).await?;

    println!("Exported run_id={run_id} to {}", args.out.display());
    Ok(())
}
