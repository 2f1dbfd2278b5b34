use std::io::{self, BufRead, Write};

use clap::Parser;
use dotenvy::dotenv;

use hotel_rate_tracker::config::Config;
use hotel_rate_tracker::db::db_manager::DbManager;
use hotel_rate_tracker::logging;

/// Reset the database: delete all runs, prices, and hotels
#[derive(Parser)]
struct Args {
    /// Path to config JSON
    #[arg(long, default_value = "config.json")]
    config: String,
    /// Path to the SQLite database (defaults to config db_path)
    #[arg(long)]
    db: Option<String>,
    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,
    /// Run VACUUM after deletion
    #[arg(long)]
    vacuum: bool,
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

    if !args.yes {
        println!(
            "About to DELETE ALL DATA from {} (tables: prices, runs, hotels). This cannot be undone.",
            cfg.db_path
        );
        print!("Type 'yes' to confirm: ");
        io::stdout().flush()?;
        let mut response = String::new();
        io::stdin().lock().read_line(&mut response)?;
        if response.trim().to_lowercase() != "yes" {
            println!("Aborted.");
            return Ok(());
        }
    }

    let mut db = DbManager::init(&cfg.db_path).await?;
    let (prices, runs, hotels) = db.reset_all().await?;
    if args.vacuum {
        sqlx::query("VACUUM").execute(&db.pool).await?;
    }

    println!("DB reset complete. Deleted: prices={prices}, runs={runs}, hotels={hotels}");
    Ok(())
}
