use std::path::Path;

use clap::Parser;
use dotenvy::dotenv;

use hotel_rate_tracker::config::Config;
use hotel_rate_tracker::db::db_manager::DbManager;
use hotel_rate_tracker::logging;
use hotel_rate_tracker::report::{self, render};

/// Generate a dated HTML report from stored runs
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

    let db = DbManager::init(&cfg.db_path).await?;
    let report = report::generate(&db, &cfg).await?;

    let html = render::render_html(&report, &cfg);
    let report_dir = Path::new(&cfg.report_dir);
    let out_path = render::write_report(report_dir, &html)?;
    render::write_reports_index(report_dir)?;

    println!("Report written to {}", out_path.display());
    Ok(())
}
