use std::fs;
use std::path::PathBuf;

use chrono::{Duration, NaiveDate, Utc};
use clap::Parser;
use dotenvy::dotenv;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hotel_rate_tracker::config::Config;
use hotel_rate_tracker::csv_io::parse_price_cell;
use hotel_rate_tracker::db::db_manager::DbManager;
use hotel_rate_tracker::db::models::prices::NewPriceModel;
use hotel_rate_tracker::db::models::runs::NewRunModel;
use hotel_rate_tracker::db::queries::prices as prices_queries;
use hotel_rate_tracker::logging;

/// Generate three synthetic runs from a base CSV: the base itself plus two
/// mutated copies with injected spikes, for exercising the report
#[derive(Parser)]
struct Args {
    /// Path to the base CSV (Date,<hotel names...>)
    #[arg(long)]
    csv: PathBuf,
    /// Path to config JSON
    #[arg(long, default_value = "config.json")]
    config: String,
    /// Path to the SQLite database (defaults to config db_path)
    #[arg(long)]
    db: Option<String>,
    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Base noise of +/-5%, with occasional spikes sized to land in each
/// severity band, floored at 40.
fn mutate_price(base: Option<f64>, rng: &mut StdRng) -> Option<f64> {
    let base = base?;
    let noise: f64 = rng.random_range(-0.05..0.05);
    let mut price = base * (1.0 + noise);
    let p: f64 = rng.random();
    if p < 0.05 {
        price = base * (1.0 + rng.random_range(0.30..0.60));
    } else if p < 0.10 {
        price = base * (1.0 + rng.random_range(0.20..0.30));
    } else if p < 0.18 {
        price = base * (1.0 + rng.random_range(0.10..0.20));
    }
    Some((price.max(40.0) * 100.0).round() / 100.0)
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

    let raw = fs::read_to_string(&args.csv)?;
    let mut lines = raw.lines().filter(|l| !l.trim().is_empty());
    let header = lines.next().ok_or_else(|| eyre::eyre!("CSV is empty"))?;
    let hotel_names: Vec<&str> = header.split(',').map(str::trim).skip(1).collect();
    let mut rows: Vec<(NaiveDate, Vec<Option<f64>>)> = Vec::new();
    for line in lines {
        let mut cells = line.split(',').map(str::trim);
        let date: NaiveDate = cells.next().unwrap_or_default().parse()?;
        rows.push((date, cells.map(parse_price_cell).collect()));
    }

    let mut db = DbManager::init(&cfg.db_path).await?;
    db.sync_hotels(&cfg.hotels).await?;
    let mut hotel_ids = Vec::with_capacity(hotel_names.len());
    for name in &hotel_names {
        hotel_ids.push(db.ensure_hotel(name).await?);
    }

    let base_timestamp = Utc::now() - Duration::days(6);
    let mut run_ids = Vec::new();
    for run_no in 0..3u64 {
        let note = if run_no == 0 {
            "fake run 1 from CSV".to_string()
        } else {
            format!("fake run {} mutated", run_no + 1)
        };
        let run_id = db
            .create_run(&NewRunModel {
                run_timestamp: base_timestamp + Duration::days(3 * run_no as i64),
                start_date: cfg.runs.start_date,
                end_date: cfg.runs.end_date,
                note: Some(note),
            })
            .await?;

        let mut rng = StdRng::seed_from_u64(args.seed + run_no);
        for (date, prices) in &rows {
            for (i, &hotel_id) in hotel_ids.iter().enumerate() {
                let base = prices.get(i).copied().flatten();
                let price = if run_no == 0 {
                    base
                } else {
                    mutate_price(base, &mut rng)
                };
                prices_queries::upsert_price(
                    &db.pool,
                    &NewPriceModel {
                        run_id,
                        hotel_id,
                        stay_date: *date,
                        currency: Some(cfg.fetch.currency.clone()),
                        price,
                        source: Some(format!("seed-{}", run_no + 1)),
                    },
                )
                .await?;
            }
        }
        run_ids.push(run_id);
    }

    println!(
        "Generated fake runs: run1={}, run2={}, run3={}",
        run_ids[0], run_ids[1], run_ids[2]
    );
    Ok(())
}
