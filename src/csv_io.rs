use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::config::Config;
use crate::date_utils::date_range;
use crate::db::db_manager::DbManager;
use crate::db::models::prices::NewPriceModel;
use crate::db::models::runs::NewRunModel;
use crate::db::queries::{hotels as hotels_queries, prices as prices_queries, runs as runs_queries};
use crate::error::TrackerError;
use crate::report::assembler::hotel_display_order;

/// Sentinel written for missing prices on export.
pub const EXPORT_MISSING: &str = "null";

/// Parse one CSV price cell. Empty cells and the usual null spellings mean
/// missing, as does anything that fails to parse as a number.
pub fn parse_price_cell(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    match s.to_ascii_lowercase().as_str() {
        "n/a" | "na" | "null" | "none" => None,
        _ => s.parse::<f64>().ok(),
    }
}

fn format_price_cell(price: Option<f64>) -> String {
    match price {
        None => EXPORT_MISSING.to_string(),
        Some(v) if (v - v.round()).abs() < 1e-6 => format!("{}", v.round() as i64),
        Some(v) => format!("{v}"),
    }
}

#[derive(Debug, Default)]
pub struct IngestOptions {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub note: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Import a prices CSV (`Date,<hotel names...>`) as a new run. Hotels named
/// in the header are created lazily; the run window defaults to the
/// min/max ingested dates.
pub async fn ingest_csv(
    db: &mut DbManager,
    cfg: &Config,
    csv_path: &Path,
    opts: IngestOptions,
) -> Result<i64, TrackerError> {
    let raw = fs::read_to_string(csv_path)?;
    let mut lines = raw.lines().filter(|l| !l.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| TrackerError::InvalidCsv("CSV is empty".to_string()))?;
    let header_cells: Vec<&str> = header.split(',').map(str::trim).collect();
    if !header_cells
        .first()
        .is_some_and(|c| c.eq_ignore_ascii_case("date"))
    {
        return Err(TrackerError::InvalidCsv(
            "first column must be 'Date'".to_string(),
        ));
    }
    let hotel_names: Vec<String> = header_cells[1..].iter().map(|s| s.to_string()).collect();

    db.sync_hotels(&cfg.hotels).await?;
    let mut hotel_ids = Vec::with_capacity(hotel_names.len());
    for name in &hotel_names {
        hotel_ids.push(db.ensure_hotel(name).await?);
    }

    let mut rows: Vec<(NaiveDate, Vec<Option<f64>>)> = Vec::new();
    for (lineno, line) in lines.enumerate() {
        let mut cells = line.split(',').map(str::trim);
        let date_cell = cells.next().unwrap_or_default();
        let date: NaiveDate = date_cell.parse().map_err(|_| {
            TrackerError::InvalidCsv(format!(
                "row {}: invalid date {date_cell:?}",
                lineno + 2
            ))
        })?;
        let prices: Vec<Option<f64>> = cells.map(parse_price_cell).collect();
        rows.push((date, prices));
    }

    let min_date = rows.iter().map(|(d, _)| *d).min();
    let max_date = rows.iter().map(|(d, _)| *d).max();
    let new_run = NewRunModel {
        run_timestamp: opts.timestamp.unwrap_or_else(Utc::now),
        start_date: opts.start_date.or(min_date),
        end_date: opts.end_date.or(max_date),
        note: opts.note,
    };
    let run_id = db.create_run(&new_run).await?;

    let mut cells_written = 0usize;
    for (date, prices) in &rows {
        for (i, &hotel_id) in hotel_ids.iter().enumerate() {
            prices_queries::upsert_price(
                &db.pool,
                &NewPriceModel {
                    run_id,
                    hotel_id,
                    stay_date: *date,
                    currency: Some(cfg.fetch.currency.clone()),
                    price: prices.get(i).copied().flatten(),
                    source: Some("csv".to_string()),
                },
            )
            .await?;
            cells_written += 1;
        }
    }

    info!(run_id, rows = rows.len(), cells = cells_written, "ingested CSV");
    Ok(run_id)
}

/// Export one run (the latest when `run_id` is `None`) back to CSV, with
/// missing cells as the `null` sentinel. Dates come from the run's window,
/// falling back to the min/max observed stay dates.
pub async fn export_run_csv(
    db: &DbManager,
    cfg: &Config,
    run_id: Option<i64>,
    out_path: &Path,
) -> Result<i64, TrackerError> {
    let run = match run_id {
        Some(id) => runs_queries::get_run(&db.pool, id).await?,
        None => runs_queries::latest_run(&db.pool).await?,
    }
    .ok_or(TrackerError::NoRuns)?;

    let (start, end) = match (run.start_date, run.end_date) {
        (Some(start), Some(end)) => (start, end),
        _ => prices_queries::stay_date_bounds(&db.pool, run.id)
            .await?
            .ok_or(TrackerError::NoObservations { run_id: run.id })?,
    };
    let dates = date_range(start, end);

    let stored_hotels = hotels_queries::list_hotels(&db.pool).await?;
    let columns = hotel_display_order(&cfg.hotels, &stored_hotels);

    let observations = prices_queries::get_prices_for_run(&db.pool, run.id).await?;
    let mut by_hotel_date: HashMap<(i64, NaiveDate), Option<f64>> = HashMap::new();
    for obs in &observations {
        by_hotel_date.insert((obs.hotel_id, obs.stay_date), obs.price);
    }

    let mut out = String::new();
    out.push_str("Date");
    for column in &columns {
        out.push(',');
        out.push_str(&column.name);
    }
    out.push('\n');
    for date in &dates {
        out.push_str(&date.to_string());
        for column in &columns {
            let price = by_hotel_date
                .get(&(column.id, *date))
                .copied()
                .flatten();
            out.push(',');
            out.push_str(&format_price_cell(price));
        }
        out.push('\n');
    }

    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(out_path, out)?;

    info!(run_id = run.id, dates = dates.len(), path = %out_path.display(), "exported CSV");
    Ok(run.id)
}
