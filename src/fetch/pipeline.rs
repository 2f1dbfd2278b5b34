use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use futures::StreamExt;
use tracing::{info, warn};

use crate::config::Config;
use crate::date_utils::date_range;
use crate::db::db_manager::DbManager;
use crate::db::models::prices::NewPriceModel;
use crate::db::models::runs::NewRunModel;
use crate::db::queries::prices as prices_queries;
use crate::error::TrackerError;
use crate::fetch::client::{FetchOutcome, RateClient};

/// Date-level completion tracking. A calendar date is done once every
/// hotel's fetch for it has been processed. Monitoring only; it never
/// gates what gets written.
pub struct ProgressTracker {
    pending: HashMap<NaiveDate, usize>,
    total_dates: usize,
    dates_done: usize,
}

impl ProgressTracker {
    pub fn new(dates: &[NaiveDate], hotels_per_date: usize) -> Self {
        Self {
            pending: dates.iter().map(|&d| (d, hotels_per_date)).collect(),
            total_dates: dates.len(),
            dates_done: 0,
        }
    }

    /// Record one completed fetch. Returns `Some((done, total))` when this
    /// was the last outstanding fetch for its date.
    pub fn record(&mut self, date: NaiveDate) -> Option<(usize, usize)> {
        let remaining = self.pending.get_mut(&date)?;
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.pending.remove(&date);
            self.dates_done += 1;
            Some((self.dates_done, self.total_dates))
        } else {
            None
        }
    }
}

struct FetchTask {
    hotel_id: i64,
    hotel_name: String,
    hotel_key: String,
    stay_date: NaiveDate,
}

/// Fetch rates for every (hotel, stay-date) pair in the configured window
/// and store them as a new run. One task per cell, bounded parallelism;
/// results are drained in completion order and written by this single
/// task, so store writes stay serialized.
pub async fn run_fetch(
    db: &mut DbManager,
    cfg: &Config,
    client: &RateClient,
) -> Result<i64, TrackerError> {
    let (Some(start), Some(end)) = (cfg.runs.start_date, cfg.runs.end_date) else {
        return Err(TrackerError::InvalidConfig(
            "runs.start_date and runs.end_date must be configured for fetching".to_string(),
        ));
    };
    let dates = date_range(start, end);

    db.sync_hotels(&cfg.hotels).await?;
    let run_id = db
        .create_run(&NewRunModel::now(
            Some(start),
            Some(end),
            Some("api fetch".to_string()),
        ))
        .await?;

    let mut tasks = Vec::new();
    let mut fetchable_hotels = 0usize;
    for hotel in &cfg.hotels {
        let Some(key) = &hotel.key else {
            warn!(hotel = %hotel.name, "hotel has no API key, skipping fetch");
            continue;
        };
        fetchable_hotels += 1;
        let hotel_id = db.hotel_id_map[&hotel.name];
        for &stay_date in &dates {
            tasks.push(FetchTask {
                hotel_id,
                hotel_name: hotel.name.clone(),
                hotel_key: key.clone(),
                stay_date,
            });
        }
    }

    info!(
        run_id,
        dates = dates.len(),
        hotels = fetchable_hotels,
        tasks = tasks.len(),
        pool = cfg.fetch.parallelism,
        "starting parallel fetch"
    );

    let fetch_cfg = &cfg.fetch;
    let sleep_seconds = fetch_cfg.sleep_seconds;
    let mut results = futures::stream::iter(tasks)
        .map(|task| {
            let client = client.clone();
            async move {
                let outcome = client
                    .fetch_rate(&task.hotel_key, task.stay_date, fetch_cfg)
                    .await;
                if sleep_seconds > 0 {
                    tokio::time::sleep(Duration::from_secs(sleep_seconds)).await;
                }
                (task, outcome)
            }
        })
        .buffer_unordered(fetch_cfg.parallelism);

    let mut progress = ProgressTracker::new(&dates, fetchable_hotels);
    while let Some((task, outcome)) = results.next().await {
        if let FetchOutcome::Failed(reason) = &outcome {
            warn!(
                hotel = %task.hotel_name,
                stay_date = %task.stay_date,
                reason,
                "rate fetch failed, storing as missing"
            );
        }
        prices_queries::upsert_price(
            &db.pool,
            &NewPriceModel {
                run_id,
                hotel_id: task.hotel_id,
                stay_date: task.stay_date,
                currency: Some(fetch_cfg.currency.clone()),
                price: outcome.price(),
                source: Some("api".to_string()),
            },
        )
        .await?;

        if let Some((done, total)) = progress.record(task.stay_date) {
            let pct = if total > 0 { done * 100 / total } else { 100 };
            info!(stay_date = %task.stay_date, "completed {done}/{total} dates ({pct}%)");
        }
    }

    Ok(run_id)
}
