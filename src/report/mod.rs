pub mod analytics;
pub mod assembler;
pub mod matrix;
pub mod render;
pub mod selector;
pub mod severity;

use tracing::{info, warn};

use crate::config::Config;
use crate::db::db_manager::DbManager;
use crate::db::queries::{hotels as hotels_queries, prices as prices_queries, runs as runs_queries};
use crate::error::TrackerError;
use assembler::{Report, build_report, hotel_display_order};
use matrix::PriceMatrix;
use selector::{runs_to_fetch, select_runs};

/// Load the relevant runs and observations from the store and assemble the
/// report. The assembly itself is pure; this is the only I/O boundary.
pub async fn generate(db: &DbManager, cfg: &Config) -> Result<Report, TrackerError> {
    let runs = runs_queries::fetch_runs(
        &db.pool,
        Some(runs_to_fetch(
            cfg.runs.lookback_runs,
            cfg.runs.avg_prev_offset,
        )),
    )
    .await?;
    let selection = select_runs(&runs, cfg.runs.lookback_runs, cfg.runs.avg_prev_offset)?;

    let stored_hotels = hotels_queries::list_hotels(&db.pool).await?;
    let columns = hotel_display_order(&cfg.hotels, &stored_hotels);

    let observations = prices_queries::get_prices_for_runs(&db.pool, &selection.run_ids()).await?;
    let matrix = PriceMatrix::from_observations(&observations);

    if !matrix.run_has_observations(selection.current.id) {
        // Degrades to an all-missing report rather than failing.
        warn!(
            run_id = selection.current.id,
            "current run has no observations in the reporting window"
        );
    }

    let report = build_report(
        &matrix,
        &selection,
        &columns,
        &cfg.runs,
        &cfg.spike.levels,
    );
    info!(
        run_id = report.current_run_id,
        rows = report.rows.len(),
        hotels = report.columns.len(),
        "assembled report"
    );
    Ok(report)
}
