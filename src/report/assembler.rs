use chrono::{DateTime, NaiveDate, Utc};

use crate::config::{HotelConfig, RunsConfig};
use crate::db::models::hotels::HotelModel;
use crate::report::analytics::{mean, row_averages, trailing_averages};
use crate::report::matrix::PriceMatrix;
use crate::report::selector::RunSelection;
use crate::report::severity::{Severity, SpikeLevels};

/// One report column, in display order.
#[derive(Debug, Clone)]
pub struct HotelColumn {
    pub id: i64,
    pub name: String,
}

/// Per-hotel cell: the current run's price plus an informational delta
/// against the most recent prior run. Cells carry no severity; only the
/// aggregate columns are classified.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceCell {
    pub price: Option<f64>,
    pub delta_vs_prev: Option<f64>,
}

/// An aggregate cell (Avg, or Δ Avg vs prev) with its own severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateCell {
    pub value: Option<f64>,
    pub severity: Option<Severity>,
}

#[derive(Debug)]
pub struct ReportRow {
    pub date: NaiveDate,
    pub cells: Vec<PriceCell>,
    /// Cross-hotel average for the current run, classified against the
    /// trailing baseline: "is today unusually expensive lately".
    pub avg: AggregateCell,
    /// Relative change of the average versus `prev_run_for_avg`'s average
    /// for the same date: "did the average jump since the comparison run".
    pub delta_avg: AggregateCell,
}

#[derive(Debug)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub current_run_id: i64,
    pub columns: Vec<HotelColumn>,
    pub rows: Vec<ReportRow>,
}

/// Column order: configured hotels first, in configured order, then any
/// store hotel missing from the config, by name. Deterministic for a given
/// config + store state.
pub fn hotel_display_order(
    configured: &[HotelConfig],
    stored: &[HotelModel],
) -> Vec<HotelColumn> {
    let mut columns: Vec<HotelColumn> = Vec::new();
    for hotel in configured {
        if let Some(row) = stored.iter().find(|h| h.name == hotel.name) {
            columns.push(HotelColumn {
                id: row.id,
                name: row.name.clone(),
            });
        }
    }
    let mut remaining: Vec<&HotelModel> = stored
        .iter()
        .filter(|h| !columns.iter().any(|c| c.id == h.id))
        .collect();
    remaining.sort_by(|a, b| a.name.cmp(&b.name));
    columns.extend(remaining.into_iter().map(|h| HotelColumn {
        id: h.id,
        name: h.name.clone(),
    }));
    columns
}

fn relative_change(current: f64, baseline: f64) -> Option<f64> {
    (baseline > 0.0).then(|| (current - baseline) / baseline)
}

/// Assemble the full report: one row per in-range date, ascending. A
/// current run with no in-window observations yields all-missing rows, not
/// an error.
pub fn build_report(
    matrix: &PriceMatrix,
    selection: &RunSelection,
    columns: &[HotelColumn],
    runs_cfg: &RunsConfig,
    levels: &SpikeLevels,
) -> Report {
    let dates = matrix.dates_in_range(runs_cfg.start_date, runs_cfg.end_date);
    let hotel_ids: Vec<i64> = columns.iter().map(|c| c.id).collect();
    let current_id = selection.current.id;
    let prev_cell_run = selection.prev_runs.first().map(|r| r.id);
    let avg_run = selection.prev_run_for_avg.as_ref().map(|r| r.id);

    let row_avgs = row_averages(matrix, current_id, &hotel_ids, &dates);
    let trailing = trailing_averages(&dates, &row_avgs, runs_cfg.lookback_days_avg);

    let rows = dates
        .iter()
        .map(|&date| {
            let cells = hotel_ids
                .iter()
                .map(|&hid| {
                    let price = matrix.price(current_id, hid, date);
                    let delta_vs_prev = match (price, prev_cell_run) {
                        (Some(cur), Some(prev_run)) => matrix
                            .price(prev_run, hid, date)
                            .and_then(|prev| relative_change(cur, prev)),
                        _ => None,
                    };
                    PriceCell {
                        price,
                        delta_vs_prev,
                    }
                })
                .collect();

            let cur_avg = row_avgs.get(&date).copied();

            // Avg column: classified against the trailing baseline only.
            let avg = AggregateCell {
                value: cur_avg,
                severity: cur_avg
                    .zip(trailing.get(&date).copied())
                    .and_then(|(cur, base)| relative_change(cur, base))
                    .and_then(|delta| levels.classify(delta)),
            };

            // Δ Avg column: classified against the comparison run's average
            // for the same date. Blank when either side is missing.
            let prev_avg = avg_run.and_then(|run_id| {
                mean(
                    hotel_ids
                        .iter()
                        .filter_map(|&hid| matrix.price(run_id, hid, date)),
                )
            });
            let delta_avg = match (cur_avg, prev_avg) {
                (Some(cur), Some(prev)) => {
                    let delta = relative_change(cur, prev);
                    AggregateCell {
                        value: delta,
                        severity: delta.and_then(|d| levels.classify(d)),
                    }
                }
                _ => AggregateCell::default(),
            };

            ReportRow {
                date,
                cells,
                avg,
                delta_avg,
            }
        })
        .collect();

    Report {
        generated_at: Utc::now(),
        current_run_id: current_id,
        columns: columns.to_vec(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::db::models::prices::PriceModel;
    use crate::db::models::runs::RunModel;
    use crate::report::selector::select_runs;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn run(id: i64, hours_ago: i64) -> RunModel {
        RunModel {
            id,
            run_timestamp: Utc::now() - Duration::hours(hours_ago),
            start_date: None,
            end_date: None,
            note: None,
        }
    }

    fn columns() -> Vec<HotelColumn> {
        vec![
            HotelColumn {
                id: 10,
                name: "Hotel A".to_string(),
            },
            HotelColumn {
                id: 11,
                name: "Hotel B".to_string(),
            },
        ]
    }

    fn obs(run_id: i64, hotel_id: i64, date: &str, price: f64) -> PriceModel {
        PriceModel {
            run_id,
            hotel_id,
            stay_date: day(date),
            price: Some(price),
        }
    }

    #[test]
    fn avg_and_delta_columns_use_independent_baselines() {
        // R2 (current): A=130, B=200. R1: A=100, B=200.
        let runs = [run(2, 0), run(1, 24)];
        let selection = select_runs(&runs, 3, 1).unwrap();
        let matrix = PriceMatrix::from_observations(&[
            obs(2, 10, "2024-01-01", 130.0),
            obs(2, 11, "2024-01-01", 200.0),
            obs(1, 10, "2024-01-01", 100.0),
            obs(1, 11, "2024-01-01", 200.0),
        ]);

        let report = build_report(
            &matrix,
            &selection,
            &columns(),
            &RunsConfig::default(),
            &SpikeLevels::default(),
        );

        assert_eq!(report.rows.len(), 1);
        let row = &report.rows[0];
        assert_eq!(row.avg.value, Some(165.0));
        // Single date in range, so no trailing baseline to classify against.
        assert_eq!(row.avg.severity, None);
        // (165 - 150) / 150 = +10% => low.
        let delta = row.delta_avg.value.unwrap();
        assert!((delta - 0.10).abs() < 1e-9);
        assert_eq!(row.delta_avg.severity, Some(Severity::Low));
        // Per-hotel informational delta, no severity at cell level.
        let a = &row.cells[0];
        assert!((a.delta_vs_prev.unwrap() - 0.30).abs() < 1e-9);
    }

    #[test]
    fn missing_comparison_baseline_leaves_delta_blank() {
        let runs = [run(2, 0), run(1, 24)];
        let selection = select_runs(&runs, 3, 1).unwrap();
        // Prior run has no observation for the date.
        let matrix = PriceMatrix::from_observations(&[obs(2, 10, "2024-01-01", 150.0)]);

        let report = build_report(
            &matrix,
            &selection,
            &columns(),
            &RunsConfig::default(),
            &SpikeLevels::default(),
        );

        let row = &report.rows[0];
        assert_eq!(row.avg.value, Some(150.0));
        assert_eq!(row.delta_avg.value, None);
        assert_eq!(row.delta_avg.severity, None);
    }

    #[test]
    fn empty_current_run_yields_all_missing_rows() {
        let runs = [run(2, 0), run(1, 24)];
        let selection = select_runs(&runs, 3, 1).unwrap();
        // Only the prior run observed anything.
        let matrix = PriceMatrix::from_observations(&[obs(1, 10, "2024-01-01", 100.0)]);

        let report = build_report(
            &matrix,
            &selection,
            &columns(),
            &RunsConfig::default(),
            &SpikeLevels::default(),
        );

        let row = &report.rows[0];
        assert!(row.cells.iter().all(|c| c.price.is_none()));
        assert_eq!(row.avg.value, None);
        assert_eq!(row.delta_avg.value, None);
    }

    #[test]
    fn trailing_spike_is_flagged_on_the_avg_column() {
        let runs = [run(1, 0)];
        let selection = select_runs(&runs, 3, 1).unwrap();
        let mut observations = Vec::new();
        for (i, date) in ["2024-01-01", "2024-01-02", "2024-01-03"].iter().enumerate() {
            let price = if i == 2 { 160.0 } else { 100.0 };
            observations.push(obs(1, 10, date, price));
        }
        let matrix = PriceMatrix::from_observations(&observations);

        let report = build_report(
            &matrix,
            &selection,
            &columns(),
            &RunsConfig::default(),
            &SpikeLevels::default(),
        );

        // +60% vs the trailing average of 100.
        assert_eq!(report.rows[2].avg.severity, Some(Severity::High));
        // No run to compare against, so every delta column is blank.
        assert!(report.rows.iter().all(|r| r.delta_avg.value.is_none()));
    }

    #[test]
    fn display_order_prefers_config_then_name() {
        let stored = vec![
            HotelModel {
                id: 1,
                name: "Zeta".to_string(),
                api_key: None,
            },
            HotelModel {
                id: 2,
                name: "Alpha".to_string(),
                api_key: None,
            },
            HotelModel {
                id: 3,
                name: "Mid".to_string(),
                api_key: None,
            },
        ];
        let configured = vec![
            HotelConfig {
                name: "Mid".to_string(),
                key: None,
            },
            HotelConfig {
                name: "Ghost".to_string(),
                key: None,
            },
            HotelConfig {
                name: "Zeta".to_string(),
                key: None,
            },
        ];
        let order: Vec<String> = hotel_display_order(&configured, &stored)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(order, vec!["Mid", "Zeta", "Alpha"]);
    }
}
