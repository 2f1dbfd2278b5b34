//! End-to-end report generation against an in-memory store.

mod common;

use common::{create_run, day, put_price, setup_db, two_hotel_config};
use hotel_rate_tracker::db::queries::prices as prices_queries;
use hotel_rate_tracker::error::TrackerError;
use hotel_rate_tracker::report;
use hotel_rate_tracker::report::render;
use hotel_rate_tracker::report::severity::Severity;

#[tokio::test]
async fn two_run_report_flags_the_average_jump() {
    let mut db = setup_db().await;
    let cfg = two_hotel_config();
    db.sync_hotels(&cfg.hotels).await.unwrap();
    let a = db.hotel_id_map["Hotel A"];
    let b = db.hotel_id_map["Hotel B"];

    // R1 (older): A=100, B=200. R2 (current): A=130, B=200.
    let r1 = create_run(&db, 24, "r1").await;
    let r2 = create_run(&db, 0, "r2").await;
    put_price(&db, r1, a, "2024-01-01", Some(100.0)).await;
    put_price(&db, r1, b, "2024-01-01", Some(200.0)).await;
    put_price(&db, r2, a, "2024-01-01", Some(130.0)).await;
    put_price(&db, r2, b, "2024-01-01", Some(200.0)).await;

    let rep = report::generate(&db, &cfg).await.unwrap();
    assert_eq!(rep.current_run_id, r2);
    assert_eq!(rep.rows.len(), 1);

    let row = &rep.rows[0];
    assert_eq!(row.date, day("2024-01-01"));
    assert_eq!(row.avg.value, Some(165.0));
    // Avg of R1 is 150 => +10%, the low threshold exactly.
    let delta = row.delta_avg.value.unwrap();
    assert!((delta - 0.10).abs() < 1e-9);
    assert_eq!(row.delta_avg.severity, Some(Severity::Low));

    // Cell-level deltas are informational only.
    assert!((row.cells[0].delta_vs_prev.unwrap() - 0.30).abs() < 1e-9);

    let html = render::render_html(&rep, &cfg);
    assert!(html.contains("<td class='sev-low'>+10%</td>"));
    assert!(html.contains("Hotel A"));
}

#[tokio::test]
async fn missing_comparison_run_leaves_delta_column_blank() {
    let mut db = setup_db().await;
    let cfg = two_hotel_config();
    db.sync_hotels(&cfg.hotels).await.unwrap();
    let a = db.hotel_id_map["Hotel A"];

    let r1 = create_run(&db, 24, "r1").await;
    let r2 = create_run(&db, 0, "r2").await;
    // The comparison run has no observation for the second date.
    put_price(&db, r1, a, "2024-01-01", Some(100.0)).await;
    put_price(&db, r2, a, "2024-01-01", Some(110.0)).await;
    put_price(&db, r2, a, "2024-01-02", Some(300.0)).await;

    let rep = report::generate(&db, &cfg).await.unwrap();
    let second = &rep.rows[1];
    assert_eq!(second.date, day("2024-01-02"));
    assert_eq!(second.avg.value, Some(300.0));
    assert_eq!(second.delta_avg.value, None);
    assert_eq!(second.delta_avg.severity, None);
}

#[tokio::test]
async fn empty_store_is_a_hard_error() {
    let db = setup_db().await;
    let cfg = two_hotel_config();
    let err = report::generate(&db, &cfg).await.unwrap_err();
    assert!(matches!(err, TrackerError::NoRuns));
}

#[tokio::test]
async fn current_run_without_observations_degrades_to_missing_rows() {
    let mut db = setup_db().await;
    let cfg = two_hotel_config();
    db.sync_hotels(&cfg.hotels).await.unwrap();
    let a = db.hotel_id_map["Hotel A"];

    let r1 = create_run(&db, 24, "has data").await;
    let _r2 = create_run(&db, 0, "empty current").await;
    put_price(&db, r1, a, "2024-01-01", Some(100.0)).await;

    let rep = report::generate(&db, &cfg).await.unwrap();
    assert_eq!(rep.rows.len(), 1);
    let row = &rep.rows[0];
    assert!(row.cells.iter().all(|c| c.price.is_none()));
    assert_eq!(row.avg.value, None);
    assert_eq!(row.delta_avg.value, None);
}

#[tokio::test]
async fn upsert_is_idempotent_with_last_write_winning() {
    let mut db = setup_db().await;
    let cfg = two_hotel_config();
    db.sync_hotels(&cfg.hotels).await.unwrap();
    let a = db.hotel_id_map["Hotel A"];
    let run = create_run(&db, 0, "run").await;

    put_price(&db, run, a, "2024-01-01", Some(100.0)).await;
    put_price(&db, run, a, "2024-01-01", Some(120.0)).await;

    let observations = prices_queries::get_prices_for_run(&db.pool, run).await.unwrap();
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].price, Some(120.0));
}

#[tokio::test]
async fn stored_null_price_never_counts_as_zero() {
    let mut db = setup_db().await;
    let cfg = two_hotel_config();
    db.sync_hotels(&cfg.hotels).await.unwrap();
    let a = db.hotel_id_map["Hotel A"];
    let b = db.hotel_id_map["Hotel B"];
    let run = create_run(&db, 0, "run").await;

    put_price(&db, run, a, "2024-01-01", Some(100.0)).await;
    put_price(&db, run, b, "2024-01-01", None).await;

    let rep = report::generate(&db, &cfg).await.unwrap();
    // Average over the single present price, not (100 + 0) / 2.
    assert_eq!(rep.rows[0].avg.value, Some(100.0));
}
