//! Shared helpers for integration tests: an in-memory store plus small
//! builders for runs and observations.

use chrono::{Duration, NaiveDate, Utc};

use hotel_rate_tracker::config::Config;
use hotel_rate_tracker::db::db_manager::DbManager;
use hotel_rate_tracker::db::models::prices::NewPriceModel;
use hotel_rate_tracker::db::models::runs::NewRunModel;
use hotel_rate_tracker::db::queries::prices as prices_queries;

pub async fn setup_db() -> DbManager {
    DbManager::init(":memory:").await.unwrap()
}

/// Config with two hotels (A, B) and default analytics settings.
pub fn two_hotel_config() -> Config {
    serde_json::from_str(
        r#"{
            "db_path": ":memory:",
            "hotels": [ {"name": "Hotel A"}, {"name": "Hotel B"} ]
        }"#,
    )
    .unwrap()
}

pub fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Create a run stamped `hours_ago` hours in the past, so test runs order
/// deterministically.
pub async fn create_run(db: &DbManager, hours_ago: i64, note: &str) -> i64 {
    db.create_run(&NewRunModel {
        run_timestamp: Utc::now() - Duration::hours(hours_ago),
        start_date: None,
        end_date: None,
        note: Some(note.to_string()),
    })
    .await
    .unwrap()
}

pub async fn put_price(db: &DbManager, run_id: i64, hotel_id: i64, date: &str, price: Option<f64>) {
    prices_queries::upsert_price(
        &db.pool,
        &NewPriceModel {
            run_id,
            hotel_id,
            stay_date: day(date),
            currency: Some("EUR".to_string()),
            price,
            source: Some("test".to_string()),
        },
    )
    .await
    .unwrap();
}
