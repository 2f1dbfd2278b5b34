use chrono::NaiveDate;
use sqlx::FromRow;

/// One (run, hotel, stay-date) price observation. `price` is `None` when no
/// quote was available; absence must stay absence, never zero.
#[derive(Debug, Clone, FromRow)]
pub struct PriceModel {
    pub run_id: i64,
    pub hotel_id: i64,
    pub stay_date: NaiveDate,
    pub price: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct NewPriceModel {
    pub run_id: i64,
    pub hotel_id: i64,
    pub stay_date: NaiveDate,
    pub currency: Option<String>,
    pub price: Option<f64>,
    pub source: Option<String>,
}
