use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct RunModel {
    pub id: i64,
    pub run_timestamp: DateTime<Utc>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub note: Option<String>,
}

#[derive(Debug)]
pub struct NewRunModel {
    pub run_timestamp: DateTime<Utc>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub note: Option<String>,
}

impl NewRunModel {
    pub fn now(
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        note: Option<String>,
    ) -> Self {
        Self {
            run_timestamp: Utc::now(),
            start_date,
            end_date,
            note,
        }
    }
}
