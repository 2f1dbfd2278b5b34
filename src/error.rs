use thiserror::Error;

/// Errors surfaced by the tracker library. Remote-fetch failures are not
/// represented here: the fetch pipeline maps them to missing observations
/// at the storage boundary and only logs the reason.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("no runs found in the database; ingest or fetch data first")]
    NoRuns,

    #[error("run {run_id} has no price observations in the requested window")]
    NoObservations { run_id: i64 },

    #[error(
        "spike thresholds must satisfy 0 < low < medium < high, got low={low}, medium={medium}, high={high}"
    )]
    MisconfiguredThresholds { low: f64, medium: f64, high: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid CSV: {0}")]
    InvalidCsv(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}
