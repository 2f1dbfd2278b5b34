use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::TrackerError;
use crate::report::severity::SpikeLevels;

/// Top-level configuration, loaded once from a JSON file and passed
/// explicitly into every component. Nothing in the library reads the
/// environment; binaries may override `db_path` from their own flags.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default = "default_report_dir")]
    pub report_dir: String,
    #[serde(default)]
    pub runs: RunsConfig,
    #[serde(default)]
    pub spike: SpikeConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub hotels: Vec<HotelConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunsConfig {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// How many prior runs to expose for per-cell comparison.
    #[serde(default = "default_lookback_runs")]
    pub lookback_runs: usize,
    /// Trailing window (in in-range dates) for the Avg column baseline.
    #[serde(default = "default_lookback_days_avg")]
    pub lookback_days_avg: usize,
    /// Which prior run (counted from the current one) the Δ Avg column
    /// compares against. Must be >= 1.
    #[serde(default = "default_avg_prev_offset")]
    pub avg_prev_offset: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpikeConfig {
    #[serde(default)]
    pub levels: SpikeLevels,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default = "default_rooms")]
    pub rooms: u32,
    /// Maximum number of in-flight rate requests.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Optional pause after each request, for API politeness.
    #[serde(default)]
    pub sleep_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HotelConfig {
    pub name: String,
    /// API key for the rates endpoint; hotels without one are still
    /// reported but never fetched.
    pub key: Option<String>,
}

fn default_db_path() -> String {
    "pricing.db".to_string()
}
fn default_report_dir() -> String {
    "reports".to_string()
}
fn default_lookback_runs() -> usize {
    3
}
fn default_lookback_days_avg() -> usize {
    5
}
fn default_avg_prev_offset() -> usize {
    1
}
fn default_currency() -> String {
    "EUR".to_string()
}
fn default_adults() -> u32 {
    2
}
fn default_rooms() -> u32 {
    1
}
fn default_parallelism() -> usize {
    8
}

impl Default for RunsConfig {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            lookback_runs: default_lookback_runs(),
            lookback_days_avg: default_lookback_days_avg(),
            avg_prev_offset: default_avg_prev_offset(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            adults: default_adults(),
            rooms: default_rooms(),
            parallelism: default_parallelism(),
            sleep_seconds: 0,
        }
    }
}

impl Config {
    /// Load and validate configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TrackerError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            TrackerError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        let cfg: Config = serde_json::from_str(&raw)
            .map_err(|e| TrackerError::InvalidConfig(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validation happens at load so a misconfiguration fails fast instead
    /// of silently misclassifying spikes later.
    pub fn validate(&self) -> Result<(), TrackerError> {
        self.spike.levels.validate()?;
        if self.runs.avg_prev_offset < 1 {
            return Err(TrackerError::InvalidConfig(
                "runs.avg_prev_offset must be >= 1 (0 would compare the current run to itself)"
                    .to_string(),
            ));
        }
        if self.fetch.parallelism < 1 {
            return Err(TrackerError::InvalidConfig(
                "fetch.parallelism must be >= 1".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (self.runs.start_date, self.runs.end_date) {
            if start > end {
                return Err(TrackerError::InvalidConfig(format!(
                    "runs.start_date {start} is after runs.end_date {end}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_json(json: &str) -> Result<(), TrackerError> {
        let cfg: Config = serde_json::from_str(json).unwrap();
        cfg.validate()
    }

    #[test]
    fn defaults_are_valid() {
        validate_json("{}").unwrap();
    }

    #[test]
    fn rejects_zero_avg_prev_offset() {
        let err = validate_json(r#"{"runs": {"avg_prev_offset": 0}}"#).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_unordered_spike_levels() {
        let err =
            validate_json(r#"{"spike": {"levels": {"low": 0.3, "medium": 0.2, "high": 0.1}}}"#)
                .unwrap_err();
        assert!(matches!(err, TrackerError::MisconfiguredThresholds { .. }));
    }

    #[test]
    fn rejects_inverted_date_window() {
        let err =
            validate_json(r#"{"runs": {"start_date": "2024-02-01", "end_date": "2024-01-01"}}"#)
                .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidConfig(_)));
    }
}
