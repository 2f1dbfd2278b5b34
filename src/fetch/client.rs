use chrono::{Duration, NaiveDate};
use serde::Deserialize;

use crate::config::FetchConfig;

pub const API_BASE: &str = "https://data.xotelo.com/api/rates";

/// Outcome of one rate fetch. Failures keep their reason for logging; they
/// become a missing observation only at the storage-write boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Quoted(f64),
    NoQuote,
    Failed(String),
}

impl FetchOutcome {
    pub fn price(&self) -> Option<f64> {
        match self {
            FetchOutcome::Quoted(price) => Some(*price),
            FetchOutcome::NoQuote | FetchOutcome::Failed(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    error: Option<serde_json::Value>,
    result: Option<RatesResult>,
}

#[derive(Debug, Deserialize)]
struct RatesResult {
    #[serde(default)]
    rates: Vec<Rate>,
}

#[derive(Debug, Deserialize)]
struct Rate {
    rate: f64,
}

/// Thin client for the remote rates API.
#[derive(Clone)]
pub struct RateClient {
    http: reqwest::Client,
    base_url: String,
}

impl RateClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_url(http, API_BASE.to_string())
    }

    pub fn with_base_url(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    /// Fetch the nightly rate for one hotel and stay date (check-out is the
    /// next day). Never returns an error: every failure mode collapses into
    /// a `FetchOutcome`.
    pub async fn fetch_rate(
        &self,
        hotel_key: &str,
        stay_date: NaiveDate,
        fetch_cfg: &FetchConfig,
    ) -> FetchOutcome {
        let chk_out = stay_date + Duration::days(1);
        let request = self.http.get(&self.base_url).query(&[
            ("hotel_key", hotel_key),
            ("chk_in", &stay_date.to_string()),
            ("chk_out", &chk_out.to_string()),
            ("currency", &fetch_cfg.currency),
            ("adults", &fetch_cfg.adults.to_string()),
            ("rooms", &fetch_cfg.rooms.to_string()),
        ]);

        let response = match request.send().await {
            Ok(resp) => resp,
            Err(e) => return FetchOutcome::Failed(format!("request failed: {e}")),
        };
        let body: RatesResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => return FetchOutcome::Failed(format!("invalid response body: {e}")),
        };

        if let Some(err) = body.error {
            return FetchOutcome::Failed(format!("api error: {err}"));
        }
        match body.result.map(|r| r.rates).unwrap_or_default().first() {
            Some(rate) => FetchOutcome::Quoted(rate.rate),
            None => FetchOutcome::NoQuote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_maps_to_optional_price_at_the_boundary() {
        assert_eq!(FetchOutcome::Quoted(123.0).price(), Some(123.0));
        assert_eq!(FetchOutcome::NoQuote.price(), None);
        assert_eq!(FetchOutcome::Failed("timeout".to_string()).price(), None);
    }

    #[test]
    fn parses_rates_payload() {
        let body: RatesResponse = serde_json::from_str(
            r#"{"error": null, "result": {"rates": [{"rate": 181.5}, {"rate": 190.0}]}}"#,
        )
        .unwrap();
        assert!(body.error.is_none());
        assert_eq!(body.result.unwrap().rates[0].rate, 181.5);
    }

    #[test]
    fn parses_error_payload_without_result() {
        let body: RatesResponse =
            serde_json::from_str(r#"{"error": {"status": 404}, "result": null}"#).unwrap();
        assert!(body.error.is_some());
    }
}
