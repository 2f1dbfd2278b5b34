use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::db::models::prices::PriceModel;

/// Sparse three-axis price lookup: run -> hotel -> stay-date -> price.
/// Built once per report from the selected runs' observations and
/// read-only afterwards. A stored row with a NULL price and no row at all
/// both read back as `None`.
#[derive(Debug, Default)]
pub struct PriceMatrix {
    by_run: HashMap<i64, HashMap<i64, HashMap<NaiveDate, Option<f64>>>>,
    dates: BTreeSet<NaiveDate>,
}

impl PriceMatrix {
    /// Merge observations from any number of runs, in any row order.
    pub fn from_observations(observations: &[PriceModel]) -> Self {
        let mut matrix = Self::default();
        for obs in observations {
            matrix
                .by_run
                .entry(obs.run_id)
                .or_default()
                .entry(obs.hotel_id)
                .or_default()
                .insert(obs.stay_date, obs.price);
            matrix.dates.insert(obs.stay_date);
        }
        matrix
    }

    /// O(1) cell lookup.
    pub fn price(&self, run_id: i64, hotel_id: i64, date: NaiveDate) -> Option<f64> {
        self.by_run
            .get(&run_id)?
            .get(&hotel_id)?
            .get(&date)
            .copied()
            .flatten()
    }

    /// All observed stay dates within the optional bounds, ascending.
    pub fn dates_in_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Vec<NaiveDate> {
        self.dates
            .iter()
            .copied()
            .filter(|d| start.is_none_or(|s| *d >= s))
            .filter(|d| end.is_none_or(|e| *d <= e))
            .collect()
    }

    /// Whether a run contributed any observation at all.
    pub fn run_has_observations(&self, run_id: i64) -> bool {
        self.by_run.get(&run_id).is_some_and(|h| !h.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn obs(run_id: i64, hotel_id: i64, date: &str, price: Option<f64>) -> PriceModel {
        PriceModel {
            run_id,
            hotel_id,
            stay_date: day(date),
            price,
        }
    }

    #[test]
    fn merges_runs_and_looks_up_cells() {
        let matrix = PriceMatrix::from_observations(&[
            obs(2, 10, "2024-01-02", Some(120.0)),
            obs(1, 10, "2024-01-01", Some(100.0)),
            obs(2, 11, "2024-01-01", Some(210.0)),
        ]);
        assert_eq!(matrix.price(1, 10, day("2024-01-01")), Some(100.0));
        assert_eq!(matrix.price(2, 11, day("2024-01-01")), Some(210.0));
        assert_eq!(matrix.price(1, 11, day("2024-01-01")), None);
        assert_eq!(matrix.price(3, 10, day("2024-01-01")), None);
    }

    #[test]
    fn null_price_row_reads_as_missing() {
        let matrix = PriceMatrix::from_observations(&[obs(1, 10, "2024-01-01", None)]);
        assert_eq!(matrix.price(1, 10, day("2024-01-01")), None);
        // The date still counts as observed even though the quote is missing.
        assert_eq!(
            matrix.dates_in_range(None, None),
            vec![day("2024-01-01")]
        );
    }

    #[test]
    fn dates_are_sorted_and_bounded() {
        let matrix = PriceMatrix::from_observations(&[
            obs(1, 10, "2024-01-03", Some(1.0)),
            obs(1, 10, "2024-01-01", Some(1.0)),
            obs(2, 10, "2024-01-02", Some(1.0)),
            obs(1, 10, "2024-01-05", Some(1.0)),
        ]);
        assert_eq!(
            matrix.dates_in_range(Some(day("2024-01-02")), Some(day("2024-01-04"))),
            vec![day("2024-01-02"), day("2024-01-03")]
        );
    }

    #[test]
    fn empty_runs_are_tolerated() {
        let matrix = PriceMatrix::from_observations(&[]);
        assert!(!matrix.run_has_observations(1));
        assert!(matrix.dates_in_range(None, None).is_empty());
    }
}
