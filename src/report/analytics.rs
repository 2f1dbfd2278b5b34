use std::collections::HashMap;

use chrono::NaiveDate;

use crate::report::matrix::PriceMatrix;

/// Mean of the present values, `None` when there are none. Missing cells
/// contribute nothing; they never count as zero.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

/// Cross-hotel average price for one run and one stay date.
pub fn row_average(
    matrix: &PriceMatrix,
    run_id: i64,
    hotel_ids: &[i64],
    date: NaiveDate,
) -> Option<f64> {
    mean(
        hotel_ids
            .iter()
            .filter_map(|&hid| matrix.price(run_id, hid, date)),
    )
}

/// Row averages for every date, keyed by date; dates with no present price
/// are absent from the map.
pub fn row_averages(
    matrix: &PriceMatrix,
    run_id: i64,
    hotel_ids: &[i64],
    dates: &[NaiveDate],
) -> HashMap<NaiveDate, f64> {
    dates
        .iter()
        .filter_map(|&d| row_average(matrix, run_id, hotel_ids, d).map(|avg| (d, avg)))
        .collect()
}

/// Trailing baseline per date: the mean of the row averages over the
/// `lookback` in-range dates strictly preceding each date. `dates` must be
/// ascending. Near the start of the range the window is shorter; a date
/// whose window holds no present average gets no baseline. The window is
/// over calendar proximity within the range, never over run history.
pub fn trailing_averages(
    dates: &[NaiveDate],
    row_avgs: &HashMap<NaiveDate, f64>,
    lookback: usize,
) -> HashMap<NaiveDate, f64> {
    let mut trailing = HashMap::new();
    if lookback == 0 {
        return trailing;
    }
    for (i, &date) in dates.iter().enumerate() {
        let window = &dates[i.saturating_sub(lookback)..i];
        if let Some(avg) = mean(window.iter().filter_map(|d| row_avgs.get(d).copied())) {
            trailing.insert(date, avg);
        }
    }
    trailing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::prices::PriceModel;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn matrix(rows: &[(i64, i64, &str, Option<f64>)]) -> PriceMatrix {
        let observations: Vec<PriceModel> = rows
            .iter()
            .map(|&(run_id, hotel_id, date, price)| PriceModel {
                run_id,
                hotel_id,
                stay_date: day(date),
                price,
            })
            .collect();
        PriceMatrix::from_observations(&observations)
    }

    #[test]
    fn row_average_ignores_missing_hotels() {
        let m = matrix(&[
            (1, 10, "2024-01-01", Some(100.0)),
            (1, 11, "2024-01-01", None),
        ]);
        assert_eq!(row_average(&m, 1, &[10, 11, 12], day("2024-01-01")), Some(100.0));
    }

    #[test]
    fn row_average_is_missing_when_no_hotel_has_a_price() {
        let m = matrix(&[(1, 10, "2024-01-01", None)]);
        assert_eq!(row_average(&m, 1, &[10, 11], day("2024-01-01")), None);
    }

    #[test]
    fn trailing_window_excludes_the_date_itself() {
        let dates: Vec<NaiveDate> = ["2024-01-01", "2024-01-02", "2024-01-03"]
            .iter()
            .map(|s| day(s))
            .collect();
        let row_avgs: HashMap<NaiveDate, f64> = dates
            .iter()
            .enumerate()
            .map(|(i, &d)| (d, 100.0 * (i + 1) as f64))
            .collect();

        let trailing = trailing_averages(&dates, &row_avgs, 5);
        // First date has no preceding dates at all.
        assert!(!trailing.contains_key(&dates[0]));
        assert_eq!(trailing[&dates[1]], 100.0);
        assert_eq!(trailing[&dates[2]], 150.0);
    }

    #[test]
    fn trailing_window_is_capped_at_lookback() {
        let dates: Vec<NaiveDate> = (1..=5)
            .map(|i| day(&format!("2024-01-0{i}")))
            .collect();
        let row_avgs: HashMap<NaiveDate, f64> =
            dates.iter().map(|&d| (d, 10.0)).collect();
        let mut row_avgs = row_avgs;
        row_avgs.insert(dates[3], 40.0);

        let trailing = trailing_averages(&dates, &row_avgs, 2);
        // Window for the 5th date is dates[2..4] = {10, 40}.
        assert_eq!(trailing[&dates[4]], 25.0);
    }

    #[test]
    fn trailing_skips_missing_row_averages() {
        let dates: Vec<NaiveDate> = (1..=4)
            .map(|i| day(&format!("2024-01-0{i}")))
            .collect();
        // Only the first date has an average.
        let row_avgs: HashMap<NaiveDate, f64> = [(dates[0], 80.0)].into_iter().collect();

        let trailing = trailing_averages(&dates, &row_avgs, 3);
        assert_eq!(trailing[&dates[1]], 80.0);
        assert_eq!(trailing[&dates[3]], 80.0);
        assert!(!trailing.contains_key(&dates[0]));
    }

    #[test]
    fn zero_lookback_produces_no_baselines() {
        let dates = vec![day("2024-01-01"), day("2024-01-02")];
        let row_avgs = [(dates[0], 1.0)].into_iter().collect();
        assert!(trailing_averages(&dates, &row_avgs, 0).is_empty());
    }
}
