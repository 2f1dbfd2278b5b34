use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Inclusive list of calendar dates from `start` to `end`. Empty when the
/// bounds are inverted.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut d = start;
    while d <= end {
        dates.push(d);
        d += Duration::days(1);
    }
    dates
}

/// Parse a timestamp bound given as `YYYY-MM-DD` or a full ISO datetime.
/// A bare date maps to the start of day, or end of day when
/// `end_of_day` is set, so `--between 2024-01-01 2024-01-31` covers the
/// whole last day.
pub fn parse_time_bound(raw: &str, end_of_day: bool) -> Option<DateTime<Utc>> {
    if let Ok(dt) = raw.parse::<NaiveDateTime>() {
        return Some(dt.and_utc());
    }
    let date = raw.parse::<NaiveDate>().ok()?;
    let time = if end_of_day {
        NaiveTime::from_hms_opt(23, 59, 59)?
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)?
    };
    Some(date.and_time(time).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn time_bounds_expand_bare_dates() {
        let start = parse_time_bound("2024-01-01", false).unwrap();
        let end = parse_time_bound("2024-01-01", true).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-01-01T23:59:59+00:00");
        assert!(parse_time_bound("2024-01-01T12:30:00", false).is_some());
        assert!(parse_time_bound("nope", false).is_none());
    }

    #[test]
    fn range_is_inclusive() {
        let dates = date_range(day("2024-01-30"), day("2024-02-02"));
        assert_eq!(
            dates,
            vec![
                day("2024-01-30"),
                day("2024-01-31"),
                day("2024-02-01"),
                day("2024-02-02"),
            ]
        );
    }

    #[test]
    fn inverted_range_is_empty() {
        assert!(date_range(day("2024-02-01"), day("2024-01-01")).is_empty());
    }
}
