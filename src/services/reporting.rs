//! Small numeric helpers shared by the analytics aggregators.

use chrono::{DateTime, Months, Utc};

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole` as a whole-number percentage, 0 when `whole` is 0.
pub fn percent(part: i64, whole: i64) -> i64 {
    if whole <= 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as i64
}

/// Integer-rounded mean, 0 for an empty population.
pub fn rounded_mean(total: i64, count: i64) -> i64 {
    if count <= 0 {
        return 0;
    }
    (total as f64 / count as f64).round() as i64
}

/// Calendar-month bucket key (`YYYY-MM`, UTC).
pub fn month_key(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

/// Start of a trailing reporting window of `months` calendar months.
/// Days past the end of the target month clamp to its last day.
pub fn window_start(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(1.0), 1.0);
    }

    #[test]
    fn percent_guards_zero_denominator() {
        assert_eq!(percent(5, 0), 0);
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 2), 50);
    }

    #[test]
    fn rounded_mean_handles_empty() {
        assert_eq!(rounded_mean(10, 0), 0);
        assert_eq!(rounded_mean(7, 2), 4);
        assert_eq!(rounded_mean(5, 3), 2);
    }

    #[test]
    fn month_key_is_year_month() {
        let at = Utc.with_ymd_and_hms(2026, 3, 9, 23, 59, 0).unwrap();
        assert_eq!(month_key(&at), "2026-03");
    }

    #[test]
    fn window_start_clamps_to_month_end() {
        let now = Utc.with_ymd_and_hms(2026, 8, 31, 12, 0, 0).unwrap();
        let start = window_start(now, 6);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 2, 28, 12, 0, 0).unwrap());
    }

    #[test]
    fn window_start_crosses_year_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 8, 30, 0).unwrap();
        assert_eq!(
            window_start(now, 6),
            Utc.with_ymd_and_hms(2025, 9, 15, 8, 30, 0).unwrap()
        );
    }
}
