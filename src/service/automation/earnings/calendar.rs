use chrono::{Datelike, Duration, NaiveDate};

/// Calendar days covered by one fetch, counted from today.
pub const FETCH_WINDOW_DAYS: i64 = 14;

/// Inclusive date range requested from the earnings API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl FetchWindow {
    pub fn from_iso(&self) -> String {
        self.from.format("%Y-%m-%d").to_string()
    }

    pub fn to_iso(&self) -> String {
        self.to.format("%Y-%m-%d").to_string()
    }
}

impl std::fmt::Display for FetchWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.from_iso(), self.to_iso())
    }
}

/// Saturday or Sunday (day 6 or day 0 counting from Sunday).
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday().num_days_from_sunday(), 0 | 6)
}

/// Window of `today ..= today + 14 days`.
///
/// `today` is the calendar date of the reference instant in the configured
/// timezone; callers convert before calling.
pub fn compute_fetch_window(today: NaiveDate) -> FetchWindow {
    FetchWindow {
        from: today,
        to: today + Duration::days(FETCH_WINDOW_DAYS),
    }
}

/// Long form used on the header card, e.g. `"January 15, 2024"`.
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn weekend_is_saturday_and_sunday_only() {
        // 2024-01-14 is a Sunday.
        let sunday = d(2024, 1, 14);
        let flags: Vec<bool> = (0..7)
            .map(|offset| is_weekend(sunday + Duration::days(offset)))
            .collect();
        assert_eq!(flags, vec![true, false, false, false, false, false, true]);
    }

    #[test]
    fn weekend_holds_across_many_weeks() {
        let start = d(2023, 12, 25);
        for offset in 0..400 {
            let date = start + Duration::days(offset);
            let expected = matches!(
                date.weekday(),
                chrono::Weekday::Sat | chrono::Weekday::Sun
            );
            assert_eq!(is_weekend(date), expected, "{date}");
        }
    }

    #[test]
    fn fetch_window_spans_fourteen_days() {
        for offset in 0..60 {
            let today = d(2024, 2, 20) + Duration::days(offset);
            let window = compute_fetch_window(today);
            assert_eq!(window.from, today);
            assert_eq!((window.to - window.from).num_days(), 14);
        }
    }

    #[test]
    fn fetch_window_crosses_year_boundary() {
        let window = compute_fetch_window(d(2024, 12, 25));
        assert_eq!(window.from_iso(), "2024-12-25");
        assert_eq!(window.to_iso(), "2025-01-08");
        assert_eq!(window.to_string(), "2024-12-25..2025-01-08");
    }

    #[test]
    fn long_date_rendering() {
        assert_eq!(long_date(d(2024, 1, 5)), "January 5, 2024");
        assert_eq!(long_date(d(2026, 10, 19)), "October 19, 2026");
    }
}
