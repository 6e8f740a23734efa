use chrono::NaiveDate;
use tracing::debug;

use crate::models::{DateGroupMap, GroupedEntry, RawEarningsRecord};
use crate::service::automation::earnings::calendar::is_weekend;
use crate::service::automation::earnings::TransformError;

/// Date part of a report timestamp, ignoring any time-of-day suffix.
///
/// Accepts `2024-01-15`, `2024-01-15 16:00` and `2024-01-15T16:00:00Z`.
pub fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Group records by report date, dropping weekend dates.
///
/// Duplicate symbols on the same day are kept in arrival order.
pub fn group_by_date(records: &[RawEarningsRecord]) -> Result<DateGroupMap, TransformError> {
    let mut grouped = DateGroupMap::new();
    let mut weekend_dropped = 0usize;

    for record in records {
        let date =
            parse_report_date(&record.report_date).ok_or_else(|| TransformError::InvalidDate {
                symbol: record.symbol.clone(),
                raw: record.report_date.clone(),
            })?;

        if is_weekend(date) {
            weekend_dropped += 1;
            continue;
        }

        grouped
            .entry(date.format("%Y-%m-%d").to_string())
            .or_default()
            .push(GroupedEntry::from_record(record));
    }

    debug!(
        "Grouped {} records into {} dates ({} weekend records dropped)",
        records.len(),
        grouped.len(),
        weekend_dropped
    );

    Ok(grouped)
}
