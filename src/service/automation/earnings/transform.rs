use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::models::{CardSequence, DateGroupMap, DisplayCard};
use crate::service::automation::earnings::calendar::{is_weekend, long_date};

/// Business days shown on one board.
pub const MAX_BUSINESS_DAYS: usize = 10;

/// Day labels are assigned by display slot, cycling Monday to Friday.
pub const WEEKDAY_LABELS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// Records or group keys that cannot be turned into cards.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("record {symbol} has unparseable report date {raw:?}")]
    InvalidDate { symbol: String, raw: String },
    #[error("group key {0:?} is not a YYYY-MM-DD date")]
    InvalidKey(String),
}

/// Header subtitle describing the period the board starts at.
pub fn header_subtitle(today: NaiveDate) -> String {
    format!("Week of {}", long_date(today))
}

/// Flatten grouped earnings into the card layout served to the dashboard.
///
/// Header and note first, then up to [`MAX_BUSINESS_DAYS`] day blocks in date
/// order. Each block is a day label followed by its companies sorted by
/// symbol; a separator goes between blocks, never after the last one.
pub fn transform(groups: &DateGroupMap, today: NaiveDate) -> Result<CardSequence, TransformError> {
    let mut cards = vec![DisplayCard::header(header_subtitle(today)), DisplayCard::note()];

    let mut keys: Vec<&String> = groups.keys().collect();
    keys.sort();

    let mut days = Vec::with_capacity(MAX_BUSINESS_DAYS);
    for key in keys {
        if days.len() == MAX_BUSINESS_DAYS {
            break;
        }
        let date = NaiveDate::parse_from_str(key, "%Y-%m-%d")
            .map_err(|_| TransformError::InvalidKey(key.clone()))?;
        if is_weekend(date) {
            warn!("Skipping weekend group {} that slipped past grouping", key);
            continue;
        }
        days.push((date, &groups[key]));
    }

    for (business_day, (date, entries)) in days.iter().enumerate() {
        if business_day > 0 {
            cards.push(DisplayCard::separator());
        }

        let label = WEEKDAY_LABELS[business_day % WEEKDAY_LABELS.len()];
        cards.push(DisplayCard::day_label(label, date.day()));

        let mut sorted = entries.to_vec();
        sorted.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        for entry in &sorted {
            cards.push(DisplayCard::company(
                &entry.symbol,
                &entry.name,
                entry.estimated_eps,
            ));
        }
    }

    debug!(
        "Built {} cards covering {} business days",
        cards.len(),
        days.len()
    );

    Ok(cards)
}
