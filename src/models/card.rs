use serde::{Deserialize, Serialize};

/// Title shown on the first card of every board.
pub const HEADER_TITLE: &str = "Upcoming Earnings";
/// Advisory text shown right below the header.
pub const NOTE_TEXT: &str = "Report dates and EPS estimates are subject to change.";
/// Value of the card placed between two business days.
pub const SEPARATOR_VALUE: &str = "---";

/// Flat display record consumed by the dashboard.
///
/// The variant (header, note, day label, company, separator) is carried by
/// convention in the field values, not by a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayCard {
    pub value: String,
    pub title: String,
    pub subtitle: String,
}

impl DisplayCard {
    fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            title: String::new(),
            subtitle: String::new(),
        }
    }

    pub fn header(subtitle: impl Into<String>) -> Self {
        Self {
            value: HEADER_TITLE.to_string(),
            title: String::new(),
            subtitle: subtitle.into(),
        }
    }

    pub fn note() -> Self {
        Self::plain(NOTE_TEXT)
    }

    /// `"<WeekdayName> - <dayOfMonth>"`, e.g. `"Monday - 15"`.
    pub fn day_label(weekday: &str, day_of_month: u32) -> Self {
        Self::plain(format!("{weekday} - {day_of_month}"))
    }

    pub fn company(symbol: &str, name: &str, estimated_eps: Option<f64>) -> Self {
        Self {
            value: symbol.to_string(),
            title: name.to_string(),
            subtitle: estimated_eps
                .map(|eps| format!("Est. EPS: ${eps}"))
                .unwrap_or_default(),
        }
    }

    pub fn separator() -> Self {
        Self::plain(SEPARATOR_VALUE)
    }

    pub fn is_separator(&self) -> bool {
        self.value == SEPARATOR_VALUE && self.title.is_empty() && self.subtitle.is_empty()
    }
}

/// Ordered cards making up one board; the only artifact cached and served.
pub type CardSequence = Vec<DisplayCard>;

/// Body returned by the manual refresh endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_subtitle_formats_eps() {
        assert_eq!(
            DisplayCard::company("AAPL", "Apple", Some(1.5)).subtitle,
            "Est. EPS: $1.5"
        );
        assert_eq!(
            DisplayCard::company("F", "Ford", Some(-0.25)).subtitle,
            "Est. EPS: $-0.25"
        );
        assert_eq!(DisplayCard::company("X", "X", Some(2.0)).subtitle, "Est. EPS: $2");
        assert_eq!(DisplayCard::company("X", "X", None).subtitle, "");
    }

    #[test]
    fn day_label_format() {
        let card = DisplayCard::day_label("Monday", 15);
        assert_eq!(card.value, "Monday - 15");
        assert!(card.title.is_empty() && card.subtitle.is_empty());
    }

    #[test]
    fn serializes_as_flat_object() {
        let json = serde_json::to_value(DisplayCard::separator()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "value": "---", "title": "", "subtitle": "" })
        );
    }
}
