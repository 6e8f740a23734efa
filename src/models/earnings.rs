use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Earnings announcement as returned by the calendar API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEarningsRecord {
    pub symbol: String,
    #[serde(default, alias = "companyName")]
    pub name: Option<String>,
    #[serde(rename = "reportDate", alias = "date")]
    pub report_date: String,
    #[serde(default, rename = "estimatedEps", alias = "epsEstimated")]
    pub estimated_eps: Option<f64>,
}

/// One company reporting on a given business day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedEntry {
    pub symbol: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_eps: Option<f64>,
}

impl GroupedEntry {
    pub fn from_record(record: &RawEarningsRecord) -> Self {
        Self {
            symbol: record.symbol.clone(),
            name: record
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| record.symbol.clone()),
            estimated_eps: record.estimated_eps,
        }
    }
}

/// `YYYY-MM-DD` date key to the companies reporting that day.
///
/// Never contains a weekend key; entries keep the order they arrived in.
pub type DateGroupMap = BTreeMap<String, Vec<GroupedEntry>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_calendar_api_field_names() {
        let raw = r#"{"date":"2024-01-15","symbol":"AAPL","eps":null,"epsEstimated":1.5,"time":"amc"}"#;
        let record: RawEarningsRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.symbol, "AAPL");
        assert_eq!(record.report_date, "2024-01-15");
        assert_eq!(record.estimated_eps, Some(1.5));
        assert_eq!(record.name, None);
    }

    #[test]
    fn deserializes_canonical_field_names() {
        let raw = r#"{"symbol":"MSFT","name":"Microsoft","reportDate":"2024-01-16 16:00"}"#;
        let record: RawEarningsRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.name.as_deref(), Some("Microsoft"));
        assert_eq!(record.report_date, "2024-01-16 16:00");
        assert_eq!(record.estimated_eps, None);
    }

    #[test]
    fn name_falls_back_to_symbol() {
        let record = RawEarningsRecord {
            symbol: "AAPL".into(),
            name: None,
            report_date: "2024-01-15".into(),
            estimated_eps: None,
        };
        assert_eq!(GroupedEntry::from_record(&record).name, "AAPL");

        let blank = RawEarningsRecord {
            name: Some("  ".into()),
            ..record
        };
        assert_eq!(GroupedEntry::from_record(&blank).name, "AAPL");
    }
}
