use std::time::Duration as StdDuration;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};

use crate::models::RawEarningsRecord;
use crate::service::finance::FinanceServiceError;

/// The API answers with either the record array or an error object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiTopLevel {
    Records(Vec<RawEarningsRecord>),
    Error(ApiErrorBody),
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default, alias = "Error Message", alias = "error", alias = "message")]
    error_message: Option<String>,
}

/// Fetch earnings for `from..=to` from the calendar endpoint.
pub async fn fetch_earnings_range(
    client: &reqwest::Client,
    api_url: &str,
    api_key: &str,
    from: NaiveDate,
    to: NaiveDate,
    timeout: StdDuration,
) -> Result<Vec<RawEarningsRecord>, FinanceServiceError> {
    let from_str = from.format("%Y-%m-%d").to_string();
    let to_str = to.format("%Y-%m-%d").to_string();

    info!("Fetching earnings from {} to {}", from_str, to_str);

    let resp = client
        .get(api_url)
        .query(&[
            ("from", from_str.as_str()),
            ("to", to_str.as_str()),
            ("apikey", api_key),
        ])
        .send()
        .await
        .map_err(|e| {
            warn!(
                "Earnings API request for {}..{} failed: {}",
                from_str, to_str, e
            );
            if e.is_timeout() {
                FinanceServiceError::Timeout(timeout)
            } else {
                FinanceServiceError::Http(e.to_string())
            }
        })?;

    info!("Received response with status: {}", resp.status());

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "unable to read body".to_string());
        warn!("Earnings API returned error status {}: {}", status, body);
        return Err(FinanceServiceError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let raw_bytes = resp.bytes().await.map_err(|e| {
        warn!("Failed to read earnings API body: {}", e);
        if e.is_timeout() {
            FinanceServiceError::Timeout(timeout)
        } else {
            FinanceServiceError::Http(format!("earnings body read failed: {e}"))
        }
    })?;

    let records = parse_records(&raw_bytes)?;

    info!(
        "Successfully parsed earnings payload for {}..{}; {} records",
        from_str,
        to_str,
        records.len()
    );

    Ok(records)
}

/// Decode a response body, treating an error-shaped object as a failure.
pub fn parse_records(raw_bytes: &[u8]) -> Result<Vec<RawEarningsRecord>, FinanceServiceError> {
    let parsed: ApiTopLevel = serde_json::from_slice(raw_bytes).map_err(|e| {
        let preview = String::from_utf8_lossy(&raw_bytes[..raw_bytes.len().min(500)]);
        warn!(
            "Failed to parse earnings API response: {}; body preview: {}",
            e, preview
        );
        FinanceServiceError::Parse(e.to_string())
    })?;

    match parsed {
        ApiTopLevel::Records(records) => Ok(records),
        ApiTopLevel::Error(body) => {
            let message = body
                .error_message
                .unwrap_or_else(|| "unexpected object instead of record array".to_string());
            warn!("Earnings API returned error object: {}", message);
            Err(FinanceServiceError::Api(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_record_array() {
        let body = br#"[
            {"date":"2024-01-15","symbol":"AAPL","epsEstimated":1.5},
            {"date":"2024-01-16","symbol":"MSFT","epsEstimated":null}
        ]"#;
        let records = parse_records(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].estimated_eps, None);
    }

    #[test]
    fn error_object_is_api_failure() {
        let body = br#"{"Error Message":"Invalid API KEY."}"#;
        match parse_records(body) {
            Err(FinanceServiceError::Api(msg)) => assert_eq!(msg, "Invalid API KEY."),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn empty_object_is_api_failure() {
        assert!(matches!(
            parse_records(b"{}"),
            Err(FinanceServiceError::Api(_))
        ));
    }

    #[test]
    fn malformed_body_is_parse_failure() {
        assert!(matches!(
            parse_records(b"<html>oops</html>"),
            Err(FinanceServiceError::Parse(_))
        ));
        assert!(matches!(
            parse_records(br#"[{"date":"2024-01-15"}]"#),
            Err(FinanceServiceError::Parse(_))
        ));
    }
}
