use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::config::AppConfig;
use crate::models::RawEarningsRecord;

pub mod earnings;

/// Failure to obtain earnings records from the calendar API.
#[derive(Debug, thiserror::Error)]
pub enum FinanceServiceError {
    #[error("earnings request failed: {0}")]
    Http(String),
    #[error("earnings request timed out after {0:?}")]
    Timeout(StdDuration),
    #[error("earnings api status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("earnings parse failed: {0}")]
    Parse(String),
    #[error("earnings api returned an error: {0}")]
    Api(String),
}

/// Anything that can produce raw earnings records for an inclusive date range.
#[async_trait]
pub trait EarningsSource: Send + Sync {
    async fn fetch_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RawEarningsRecord>, FinanceServiceError>;
}

/// HTTP client for the earnings calendar endpoint.
pub struct EarningsService {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    timeout: StdDuration,
}

impl EarningsService {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: StdDuration,
    ) -> Result<Self, FinanceServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("earnings-board/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FinanceServiceError::Http(format!("failed to build client: {e}")))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            timeout,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, FinanceServiceError> {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.fetch_timeout,
        )
    }

    /// Fetch earnings events for a date range (external API).
    pub async fn get_earnings_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RawEarningsRecord>, FinanceServiceError> {
        earnings::fetch_earnings_range(
            &self.client,
            &self.api_url,
            &self.api_key,
            from,
            to,
            self.timeout,
        )
        .await
    }
}

#[async_trait]
impl EarningsSource for EarningsService {
    async fn fetch_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RawEarningsRecord>, FinanceServiceError> {
        self.get_earnings_range(from, to).await
    }
}

pub use FinanceServiceError as Error;
