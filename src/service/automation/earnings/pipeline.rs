use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::models::{CardSequence, RefreshResponse};
use crate::service::automation::earnings::calendar::{compute_fetch_window, FetchWindow};
use crate::service::automation::earnings::fallback::fallback;
use crate::service::automation::earnings::grouping::group_by_date;
use crate::service::automation::earnings::transform::{transform, TransformError};
use crate::service::caching::{BoardSource, BoardState, CardCache};
use crate::service::finance::{EarningsSource, FinanceServiceError};

/// Why a refresh could not produce live data.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("fetch failed for {window}: {source}")]
    Fetch {
        window: FetchWindow,
        #[source]
        source: FinanceServiceError,
    },
    #[error("transform failed for {window}: {source}")]
    Transform {
        window: FetchWindow,
        #[source]
        source: TransformError,
    },
}

/// Result of one refresh trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Live data was fetched, cached and published.
    Published { count: usize },
    /// Live data was unavailable; the fallback board was published.
    Fallback { count: usize, reason: String },
    /// Another refresh was already running; nothing changed.
    Coalesced { count: usize },
}

impl RefreshOutcome {
    pub fn count(&self) -> usize {
        match self {
            Self::Published { count } | Self::Fallback { count, .. } | Self::Coalesced { count } => {
                *count
            }
        }
    }

    pub fn into_response(self) -> RefreshResponse {
        match self {
            Self::Published { count } => RefreshResponse {
                success: true,
                message: "Earnings data refreshed".to_string(),
                count,
            },
            Self::Fallback { count, reason } => RefreshResponse {
                success: false,
                message: format!("Refresh failed, serving fallback data: {reason}"),
                count,
            },
            Self::Coalesced { count } => RefreshResponse {
                success: true,
                message: "Refresh already in progress; serving current data".to_string(),
                count,
            },
        }
    }
}

/// Fetch → group → transform → persist → publish, one invocation at a time.
pub struct RefreshPipeline {
    source: Arc<dyn EarningsSource>,
    cache: CardCache,
    board: Arc<BoardState>,
    timezone: Tz,
    in_flight: Mutex<()>,
}

impl RefreshPipeline {
    pub fn new(
        source: Arc<dyn EarningsSource>,
        cache: CardCache,
        board: Arc<BoardState>,
        timezone: Tz,
    ) -> Self {
        Self {
            source,
            cache,
            board,
            timezone,
            in_flight: Mutex::new(()),
        }
    }

    pub fn board(&self) -> &Arc<BoardState> {
        &self.board
    }

    pub fn cache(&self) -> &CardCache {
        &self.cache
    }

    /// Calendar date of `now` in the configured timezone.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.timezone).date_naive()
    }

    /// Run one refresh for the current instant.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.refresh_at(Utc::now()).await
    }

    /// Run one refresh as if the current instant were `now`.
    ///
    /// A trigger arriving while another refresh runs is coalesced.
    pub async fn refresh_at(&self, now: DateTime<Utc>) -> RefreshOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            info!("Refresh already in progress; coalescing trigger");
            return RefreshOutcome::Coalesced {
                count: self.board.card_count().await,
            };
        };

        let today = self.today(now);
        match self.build(today).await {
            Ok(cards) => {
                let count = cards.len();
                if let Err(e) = self.cache.save(&cards).await {
                    error!(
                        "Failed to persist board to {}: {}",
                        self.cache.path().display(),
                        e
                    );
                }
                self.board.publish(cards, BoardSource::Live).await;
                info!("Published {} live cards", count);
                RefreshOutcome::Published { count }
            }
            Err(e) => {
                warn!("Earnings refresh failed, publishing fallback board: {}", e);
                let cards = fallback(today);
                let count = cards.len();
                self.board.publish(cards, BoardSource::Fallback).await;
                RefreshOutcome::Fallback {
                    count,
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn build(&self, today: NaiveDate) -> Result<CardSequence, PipelineError> {
        let window = compute_fetch_window(today);

        let records = self
            .source
            .fetch_range(window.from, window.to)
            .await
            .map_err(|source| PipelineError::Fetch { window, source })?;

        let groups =
            group_by_date(&records).map_err(|source| PipelineError::Transform { window, source })?;

        transform(&groups, today).map_err(|source| PipelineError::Transform { window, source })
    }
}
