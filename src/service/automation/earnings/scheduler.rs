use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::ConfigError;
use crate::service::automation::earnings::pipeline::{RefreshOutcome, RefreshPipeline};

/// How often the scheduler wakes up to check whether a refresh is due.
pub const TICK_SECS: u64 = 60;

/// Once-a-day refresh time in the configured timezone.
///
/// Parsed from `"HH:MM"` or the daily cron form `"<minute> <hour> * * *"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    at: NaiveTime,
}

impl RefreshSchedule {
    pub fn daily(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(|at| Self { at })
    }

    /// Due once per local day, at the first check at or after the set time.
    pub fn is_due(&self, now_local: DateTime<Tz>, last_run: Option<NaiveDate>) -> bool {
        let today = now_local.date_naive();
        if last_run == Some(today) {
            return false;
        }
        now_local.time() >= self.at
    }

    /// Day already covered by startup, which either served the cache or
    /// kicked off its own refresh. Only past today's set time.
    pub fn covered_at_startup(&self, now_local: DateTime<Tz>) -> Option<NaiveDate> {
        (now_local.time() >= self.at).then_some(now_local.date_naive())
    }
}

impl FromStr for RefreshSchedule {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidSchedule(raw.to_string());
        let trimmed = raw.trim();

        if let Some((hour, minute)) = trimmed.split_once(':') {
            let hour = hour.parse().map_err(|_| invalid())?;
            let minute = minute.parse().map_err(|_| invalid())?;
            return Self::daily(hour, minute).ok_or_else(invalid);
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        match fields.as_slice() {
            [minute, hour, "*", "*", "*"] => {
                let minute = minute.parse().map_err(|_| invalid())?;
                let hour = hour.parse().map_err(|_| invalid())?;
                Self::daily(hour, minute).ok_or_else(invalid)
            }
            _ => Err(invalid()),
        }
    }
}

impl std::fmt::Display for RefreshSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.at.format("%H:%M"))
    }
}

/// Spawn the daily refresh trigger.
pub fn spawn_refresh_scheduler(
    pipeline: Arc<RefreshPipeline>,
    schedule: RefreshSchedule,
    timezone: Tz,
) -> JoinHandle<()> {
    info!(
        "Starting earnings refresh scheduler (daily at {} {})",
        schedule, timezone
    );

    tokio::spawn(async move {
        let mut last_run = schedule.covered_at_startup(Utc::now().with_timezone(&timezone));
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(TICK_SECS));
        loop {
            interval.tick().await;
            let now_local = Utc::now().with_timezone(&timezone);
            if !schedule.is_due(now_local, last_run) {
                continue;
            }
            last_run = Some(now_local.date_naive());

            match pipeline.refresh().await {
                RefreshOutcome::Published { count } => {
                    info!("Scheduled refresh published {} cards", count)
                }
                RefreshOutcome::Fallback { reason, .. } => {
                    warn!("Scheduled refresh fell back: {}", reason)
                }
                RefreshOutcome::Coalesced { .. } => {
                    info!("Scheduled refresh skipped; another refresh was running")
                }
            }
        }
    })
}
