use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tokio::fs;
use tracing::{info, warn};

use crate::models::CardSequence;
use crate::service::automation::earnings::fallback;
use crate::service::caching::{BoardSource, CacheError};

/// Last successful board persisted as a single JSON document.
#[derive(Debug, Clone)]
pub struct CardCache {
    path: PathBuf,
}

impl CardCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached board. A missing file is `Ok(None)`.
    pub async fn load(&self) -> Result<Option<CardSequence>, CacheError> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("No cached board at {}", self.path.display());
                return Ok(None);
            }
            Err(err) => return Err(CacheError::Io(err)),
        };

        let cards: CardSequence = serde_json::from_slice(&raw)?;
        info!(
            "Loaded {} cached cards from {}",
            cards.len(),
            self.path.display()
        );
        Ok(Some(cards))
    }

    /// Write the board, replacing the previous file only once fully written.
    pub async fn save(&self, cards: &CardSequence) -> Result<(), CacheError> {
        let json = serde_json::to_vec_pretty(cards)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, &json).await?;
        if let Err(err) = fs::rename(&tmp, &self.path).await {
            warn!("Failed to move {} into place: {}", tmp.display(), err);
            let _ = fs::remove_file(&tmp).await;
            return Err(CacheError::Io(err));
        }

        info!("Saved {} cards to {}", cards.len(), self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "earnings_cache.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Board to publish before the first refresh has run.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialBoard {
    pub cards: CardSequence,
    pub source: BoardSource,
    pub needs_refresh: bool,
}

/// Serve the cached board when it is readable, otherwise the fallback
/// board together with a request for one background refresh.
pub async fn load_initial_board(cache: &CardCache, today: NaiveDate) -> InitialBoard {
    match cache.load().await {
        Ok(Some(cards)) => InitialBoard {
            cards,
            source: BoardSource::Cache,
            needs_refresh: false,
        },
        Ok(None) => InitialBoard {
            cards: fallback(today),
            source: BoardSource::Fallback,
            needs_refresh: true,
        },
        Err(err) => {
            warn!(
                "Cached board at {} is unreadable, starting from fallback: {err}",
                cache.path().display()
            );
            InitialBoard {
                cards: fallback(today),
                source: BoardSource::Fallback,
                needs_refresh: true,
            }
        }
    }
}
