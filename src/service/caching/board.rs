use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::models::CardSequence;

/// Where the currently published board came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardSource {
    Live,
    Cache,
    Fallback,
}

/// Immutable published board plus its provenance.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub cards: Arc<CardSequence>,
    pub source: BoardSource,
    pub updated_at: DateTime<Utc>,
}

/// In-memory slot holding the board served to the dashboard.
///
/// Writers swap in a whole new snapshot; readers clone the `Arc` and never see
/// a half-written board.
#[derive(Debug)]
pub struct BoardState {
    current: RwLock<Snapshot>,
}

impl BoardState {
    pub fn new(cards: CardSequence, source: BoardSource) -> Self {
        Self {
            current: RwLock::new(Snapshot {
                cards: Arc::new(cards),
                source,
                updated_at: Utc::now(),
            }),
        }
    }

    pub async fn publish(&self, cards: CardSequence, source: BoardSource) {
        let next = Snapshot {
            cards: Arc::new(cards),
            source,
            updated_at: Utc::now(),
        };
        *self.current.write().await = next;
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.current.read().await.clone()
    }

    pub async fn cards(&self) -> Arc<CardSequence> {
        Arc::clone(&self.current.read().await.cards)
    }

    pub async fn card_count(&self) -> usize {
        self.current.read().await.cards.len()
    }
}
