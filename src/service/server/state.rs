use std::sync::Arc;
use std::time::Instant;

use crate::service::automation::earnings::RefreshPipeline;
use crate::service::caching::BoardState;

/// Shared application state, passed to all route handlers via `axum::extract::State`.
pub struct AppState {
    pub pipeline: Arc<RefreshPipeline>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(pipeline: Arc<RefreshPipeline>) -> Arc<Self> {
        Arc::new(Self {
            pipeline,
            start_time: Instant::now(),
        })
    }

    pub fn board(&self) -> &Arc<BoardState> {
        self.pipeline.board()
    }
}
