use thiserror::Error;

pub mod board;
pub mod file;

pub use board::{BoardSource, BoardState, Snapshot};
pub use file::{load_initial_board, CardCache, InitialBoard};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache json error: {0}")]
    Json(#[from] serde_json::Error),
}
