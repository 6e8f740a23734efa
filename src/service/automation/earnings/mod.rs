pub mod calendar;
pub mod fallback;
pub mod grouping;
pub mod pipeline;
pub mod scheduler;
pub mod transform;

// Re-export for convenient access
pub use calendar::{compute_fetch_window, is_weekend, FetchWindow};
pub use fallback::fallback;
pub use grouping::group_by_date;
pub use pipeline::{PipelineError, RefreshOutcome, RefreshPipeline};
pub use scheduler::{spawn_refresh_scheduler, RefreshSchedule};
pub use transform::{transform, TransformError};
