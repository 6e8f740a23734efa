use std::sync::Arc;

use anyhow::{Context, Result};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use earnings_board::config::AppConfig;
use earnings_board::service::automation::earnings::{spawn_refresh_scheduler, RefreshPipeline};
use earnings_board::service::caching::{load_initial_board, BoardState, CardCache};
use earnings_board::service::finance::{EarningsService, EarningsSource};
use earnings_board::service::server::{create_app, shutdown_signal, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    info!("Initializing EarningsService...");
    let source: Arc<dyn EarningsSource> = Arc::new(EarningsService::from_config(&config)?);

    let cache = CardCache::new(config.cache_path.clone());
    let today = chrono::Utc::now().with_timezone(&config.timezone).date_naive();

    info!("Loading cached board from {}...", cache.path().display());
    let initial = load_initial_board(&cache, today).await;
    let needs_refresh = initial.needs_refresh;
    let board = Arc::new(BoardState::new(initial.cards, initial.source));

    let pipeline = Arc::new(RefreshPipeline::new(
        source,
        cache,
        board,
        config.timezone,
    ));

    if needs_refresh {
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move {
            let outcome = pipeline.refresh().await;
            info!("Startup refresh finished: {:?}", outcome);
        });
    }

    if config.refresh_enabled {
        spawn_refresh_scheduler(
            Arc::clone(&pipeline),
            config.refresh_schedule,
            config.timezone,
        );
    } else {
        info!("Scheduled refresh disabled via ENABLE_EARNINGS_REFRESH=0");
    }

    let app = create_app(AppState::new(pipeline));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Earnings board listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
