use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde_json::Value;

use earnings_board::models::{CardSequence, DisplayCard, RawEarningsRecord, RefreshResponse};
use earnings_board::service::automation::earnings::RefreshPipeline;
use earnings_board::service::caching::{BoardSource, BoardState, CardCache};
use earnings_board::service::finance::{EarningsSource, FinanceServiceError};
use earnings_board::service::server::{create_app, AppState};

/// Source that always reports one company on the first business day of the window.
struct OneCompany;

#[async_trait]
impl EarningsSource for OneCompany {
    async fn fetch_range(
        &self,
        from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<RawEarningsRecord>, FinanceServiceError> {
        let mut date = from;
        while earnings_board::service::automation::earnings::is_weekend(date) {
            date = date.succ_opt().unwrap();
        }
        Ok(vec![RawEarningsRecord {
            symbol: "AAPL".into(),
            name: Some("Apple Inc.".into()),
            report_date: format!("{} 16:00", date.format("%Y-%m-%d")),
            estimated_eps: Some(1.5),
        }])
    }
}

/// Same company as [`OneCompany`], answered after a delay.
struct SlowCompany(Duration);

#[async_trait]
impl EarningsSource for SlowCompany {
    async fn fetch_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RawEarningsRecord>, FinanceServiceError> {
        tokio::time::sleep(self.0).await;
        OneCompany.fetch_range(from, to).await
    }
}

async fn spawn_server(initial: CardSequence) -> (String, tempfile::TempDir) {
    spawn_server_with(Arc::new(OneCompany), initial).await
}

async fn spawn_server_with(
    source: Arc<dyn EarningsSource>,
    initial: CardSequence,
) -> (String, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Arc::new(RefreshPipeline::new(
        source,
        CardCache::new(dir.path().join("cache.json")),
        Arc::new(BoardState::new(initial, BoardSource::Cache)),
        Tz::UTC,
    ));
    let app = create_app(AppState::new(pipeline));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), dir)
}

#[tokio::test]
async fn root_reports_liveness() {
    let (base, _dir) = spawn_server(Vec::new()).await;
    let resp = reqwest::get(format!("{base}/")).await.unwrap();
    assert!(resp.status().is_success());
    assert!(!resp.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn earnings_endpoint_serves_published_board() {
    let initial = vec![
        DisplayCard::header("Week of January 15, 2024"),
        DisplayCard::note(),
        DisplayCard::day_label("Monday", 15),
        DisplayCard::company("MSFT", "Microsoft", None),
    ];
    let (base, _dir) = spawn_server(initial.clone()).await;

    let resp = reqwest::get(format!("{base}/api/earnings")).await.unwrap();
    assert!(resp.status().is_success());
    let cards: CardSequence = resp.json().await.unwrap();
    assert_eq!(cards, initial);
}

#[tokio::test]
async fn refresh_endpoint_publishes_and_reports_count() {
    let (base, dir) = spawn_server(Vec::new()).await;

    let resp: RefreshResponse = reqwest::get(format!("{base}/api/refresh"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(resp.success);
    assert_eq!(resp.count, 4);

    let raw: Value = reqwest::get(format!("{base}/api/earnings"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let cards = raw.as_array().unwrap();
    assert_eq!(cards.len(), 4);
    assert_eq!(cards[3]["value"], "AAPL");
    assert_eq!(cards[3]["title"], "Apple Inc.");
    assert_eq!(cards[3]["subtitle"], "Est. EPS: $1.5");

    assert!(dir.path().join("cache.json").exists());

    let health: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["source"], "live");
    assert_eq!(health["count"], 4);
}

#[tokio::test]
async fn refresh_completes_after_client_gives_up() {
    let (base, dir) =
        spawn_server_with(Arc::new(SlowCompany(Duration::from_millis(300))), Vec::new()).await;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    assert!(client.get(format!("{base}/api/refresh")).send().await.is_err());

    tokio::time::sleep(Duration::from_millis(800)).await;

    let health: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["source"], "live");
    assert_eq!(health["count"], 4);
    assert!(dir.path().join("cache.json").exists());
}
