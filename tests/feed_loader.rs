use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::{routing::get, Router};
use flate2::write::GzEncoder;
use flate2::Compression;

use covid_dashboard::constants::REGIONS;
use covid_dashboard::error::FeedError;
use covid_dashboard::feed::{self, FeedStore, LoadState};
use covid_dashboard::{region_report, totals, Totals, UpdateRecord};

const FEED: &str = r#"{"data":[
    {"update":"Gujarat reported 10 new cases, 5 recoveries, 2 deaths"},
    {"update":"Delhi: 20 new cases and 1 deaths"},
    {"update":"No updates available"}
]}"#;

fn gzip(body: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

fn feed_app() -> Router {
    Router::new()
        .route("/feed", get(|| async { ([(header::CONTENT_TYPE, "application/json")], FEED) }))
        .route(
            "/feed.gz",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "application/json"), (header::CONTENT_ENCODING, "gzip")],
                    gzip(FEED),
                )
            }),
        )
        .route("/malformed", get(|| async { "{\"data\": [" }))
        .route("/missing-field", get(|| async { r#"{"updates":[{"update":"3 deaths"}]}"# }))
        .route("/broken-gzip", get(|| async { ([(header::CONTENT_ENCODING, "gzip")], "not gzip at all") }))
        .route("/error", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }))
}

async fn spawn_feed_server() -> SocketAddr {
    let server = axum::Server::bind(&"127.0.0.1:0".parse().unwrap()).serve(feed_app().into_make_service());
    let addr = server.local_addr();
    tokio::spawn(server);
    addr
}

#[tokio::test]
async fn fetches_plain_json_feed() {
    let addr = spawn_feed_server().await;
    let updates = feed::fetch_feed(&feed::new_client(), &format!("http://{addr}/feed")).await.unwrap();

    assert_eq!(updates.len(), 3);
    assert_eq!(updates[2], UpdateRecord::new("No updates available"));
    assert_eq!(totals(&updates), Totals { new_cases: 30, recoveries: 5, deaths: 3 });
}

#[tokio::test]
async fn inflates_gzip_feed() {
    let addr = spawn_feed_server().await;
    let updates = feed::fetch_feed(&feed::new_client(), &format!("http://{addr}/feed.gz")).await.unwrap();
    assert_eq!(updates.len(), 3);
}

#[tokio::test]
async fn classifies_failures() {
    let addr = spawn_feed_server().await;
    let client = feed::new_client();

    let err = feed::fetch_feed(&client, &format!("http://{addr}/malformed")).await.unwrap_err();
    assert!(matches!(err, FeedError::Json(_)));

    let err = feed::fetch_feed(&client, &format!("http://{addr}/missing-field")).await.unwrap_err();
    assert!(matches!(err, FeedError::Json(_)));

    let err = feed::fetch_feed(&client, &format!("http://{addr}/broken-gzip")).await.unwrap_err();
    assert!(matches!(err, FeedError::Decode(_)));

    let err = feed::fetch_feed(&client, &format!("http://{addr}/error")).await.unwrap_err();
    assert!(matches!(err, FeedError::Status(StatusCode::INTERNAL_SERVER_ERROR)));
}

#[tokio::test]
async fn unreachable_feed_is_a_request_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = feed::fetch_feed(&feed::new_client(), &format!("http://{addr}/feed")).await.unwrap_err();
    assert!(matches!(err, FeedError::Request(_)));
}

#[tokio::test]
async fn failed_load_degrades_to_zero_reports() {
    let addr = spawn_feed_server().await;
    let loaded = feed::load_feed(&feed::new_client(), &format!("http://{addr}/malformed")).await;

    assert!(loaded.updates.is_empty());
    assert!(loaded.error.is_some());
    assert_eq!(totals(&loaded.updates), Totals::default());

    let reports = region_report(&loaded.updates, &REGIONS);
    assert_eq!(reports.len(), REGIONS.len());
    assert!(reports.iter().all(|r| (r.new_cases, r.recoveries, r.deaths) == (0, 0, 0)));
}

#[tokio::test]
async fn spawned_load_fills_the_store_once() {
    let addr = spawn_feed_server().await;
    let store = Arc::new(FeedStore::new());
    assert_eq!(store.status().state, LoadState::Pending);

    feed::spawn_load(feed::new_client(), format!("http://{addr}/feed"), store.clone())
        .await
        .unwrap();
    assert_eq!(store.status().state, LoadState::Loaded);
    assert_eq!(store.updates().len(), 3);

    // a second load never replaces the first
    feed::spawn_load(feed::new_client(), format!("http://{addr}/error"), store.clone())
        .await
        .unwrap();
    assert_eq!(store.status().state, LoadState::Loaded);
    assert_eq!(store.updates().len(), 3);
}
