use std::sync::Arc;

use axum::response::Html;
use axum::{extract::State, routing::get, Json, Router};

use crate::charts::{self, Dashboard};
use crate::constants::REGIONS;
use crate::feed::{FeedStatus, FeedStore};
use crate::report::{self, RegionReport, Totals};

#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<FeedStore>,
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let dashboard = charts::dashboard(state.feed.updates(), &REGIONS);
    Html(charts::render_page(&dashboard))
}

async fn totals_endpoint(State(state): State<AppState>) -> Json<Totals> {
    Json(report::totals(state.feed.updates()))
}

async fn regions_endpoint(State(state): State<AppState>) -> Json<Vec<RegionReport>> {
    Json(report::region_report(state.feed.updates(), &REGIONS))
}

async fn charts_endpoint(State(state): State<AppState>) -> Json<Dashboard> {
    Json(charts::dashboard(state.feed.updates(), &REGIONS))
}

async fn status_endpoint(State(state): State<AppState>) -> Json<FeedStatus> {
    Json(state.feed.status())
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/totals", get(totals_endpoint))
        .route("/regions", get(regions_endpoint))
        .route("/charts", get(charts_endpoint))
        .route("/status", get(status_endpoint))
        .with_state(app_state)
}
