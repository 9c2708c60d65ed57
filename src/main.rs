use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use covid_dashboard::charts;
use covid_dashboard::config::{Args, Command};
use covid_dashboard::constants::REGIONS;
use covid_dashboard::feed::{self, FeedStore};
use covid_dashboard::logging;
use covid_dashboard::server::{self, AppState};

async fn serve(feed_url: String, bind: &str) -> Result<()> {
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address `{bind}`"))?;

    let app_state = AppState { feed: Arc::new(FeedStore::new()) };

    // one load per process; routes serve zeros until it lands
    feed::spawn_load(feed::new_client(), feed_url, app_state.feed.clone());

    let app = server::router(app_state);

    info!("listening on {addr}");
    axum::Server::try_bind(&addr)
        .with_context(|| format!("unable to bind {addr}"))?
        .serve(app.into_make_service())
        .await
        .context("server error")
}

async fn report(feed_url: &str, json: bool) -> Result<()> {
    let loaded = feed::load_feed(&feed::new_client(), feed_url).await;
    let dashboard = charts::dashboard(&loaded.updates, &REGIONS);

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    println!("Total new cases:  {}", dashboard.totals.new_cases);
    println!("Total recoveries: {}", dashboard.totals.recoveries);
    println!("Total deaths:     {}", dashboard.totals.deaths);
    println!();
    println!("{:<16} {:>10} {:>10} {:>10}", "State", "New Cases", "Recoveries", "Deaths");
    for row in &dashboard.region_table {
        println!("{:<16} {:>10} {:>10} {:>10}", row.region, row.new_cases, row.recoveries, row.deaths);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    let args = Args::parse();

    match args.command() {
        Command::Serve => serve(args.feed_url, &args.bind).await,
        Command::Report { json } => report(&args.feed_url, json).await,
    }
}
