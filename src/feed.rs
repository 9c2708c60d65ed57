use std::io::Read;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use hyper::client::HttpConnector;
use hyper::header::CONTENT_ENCODING;
use hyper::{body, Body, Client, Method, Request, Uri};
use hyper_tls::HttpsConnector;
use once_cell::sync::OnceCell;
use serde_derive::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::covid::{FeedResponse, UpdateRecord};
use crate::error::FeedError;

pub type FeedClient = Client<HttpsConnector<HttpConnector>, Body>;

pub fn new_client() -> FeedClient {
    Client::builder().build::<HttpsConnector<HttpConnector>, Body>(HttpsConnector::new())
}

/// Result of the one-shot load. A failed load still produces a `Feed`, with
/// no updates and the failure recorded in `error`.
#[derive(Clone, Debug)]
pub struct Feed {
    pub updates: Vec<UpdateRecord>,
    pub loaded_at: DateTime<Utc>,
    pub error: Option<String>,
}

impl Feed {
    pub fn loaded(updates: Vec<UpdateRecord>) -> Self {
        Feed { updates, loaded_at: Utc::now(), error: None }
    }

    pub fn failed(err: &FeedError) -> Self {
        Feed { updates: Vec::new(), loaded_at: Utc::now(), error: Some(err.to_string()) }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Pending,
    Loaded,
    Failed,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedStatus {
    pub state: LoadState,
    pub updates: usize,
    pub loaded_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

/// Write-once holder for the loaded feed. Reads before the load lands see an
/// empty update list.
#[derive(Debug, Default)]
pub struct FeedStore {
    cell: OnceCell<Feed>,
}

impl FeedStore {
    pub fn new() -> Self {
        FeedStore { cell: OnceCell::new() }
    }

    pub fn preloaded(feed: Feed) -> Self {
        FeedStore { cell: OnceCell::with_value(feed) }
    }

    /// Returns false, leaving the stored feed untouched, if a feed was already set.
    pub fn set(&self, feed: Feed) -> bool {
        self.cell.set(feed).is_ok()
    }

    pub fn updates(&self) -> &[UpdateRecord] {
        self.cell.get().map(|feed| feed.updates.as_slice()).unwrap_or(&[])
    }

    pub fn status(&self) -> FeedStatus {
        match self.cell.get() {
            None => FeedStatus { state: LoadState::Pending, updates: 0, loaded_at: None, error: None },
            Some(feed) => FeedStatus {
                state: if feed.error.is_some() { LoadState::Failed } else { LoadState::Loaded },
                updates: feed.updates.len(),
                loaded_at: Some(feed.loaded_at),
                error: feed.error.clone(),
            },
        }
    }
}

pub async fn fetch_feed(client: &FeedClient, url: &str) -> Result<Vec<UpdateRecord>, FeedError> {
    let uri: Uri = url
        .parse()
        .map_err(|source| FeedError::InvalidUrl { url: url.to_string(), source })?;

    debug!("URI: {}", uri);

    let request = Request::builder()
        .uri(uri)
        .method(Method::GET)
        .body(Body::empty())?;

    let resp = client.request(request).await?;

    if !resp.status().is_success() {
        return Err(FeedError::Status(resp.status()));
    }

    let gzipped = resp
        .headers()
        .get(CONTENT_ENCODING)
        .map_or(false, |encoding| encoding.as_bytes().eq_ignore_ascii_case(b"gzip"));

    let bytes = body::to_bytes(resp.into_body()).await?;

    let feed: FeedResponse = if gzipped {
        let mut gz = GzDecoder::new(&*bytes);
        let mut decoded_bytes: Vec<u8> = vec!();
        gz.read_to_end(&mut decoded_bytes)?;
        serde_json::from_slice(&decoded_bytes)?
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok(feed.data)
}

/// Fetches the feed, folding every failure into an empty `Feed`.
pub async fn load_feed(client: &FeedClient, url: &str) -> Feed {
    match fetch_feed(client, url).await {
        Ok(updates) => {
            info!(url, updates = updates.len(), "feed loaded");
            Feed::loaded(updates)
        }
        Err(e) => {
            error!(url, "feed load failed, continuing with no updates: {e}");
            Feed::failed(&e)
        }
    }
}

pub fn spawn_load(client: FeedClient, url: String, store: Arc<FeedStore>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let feed = load_feed(&client, &url).await;
        if !store.set(feed) {
            warn!(url = %url, "feed already loaded, discarding second load");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_reads_empty_until_set() {
        let store = FeedStore::new();
        assert!(store.updates().is_empty());
        assert_eq!(store.status().state, LoadState::Pending);
        assert_eq!(store.status().loaded_at, None);
    }

    #[test]
    fn store_is_write_once() {
        let store = FeedStore::new();
        assert!(store.set(Feed::loaded(vec![UpdateRecord::new("Delhi: 1 deaths")])));
        assert!(!store.set(Feed::loaded(Vec::new())));

        assert_eq!(store.updates(), &[UpdateRecord::new("Delhi: 1 deaths")]);
        let status = store.status();
        assert_eq!(status.state, LoadState::Loaded);
        assert_eq!(status.updates, 1);
        assert!(status.loaded_at.is_some());
    }

    #[test]
    fn failed_feed_is_empty_and_reported() {
        let err = FeedError::Status(hyper::StatusCode::BAD_GATEWAY);
        let store = FeedStore::preloaded(Feed::failed(&err));

        assert!(store.updates().is_empty());
        let status = store.status();
        assert_eq!(status.state, LoadState::Failed);
        assert_eq!(status.updates, 0);
        assert_eq!(status.error.as_deref(), Some("feed request returned 502 Bad Gateway"));
    }

    #[test]
    fn feed_document_shape() {
        let doc = r#"{"data":[{"update":"Bihar: 3 new cases","id":7},{"update":"nothing"}]}"#;
        let parsed: FeedResponse = serde_json::from_str(doc).unwrap();
        assert_eq!(parsed.data, vec![UpdateRecord::new("Bihar: 3 new cases"), UpdateRecord::new("nothing")]);

        assert!(serde_json::from_str::<FeedResponse>(r#"{"items":[]}"#).is_err());
        assert!(serde_json::from_str::<FeedResponse>(r#"{"data":[{"text":"x"}]}"#).is_err());
    }

    #[tokio::test]
    async fn invalid_url_degrades_to_empty_feed() {
        let feed = load_feed(&new_client(), "not a url").await;
        assert!(feed.updates.is_empty());
        assert!(feed.error.unwrap().starts_with("invalid feed url `not a url`"));
    }
}
