use hyper::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid feed url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        source: hyper::http::uri::InvalidUri,
    },

    #[error("unable to build feed request: {0}")]
    Http(#[from] hyper::http::Error),

    #[error("feed request failed: {0}")]
    Request(#[from] hyper::Error),

    #[error("feed request returned {0}")]
    Status(StatusCode),

    #[error("unable to inflate gzip feed body: {0}")]
    Decode(#[from] std::io::Error),

    #[error("malformed feed document: {0}")]
    Json(#[from] serde_json::Error),
}
