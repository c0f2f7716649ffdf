use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::error;

/// Which proxy path a failure came from; used as the log tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyPath {
    Style,
    Asset,
    Tile,
    Route,
}

impl ProxyPath {
    fn failure_message(self) -> &'static str {
        match self {
            ProxyPath::Style => "Failed to fetch style",
            ProxyPath::Asset => "Failed to fetch asset",
            ProxyPath::Tile => "Failed to fetch tile",
            ProxyPath::Route => "Failed to fetch route",
        }
    }
}

impl fmt::Display for ProxyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProxyPath::Style => "maptiler style",
            ProxyPath::Asset => "maptiler asset",
            ProxyPath::Tile => "thunderforest tile",
            ProxyPath::Route => "route",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{path} proxy: upstream responded with {status}")]
    UpstreamHttp { path: ProxyPath, status: StatusCode },

    #[error("{path} proxy: {source}")]
    UpstreamNetwork {
        path: ProxyPath,
        #[source]
        source: reqwest::Error,
    },

    #[error("{path} proxy: upstream sent an invalid document: {source}")]
    InvalidStyle {
        path: ProxyPath,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing required query parameter `{0}`")]
    MissingParameter(&'static str),

    #[error("unknown style `{0}`")]
    UnknownStyle(String),

    #[error("invalid tile path `{0}`")]
    InvalidTile(String),
}

impl RelayError {
    /// The outbound URL carries the vendor key, so it is dropped from the
    /// error before anything can log it.
    pub fn network(path: ProxyPath, source: reqwest::Error) -> Self {
        RelayError::UpstreamNetwork {
            path,
            source: source.without_url(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::UpstreamHttp { status, .. } => *status,
            RelayError::UpstreamNetwork { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::InvalidStyle { .. } => StatusCode::BAD_GATEWAY,
            RelayError::MissingParameter(_) | RelayError::InvalidTile(_) => StatusCode::BAD_REQUEST,
            RelayError::UnknownStyle(_) => StatusCode::NOT_FOUND,
        }
    }

    fn public_message(&self) -> String {
        match self {
            RelayError::UpstreamHttp { path, .. }
            | RelayError::UpstreamNetwork { path, .. }
            | RelayError::InvalidStyle { path, .. } => path.failure_message().to_string(),
            RelayError::MissingParameter(_) => "Missing start or end parameter".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        error!("{}", self);
        (self.status(), Json(json!({ "error": self.public_message() }))).into_response()
    }
}
