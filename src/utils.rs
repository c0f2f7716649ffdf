use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use reqwest::Client;

use crate::error::{ProxyPath, RelayError};

pub async fn fetch(client: &Client, url: &str, path: ProxyPath) -> Result<reqwest::Response, RelayError> {
    client
        .get(url)
        .send()
        .await
        .map_err(|e| RelayError::network(path, e))
}

/// Relay an upstream response as-is: status, `content-type`,
/// `cache-control` and the body streamed chunk by chunk.
pub fn pass_through(resp: reqwest::Response) -> Response {
    let status = resp.status();
    let mut builder = Response::builder().status(status);
    for name in [CONTENT_TYPE, CACHE_CONTROL] {
        if let Some(value) = resp.headers().get(&name) {
            builder = builder.header(name, value.clone());
        }
    }
    match builder.body(Body::from_stream(resp.bytes_stream())) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("failed to assemble relayed response: {}", e);
            axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
