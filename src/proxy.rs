use axum::extract::{Path, Query, RawQuery, State};
use axum::http::header::HOST;
use axum::http::{HeaderMap, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use url::form_urlencoded;

use crate::error::{ProxyPath, RelayError};
use crate::models::MapStyle;
use crate::rewrite::{rewrite_style, upstream_asset_url};
use crate::utils::{fetch, pass_through};
use crate::AppState;

// --- MapTiler ---

pub async fn maptiler_style(
    State(state): State<Arc<AppState>>,
    Path(style): Path<String>,
    headers: HeaderMap,
) -> Result<Response, RelayError> {
    let style: MapStyle = style.parse().map_err(RelayError::UnknownStyle)?;
    let config = &state.config;
    let url = format!(
        "{}/maps/{}/style.json?key={}",
        config.maptiler_url.trim_end_matches('/'),
        style,
        config.keys.maptiler
    );

    let resp = fetch(&state.http_client, &url, ProxyPath::Style).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(RelayError::UpstreamHttp { path: ProxyPath::Style, status });
    }
    let body = resp.bytes().await.map_err(|e| RelayError::network(ProxyPath::Style, e))?;
    let mut document: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|source| RelayError::InvalidStyle { path: ProxyPath::Style, source })?;

    let host = headers.get(HOST).and_then(|v| v.to_str().ok());
    let relay_prefix = config.asset_prefix(host);
    rewrite_style(&mut document, &vendor_prefix(&config.maptiler_url), &relay_prefix);
    debug!("rewrote {} style towards {}", style, relay_prefix);

    Ok(Json(document).into_response())
}

pub const ASSET_ROUTE_PREFIX: &str = "/api/maptiler/asset/";

/// The asset path is taken from the raw URI so percent-encoded font stacks
/// and the like reach the vendor exactly as the map library sent them.
pub async fn maptiler_asset(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    RawQuery(query): RawQuery,
) -> Result<Response, RelayError> {
    let config = &state.config;
    let path = uri.path().strip_prefix(ASSET_ROUTE_PREFIX).unwrap_or_default();
    let url = upstream_asset_url(&config.maptiler_url, path, query.as_deref(), &config.keys.maptiler);
    let resp = fetch(&state.http_client, &url, ProxyPath::Asset).await?;
    Ok(pass_through(resp))
}

/// Vendor host prefix as it appears inside style documents, always with a
/// trailing slash so only whole path segments get replaced.
fn vendor_prefix(base: &str) -> String {
    format!("{}/", base.trim_end_matches('/'))
}

// --- Thunderforest ---

#[derive(Deserialize, Default)]
pub struct TileParams {
    #[serde(default)]
    pub retina: Option<String>,
}

impl TileParams {
    // only the literal "true" selects high density tiles
    fn high_density(&self) -> bool {
        self.retina.as_deref() == Some("true")
    }
}

pub async fn thunderforest_tile(
    State(state): State<Arc<AppState>>,
    Path((kind, z, x, y_png)): Path<(String, String, String, String)>,
    Query(params): Query<TileParams>,
) -> Result<Response, RelayError> {
    let tile_path = format!("{}/{}/{}/{}", kind, z, x, y_png);
    let invalid = || RelayError::InvalidTile(tile_path.clone());
    if !is_tile_kind(&kind) {
        return Err(invalid());
    }
    let z: u32 = z.parse().map_err(|_| invalid())?;
    let x: u32 = x.parse().map_err(|_| invalid())?;
    let y: u32 = y_png
        .strip_suffix(".png")
        .and_then(|y| y.parse().ok())
        .ok_or_else(invalid)?;

    let config = &state.config;
    let url = thunderforest_url(
        &config.thunderforest_url,
        &kind,
        (z, x, y),
        params.high_density(),
        &config.keys.thunderforest,
    );
    let resp = fetch(&state.http_client, &url, ProxyPath::Tile).await?;
    Ok(pass_through(resp))
}

/// A tile type is a single path segment like `cycle` or `transport-dark`.
fn is_tile_kind(kind: &str) -> bool {
    !kind.is_empty() && kind.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

pub fn thunderforest_url(base: &str, kind: &str, (z, x, y): (u32, u32, u32), high_density: bool, key: &str) -> String {
    format!(
        "{}/{}/{}/{}/{}{}.png?apikey={}",
        base.trim_end_matches('/'),
        kind,
        z,
        x,
        y,
        if high_density { "@2x" } else { "" },
        key
    )
}

// --- OpenRouteService ---

#[derive(Deserialize, Default)]
pub struct RouteParams {
    pub start: Option<String>,
    pub end: Option<String>,
}

pub async fn route(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RouteParams>,
) -> Result<Response, RelayError> {
    let start = params.start.filter(|s| !s.is_empty()).ok_or(RelayError::MissingParameter("start"))?;
    let end = params.end.filter(|s| !s.is_empty()).ok_or(RelayError::MissingParameter("end"))?;

    let config = &state.config;
    let url = route_url(&config.openrouteservice_url, &config.keys.openrouteservice, &start, &end);

    let resp = fetch(&state.http_client, &url, ProxyPath::Route).await?;
    Ok(pass_through(resp))
}

/// Coordinates keep their literal `lon,lat` form; everything else that
/// could break out of a query value is still escaped.
pub fn route_url(base: &str, key: &str, start: &str, end: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("api_key", key)
        .append_pair("start", start)
        .append_pair("end", end)
        .finish()
        .replace("%2C", ",");
    format!("{}?{}", base, query)
}
