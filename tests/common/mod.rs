#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;

use map_relay::config::{ApiKeys, Config};
use map_relay::{app, AppState};

pub const MAPTILER_KEY: &str = "MT-SECRET";
pub const THUNDERFOREST_KEY: &str = "TF-SECRET";
pub const ORS_KEY: &str = "ORS-SECRET";

pub const ROUTE_FIXTURE: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":{"type":"LineString","coordinates":[[8.681495,49.41461],[8.686507,49.41943],[8.687872,49.420318]]},"properties":{"summary":{"distance":1369.4,"duration":284.6}}}],"bbox":[8.681495,49.41461,8.687872,49.420318]}"#;
pub const ROUTE_ERROR_FIXTURE: &str = r#"{"error":{"code":2010,"message":"Could not find routable point within a radius of 350.0 meters of specified coordinate 0: 0.0000000 0.0000000."}}"#;

pub const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

pub async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    (listener, base)
}

pub fn spawn(listener: TcpListener, router: Router) {
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
}

/// Base URL of a port nothing listens on.
pub async fn dead_base() -> String {
    let (listener, base) = bind().await;
    drop(listener);
    base
}

// --- MapTiler stub ---

async fn style_json(
    State(base): State<Arc<String>>,
    Path(style): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if params.get("key").map(String::as_str) != Some(MAPTILER_KEY) {
        return (StatusCode::FORBIDDEN, r#"{"message":"Invalid key"}"#).into_response();
    }
    let body = format!(
        r#"{{"version":8,"name":"{style}","sprite":"{base}/fonts/a","glyphs":"{base}/fonts/{{fontstack}}/{{range}}.pbf?key={key}","sources":{{"s":{{"type":"vector","tiles":["{base}/t/{{z}}/{{x}}/{{y}}.pbf?key={key}"]}},"planet":{{"type":"vector","url":"{base}/tiles/v3/tiles.json?key={key}"}}}},"layers":[{{"id":"water","type":"fill","source":"planet","source-layer":"water"}}]}}"#,
        style = style,
        base = base,
        key = MAPTILER_KEY
    );
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn echo_asset(uri: Uri) -> Response {
    let mut body = PNG_MAGIC.to_vec();
    body.extend_from_slice(uri.to_string().as_bytes());
    (
        [
            (header::CONTENT_TYPE, "application/x-protobuf"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        body,
    )
        .into_response()
}

pub async fn maptiler_stub() -> String {
    let (listener, base) = bind().await;
    let router = Router::new()
        .route("/maps/{style}/style.json", get(style_json))
        .fallback(echo_asset)
        .with_state(Arc::new(base.clone()));
    spawn(listener, router);
    base
}

// --- Thunderforest stub ---

pub async fn thunderforest_stub() -> String {
    let (listener, base) = bind().await;
    spawn(listener, Router::new().fallback(echo_asset));
    base
}

// --- OpenRouteService stub ---

async fn directions(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("api_key").map(String::as_str) != Some(ORS_KEY) {
        return (StatusCode::FORBIDDEN, r#"{"error":"Access to this API has been disallowed"}"#).into_response();
    }
    let (status, body) = match params.get("start").map(String::as_str) {
        Some("0,0") => (StatusCode::NOT_FOUND, ROUTE_ERROR_FIXTURE),
        _ => (StatusCode::OK, ROUTE_FIXTURE),
    };
    (status, [(header::CONTENT_TYPE, "application/geo+json;charset=UTF-8")], body).into_response()
}

pub async fn ors_stub() -> String {
    let (listener, base) = bind().await;
    spawn(listener, Router::new().route("/v2/directions/driving-car", get(directions)));
    base
}

// --- Relay ---

pub struct Vendors {
    pub maptiler: String,
    pub thunderforest: String,
    pub ors: String,
}

impl Vendors {
    pub async fn start() -> Self {
        Self {
            maptiler: maptiler_stub().await,
            thunderforest: thunderforest_stub().await,
            ors: ors_stub().await,
        }
    }

    pub fn config(&self) -> Config {
        Config {
            public_url: Some("http://relay.test".into()),
            maptiler_url: format!("{}/", self.maptiler),
            thunderforest_url: format!("{}/", self.thunderforest),
            openrouteservice_url: format!("{}/v2/directions/driving-car", self.ors),
            keys: ApiKeys {
                maptiler: MAPTILER_KEY.into(),
                thunderforest: THUNDERFOREST_KEY.into(),
                openrouteservice: ORS_KEY.into(),
            },
            ..Config::default()
        }
    }
}

pub async fn relay(config: Config) -> String {
    let (listener, base) = bind().await;
    let state = Arc::new(AppState::new(config).unwrap());
    spawn(listener, app(state));
    base
}
