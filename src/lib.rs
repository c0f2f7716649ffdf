use axum::{
    http::{Method, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub mod config;
pub mod error;
pub mod models;
pub mod proxy;
pub mod rewrite;
pub mod utils;
pub mod viewer;

use config::Config;

pub const USER_AGENT: &str = concat!("map-relay/", env!("CARGO_PKG_VERSION"));

pub struct AppState {
    pub config: Config,
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { config, http_client })
    }
}

async fn log_request_response(req: Request<axum::body::Body>, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let method = req.method().to_string();
    info!("incoming request: {} {}", method, path);
    let response = next.run(req).await;
    info!("request result: {} for {} {}", response.status(), method, path);
    response
}

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS]);

    Router::new()
        .route("/api/maptiler/asset/{*path}", get(proxy::maptiler_asset))
        .route("/api/maptiler/{style}", get(proxy::maptiler_style))
        .route("/api/thunderforest/{kind}/{z}/{x}/{y}", get(proxy::thunderforest_tile))
        .route("/api/route", get(proxy::route))
        .layer(middleware::from_fn(log_request_response))
        .layer(cors)
        .with_state(state)
}
