use reqwest::Client;
use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::debug;

use super::ViewerError;
use crate::models::{GeocodeCandidate, LngLat, RouteResponse};
use crate::USER_AGENT;

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Free-text location lookup.
pub trait Geocoder {
    fn geocode(&self, query: &str) -> impl Future<Output = Result<Vec<GeocodeCandidate>, ViewerError>>;
}

/// Route between two points, as served by the relay's route endpoint.
pub trait RouteProvider {
    fn route(&self, start: LngLat, end: LngLat) -> impl Future<Output = Result<RouteResponse, ViewerError>>;
}

async fn get_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ViewerError> {
    let resp = request.send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ViewerError::Status(status));
    }
    let body = resp.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

fn client() -> Result<Client, ViewerError> {
    Ok(Client::builder().user_agent(USER_AGENT).build()?)
}

pub struct NominatimGeocoder {
    client: Client,
    url: String,
}

impl NominatimGeocoder {
    pub fn new() -> Result<Self, ViewerError> {
        Self::with_url(NOMINATIM_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Result<Self, ViewerError> {
        Ok(Self { client: client()?, url: url.into() })
    }
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ViewerError> {
        debug!("geocoding {:?}", query);
        let request = self.client.get(&self.url).query(&[("format", "json"), ("q", query)]);
        get_json(request).await
    }
}

/// Fetches routes through the relay so the routing key stays server-side.
pub struct RelayRouter {
    client: Client,
    relay_url: String,
}

impl RelayRouter {
    pub fn new(relay_url: impl Into<String>) -> Result<Self, ViewerError> {
        Ok(Self { client: client()?, relay_url: relay_url.into() })
    }
}

impl RouteProvider for RelayRouter {
    async fn route(&self, start: LngLat, end: LngLat) -> Result<RouteResponse, ViewerError> {
        let url = format!("{}/api/route", self.relay_url.trim_end_matches('/'));
        let request = self
            .client
            .get(url)
            .query(&[("start", start.to_query()), ("end", end.to_query())]);
        get_json(request).await
    }
}
