use tracing::{error, info};

use super::{Geocoder, MapSession, MapSurface, RouteProvider, ViewerError};
use crate::models::{GeocodeCandidate, Geometry};

const NOT_FOUND: &str = "Location not found.";
const ROUTE_NOT_FOUND: &str = "Could not find one of the locations.";
const MISSING_INPUT: &str = "Please enter both start and destination.";
const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Search and directions flows. Nothing is retried; every failure ends in
/// one notice on the map.
pub struct Navigator<G, R> {
    geocoder: G,
    router: R,
}

impl<G: Geocoder, R: RouteProvider> Navigator<G, R> {
    pub fn new(geocoder: G, router: R) -> Self {
        Self { geocoder, router }
    }

    /// Resolve `query` and put the marker on the first hit. Blank queries
    /// are ignored.
    pub async fn search<S: MapSurface>(&self, session: &mut MapSession<S>, query: &str) -> Result<(), ViewerError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }
        let result = self.first_hit(query).await;
        match result {
            Ok(hit) => {
                session.show_search_result(&hit);
                Ok(())
            }
            Err(e) => Err(report(session, e, NOT_FOUND)),
        }
    }

    /// Resolve both ends concurrently, fetch the route between them and
    /// draw it. Either lookup failing fails the whole flow.
    pub async fn directions<S: MapSurface>(
        &self,
        session: &mut MapSession<S>,
        start: &str,
        end: &str,
    ) -> Result<(), ViewerError> {
        let (start, end) = (start.trim(), end.trim());
        if start.is_empty() || end.is_empty() {
            session.notify(MISSING_INPUT);
            return Err(ViewerError::MissingInput);
        }

        match self.resolve_route(start, end).await {
            Ok(geometry) => {
                let drawn = session.show_route(geometry).map(|route| route.geometry.positions().len());
                match drawn {
                    Some(positions) => {
                        info!("route drawn with {} positions", positions);
                        Ok(())
                    }
                    None => Err(report(session, ViewerError::EmptyRoute, ROUTE_NOT_FOUND)),
                }
            }
            Err(e) => Err(report(session, e, ROUTE_NOT_FOUND)),
        }
    }

    async fn resolve_route(&self, start: &str, end: &str) -> Result<Geometry, ViewerError> {
        let (from, to) = tokio::try_join!(self.first_hit(start), self.first_hit(end))?;
        let response = self.router.route(from.position(), to.position()).await?;
        response
            .features
            .into_iter()
            .next()
            .map(|feature| feature.geometry)
            .ok_or(ViewerError::EmptyRoute)
    }

    async fn first_hit(&self, query: &str) -> Result<GeocodeCandidate, ViewerError> {
        self.geocoder
            .geocode(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ViewerError::NoGeocodeResult(query.to_string()))
    }
}

fn report<S: MapSurface>(session: &mut MapSession<S>, e: ViewerError, not_found: &str) -> ViewerError {
    match e {
        ViewerError::NoGeocodeResult(_) => session.notify(not_found),
        _ => {
            error!("viewer request failed: {}", e);
            session.notify(GENERIC_FAILURE);
        }
    }
    e
}
