use serde_json::json;
use tracing::debug;

use super::{Basemap, MapSurface, MarkerId};
use crate::models::{GeocodeCandidate, Geometry, LngLat, LngLatBounds};

pub const ROUTE_ID: &str = "route";
pub const ROUTE_COLOR: &str = "#4285F4";
pub const ROUTE_WIDTH: u32 = 4;
pub const ROUTE_PADDING: u32 = 50;
pub const SEARCH_ZOOM: f64 = 13.0;
/// Camera position the map opens on, over north-western Poland.
pub const INITIAL_CENTER: LngLat = LngLat { lng: 15.4266, lat: 53.5721 };
pub const INITIAL_ZOOM: f64 = 4.5;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchMarker {
    pub id: MarkerId,
    pub position: LngLat,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteOverlay {
    pub geometry: Geometry,
    pub bounds: LngLatBounds,
}

/// The single map instance with its basemap and at most one search marker
/// and one route overlay.
pub struct MapSession<S: MapSurface> {
    surface: S,
    relay_url: String,
    pixel_ratio: f64,
    basemap: Basemap,
    search_marker: Option<SearchMarker>,
    route: Option<RouteOverlay>,
}

impl<S: MapSurface> MapSession<S> {
    /// Attach to `surface`, load the default basemap and place the camera on
    /// the initial view.
    pub fn new(surface: S, relay_url: impl Into<String>, pixel_ratio: f64) -> Self {
        let mut session = Self {
            surface,
            relay_url: relay_url.into(),
            pixel_ratio,
            basemap: Basemap::default(),
            search_marker: None,
            route: None,
        };
        session.set_basemap(Basemap::default());
        session.surface.jump_to(INITIAL_CENTER, INITIAL_ZOOM);
        session
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn basemap(&self) -> &Basemap {
        &self.basemap
    }

    pub fn search_marker(&self) -> Option<&SearchMarker> {
        self.search_marker.as_ref()
    }

    pub fn route(&self) -> Option<&RouteOverlay> {
        self.route.as_ref()
    }

    /// Full style reload. Runtime route layers go away with the old style,
    /// markers live outside the style and stay.
    pub fn set_basemap(&mut self, basemap: Basemap) {
        let style = basemap.style(&self.relay_url, self.pixel_ratio);
        self.surface.set_style(&style);
        debug!("basemap switched to {:?}", basemap);
        self.basemap = basemap;
        self.route = None;
    }

    /// Fly to a geocoder hit and replace the search marker with one for it.
    pub fn show_search_result(&mut self, hit: &GeocodeCandidate) {
        let position = hit.position();
        self.surface.fly_to(position, SEARCH_ZOOM);

        if let Some(old) = self.search_marker.take() {
            self.surface.remove_marker(old.id);
        }
        let id = self.surface.add_marker(position, &hit.display_name);
        self.surface.open_popup(id);
        self.search_marker = Some(SearchMarker {
            id,
            position,
            label: hit.display_name.clone(),
        });
    }

    /// Replace the drawn route and fit the camera to it.
    pub fn show_route(&mut self, geometry: Geometry) -> Option<&RouteOverlay> {
        let bounds = geometry.bounds()?;

        if self.route.take().is_some() {
            self.surface.remove_layer(ROUTE_ID);
            self.surface.remove_source(ROUTE_ID);
        }
        self.surface
            .add_source(ROUTE_ID, json!({ "type": "geojson", "data": geometry.to_value() }));
        self.surface.add_layer(json!({
            "id": ROUTE_ID,
            "type": "line",
            "source": ROUTE_ID,
            "paint": { "line-color": ROUTE_COLOR, "line-width": ROUTE_WIDTH }
        }));
        self.surface.fit_bounds(bounds, ROUTE_PADDING);

        self.route = Some(RouteOverlay { geometry, bounds });
        self.route.as_ref()
    }

    pub fn notify(&mut self, message: &str) {
        self.surface.alert(message);
    }
}
