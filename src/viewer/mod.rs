//! Controller side of the map viewer.
//!
//! The rendering library sits behind [`MapSurface`]; [`MapSession`] owns the
//! one map, its basemap, search marker and route overlay, and [`Navigator`]
//! runs the search and directions flows against a [`Geocoder`] and a
//! [`RouteProvider`]. All style and route traffic goes through the relay, so
//! nothing here ever sees a vendor key.

use serde_json::Value;

use crate::models::{LngLat, LngLatBounds};

mod basemap;
mod navigator;
mod services;
mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use basemap::{thunderforest_style, Basemap, StyleSpec};
pub use navigator::Navigator;
pub use services::{Geocoder, NominatimGeocoder, RelayRouter, RouteProvider, NOMINATIM_URL};
pub use session::{MapSession, RouteOverlay, SearchMarker};

/// Handle to a marker placed on a [`MapSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(pub u64);

/// The operations the viewer needs from the map rendering library.
pub trait MapSurface {
    /// Replace the whole style. Sources and layers added at runtime are gone
    /// afterwards.
    fn set_style(&mut self, style: &StyleSpec);
    fn fly_to(&mut self, center: LngLat, zoom: f64);
    /// Move the camera without animating. Surfaces that can't tell the two
    /// apart just fly.
    fn jump_to(&mut self, center: LngLat, zoom: f64) {
        self.fly_to(center, zoom)
    }
    fn fit_bounds(&mut self, bounds: LngLatBounds, padding: u32);

    fn add_marker(&mut self, at: LngLat, label: &str) -> MarkerId;
    fn remove_marker(&mut self, marker: MarkerId);
    fn open_popup(&mut self, marker: MarkerId);

    fn add_source(&mut self, id: &str, source: Value);
    fn remove_source(&mut self, id: &str);
    fn add_layer(&mut self, layer: Value);
    fn remove_layer(&mut self, id: &str);

    /// Blocking, user-facing notice.
    fn alert(&mut self, message: &str);
}

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("no location found for `{0}`")]
    NoGeocodeResult(String),

    #[error("both start and destination are required")]
    MissingInput,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service responded with {0}")]
    Status(reqwest::StatusCode),

    #[error("unexpected response body: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("route response has no usable geometry")]
    EmptyRoute,
}
