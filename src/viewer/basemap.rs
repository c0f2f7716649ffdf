use serde_json::{json, Value};

use crate::models::MapStyle;

/// What gets handed to [`super::MapSurface::set_style`]: either a URL the
/// map library fetches itself, or a document built locally.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleSpec {
    Url(String),
    Document(Value),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Basemap {
    /// Vector style served (and rewritten) by the relay.
    Vector(MapStyle),
    /// Thunderforest raster tiles of the given kind, e.g. `cycle`.
    Raster(String),
}

impl Default for Basemap {
    fn default() -> Self {
        Basemap::Vector(MapStyle::Streets)
    }
}

impl Basemap {
    /// Maps the names used by the basemap buttons.
    pub fn from_button(name: &str) -> Option<Self> {
        let style = match name {
            "street" => MapStyle::Streets,
            "satellite" => MapStyle::Hybrid,
            "dark" => MapStyle::DarkMatter,
            "terrain" => MapStyle::Topo,
            _ => return None,
        };
        Some(Basemap::Vector(style))
    }

    pub fn style(&self, relay_url: &str, pixel_ratio: f64) -> StyleSpec {
        match self {
            Basemap::Vector(style) => {
                StyleSpec::Url(format!("{}/api/maptiler/{}", relay_url.trim_end_matches('/'), style))
            }
            Basemap::Raster(kind) => StyleSpec::Document(thunderforest_style(relay_url, kind, pixel_ratio)),
        }
    }
}

/// Single raster-layer style for Thunderforest tiles. High density tiles
/// are requested on screens with a pixel ratio above 1.
pub fn thunderforest_style(relay_url: &str, kind: &str, pixel_ratio: f64) -> Value {
    let retina = pixel_ratio > 1.0;
    let tile_size = if retina { 512 } else { 256 };
    let tiles = format!(
        "{}/api/thunderforest/{}/{{z}}/{{x}}/{{y}}.png?retina={}",
        relay_url.trim_end_matches('/'),
        kind,
        retina
    );

    json!({
        "version": 8,
        "sources": {
            "tf": {
                "type": "raster",
                "tiles": [tiles],
                "tileSize": tile_size,
                "attribution": "© OSM, © Thunderforest"
            }
        },
        "layers": [
            {
                "id": "tf-layer",
                "type": "raster",
                "source": "tf",
                "paint": { "raster-fade-duration": 300 }
            }
        ]
    })
}
