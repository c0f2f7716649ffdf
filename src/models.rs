use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Vendor styles the relay is willing to proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapStyle {
    Streets,
    Hybrid,
    DarkMatter,
    Topo,
}

impl MapStyle {
    pub const ALL: [MapStyle; 4] = [MapStyle::Streets, MapStyle::Hybrid, MapStyle::DarkMatter, MapStyle::Topo];

    pub fn as_str(&self) -> &'static str {
        match self {
            MapStyle::Streets => "streets",
            MapStyle::Hybrid => "hybrid",
            MapStyle::DarkMatter => "darkmatter",
            MapStyle::Topo => "topo",
        }
    }
}

impl fmt::Display for MapStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MapStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// `lon,lat` as expected by the route endpoint.
    pub fn to_query(&self) -> String {
        format!("{},{}", self.lng, self.lat)
    }
}

/// Axis-aligned envelope in lon/lat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LngLatBounds {
    pub sw: LngLat,
    pub ne: LngLat,
}

impl LngLatBounds {
    pub fn from_point(p: LngLat) -> Self {
        Self { sw: p, ne: p }
    }

    pub fn extend(mut self, p: LngLat) -> Self {
        self.sw.lng = self.sw.lng.min(p.lng);
        self.sw.lat = self.sw.lat.min(p.lat);
        self.ne.lng = self.ne.lng.max(p.lng);
        self.ne.lat = self.ne.lat.max(p.lat);
        self
    }
}

/// One candidate from the geocoder. Nominatim sends coordinates as strings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    #[serde(deserialize_with = "number_or_string")]
    pub lon: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub lat: f64,
    pub display_name: String,
}

impl GeocodeCandidate {
    pub fn position(&self) -> LngLat {
        LngLat::new(self.lon, self.lat)
    }
}

fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RouteResponse {
    #[serde(default)]
    pub features: Vec<RouteFeature>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RouteFeature {
    pub geometry: Geometry,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Value,
}

impl Geometry {
    /// Every `[lon, lat, ..]` position in the geometry, whatever its nesting.
    pub fn positions(&self) -> Vec<LngLat> {
        let mut out = Vec::new();
        collect_positions(&self.coordinates, &mut out);
        out
    }

    pub fn bounds(&self) -> Option<LngLatBounds> {
        let mut positions = self.positions().into_iter();
        let first = positions.next()?;
        Some(positions.fold(LngLatBounds::from_point(first), LngLatBounds::extend))
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({ "type": self.kind, "coordinates": self.coordinates })
    }
}

fn collect_positions(value: &Value, out: &mut Vec<LngLat>) {
    let Value::Array(items) = value else { return };
    match (items.first().and_then(Value::as_f64), items.get(1).and_then(Value::as_f64)) {
        (Some(lng), Some(lat)) => out.push(LngLat::new(lng, lat)),
        _ => {
            for item in items {
                collect_positions(item, out);
            }
        }
    }
}
