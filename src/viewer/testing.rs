use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use super::{MapSurface, MarkerId, StyleSpec};
use crate::models::{LngLat, LngLatBounds};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetStyle(StyleSpec),
    FlyTo(LngLat, f64),
    JumpTo(LngLat, f64),
    FitBounds(LngLatBounds, u32),
    AddMarker(MarkerId, LngLat, String),
    RemoveMarker(MarkerId),
    OpenPopup(MarkerId),
    AddSource(String),
    RemoveSource(String),
    AddLayer(String),
    RemoveLayer(String),
    Alert(String),
}

/// Map surface that records every call and tracks what is currently on it.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<Call>,
    pub sources: BTreeMap<String, Value>,
    pub layers: Vec<String>,
    markers: BTreeSet<MarkerId>,
    next_marker: u64,
}

impl RecordingSurface {
    pub fn live_markers(&self) -> usize {
        self.markers.len()
    }

    pub fn alerts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Alert(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl MapSurface for RecordingSurface {
    fn set_style(&mut self, style: &StyleSpec) {
        self.sources.clear();
        self.layers.clear();
        self.calls.push(Call::SetStyle(style.clone()));
    }

    fn fly_to(&mut self, center: LngLat, zoom: f64) {
        self.calls.push(Call::FlyTo(center, zoom));
    }

    fn jump_to(&mut self, center: LngLat, zoom: f64) {
        self.calls.push(Call::JumpTo(center, zoom));
    }

    fn fit_bounds(&mut self, bounds: LngLatBounds, padding: u32) {
        self.calls.push(Call::FitBounds(bounds, padding));
    }

    fn add_marker(&mut self, at: LngLat, label: &str) -> MarkerId {
        let id = MarkerId(self.next_marker);
        self.next_marker += 1;
        self.markers.insert(id);
        self.calls.push(Call::AddMarker(id, at, label.to_string()));
        id
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        assert!(self.markers.remove(&marker), "removed unknown marker {:?}", marker);
        self.calls.push(Call::RemoveMarker(marker));
    }

    fn open_popup(&mut self, marker: MarkerId) {
        self.calls.push(Call::OpenPopup(marker));
    }

    fn add_source(&mut self, id: &str, source: Value) {
        assert!(!self.sources.contains_key(id), "source {} already exists", id);
        self.sources.insert(id.to_string(), source);
        self.calls.push(Call::AddSource(id.to_string()));
    }

    fn remove_source(&mut self, id: &str) {
        assert!(self.sources.remove(id).is_some(), "no source {}", id);
        self.calls.push(Call::RemoveSource(id.to_string()));
    }

    fn add_layer(&mut self, layer: Value) {
        let id = layer["id"].as_str().unwrap_or_default().to_string();
        assert!(!self.layers.contains(&id), "layer {} already exists", id);
        self.layers.push(id.clone());
        self.calls.push(Call::AddLayer(id));
    }

    fn remove_layer(&mut self, id: &str) {
        let before = self.layers.len();
        self.layers.retain(|l| l != id);
        assert!(self.layers.len() < before, "no layer {}", id);
        self.calls.push(Call::RemoveLayer(id.to_string()));
    }

    fn alert(&mut self, message: &str) {
        self.calls.push(Call::Alert(message.to_string()));
    }
}
