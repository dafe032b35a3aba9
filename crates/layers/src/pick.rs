use std::sync::Arc;

use formats::Feature;
use serde::Serialize;
use streaming::TileCoord;

/// What the engine tells the manager about a click.
#[derive(Debug, Clone, PartialEq)]
pub struct PickInfo {
    pub overlay_id: String,
    /// Index of the picked object within the overlay (icon, polygon).
    pub index: Option<usize>,
    pub coordinate: Option<[f64; 2]>,
    pub tile: Option<TileCoord>,
    /// Map zoom at the time of the click.
    pub zoom: Option<f64>,
}

impl PickInfo {
    pub fn new(overlay_id: impl Into<String>) -> Self {
        Self {
            overlay_id: overlay_id.into(),
            index: None,
            coordinate: None,
            tile: None,
            zoom: None,
        }
    }

    pub fn at(mut self, coordinate: [f64; 2]) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    pub fn on_tile(mut self, tile: TileCoord) -> Self {
        self.tile = Some(tile);
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// The engine-reported tile, or the tile under the click coordinate at
    /// the click's map zoom.
    pub fn resolved_tile(&self) -> Option<TileCoord> {
        if self.tile.is_some() {
            return self.tile;
        }
        let [lng, lat] = self.coordinate?;
        Some(TileCoord::at_map_zoom(lng, lat, self.zoom?))
    }

    pub fn object(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// Click result surfaced to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ClickReport {
    #[serde(rename = "raster")]
    Raster {
        feature: Arc<Feature>,
        tile: Option<TileCoord>,
        coordinate: Option<[f64; 2]>,
        datetime: Option<String>,
    },
    #[serde(rename = "netcdf-2d")]
    NetCdf {
        concept_id: String,
        datetime: String,
        variable: String,
        level: f64,
        tile: Option<TileCoord>,
        coordinate: Option<[f64; 2]>,
    },
    #[serde(rename = "station")]
    Station { feature: Feature },
}
