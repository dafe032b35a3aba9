use serde::Serialize;

use crate::layer::Layer;
use crate::pointcloud::PointCloudLayer;
use crate::raster::TiledImageLayer;
use crate::symbology::LayerStyle;
use crate::vector::{IconSetLayer, PolygonSetLayer};

/// One renderable unit handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    TiledImage(TiledImageLayer),
    IconSet(IconSetLayer),
    PolygonSet(PolygonSetLayer),
    PointCloud(PointCloudLayer),
}

impl Overlay {
    pub fn id(&self) -> &str {
        match self {
            Overlay::TiledImage(l) => l.id(),
            Overlay::IconSet(l) => l.id(),
            Overlay::PolygonSet(l) => l.id(),
            Overlay::PointCloud(l) => l.id(),
        }
    }

    pub fn style(&self) -> &LayerStyle {
        match self {
            Overlay::TiledImage(l) => l.style(),
            Overlay::IconSet(l) => l.style(),
            Overlay::PolygonSet(l) => l.style(),
            Overlay::PointCloud(l) => l.style(),
        }
    }

    pub fn opacity(&self) -> f32 {
        self.style().opacity
    }

    pub fn visible(&self) -> bool {
        self.style().visible
    }

    /// Same overlay (same id, same data) at a new opacity, including any
    /// nested renderer.
    pub fn with_opacity(&self, opacity: f32) -> Overlay {
        match self {
            Overlay::TiledImage(l) => Overlay::TiledImage(l.with_opacity(opacity)),
            Overlay::IconSet(l) => Overlay::IconSet(l.with_opacity(opacity)),
            Overlay::PolygonSet(l) => Overlay::PolygonSet(l.with_opacity(opacity)),
            Overlay::PointCloud(l) => Overlay::PointCloud(l.with_opacity(opacity)),
        }
    }

    pub fn with_visibility(&self, visible: bool) -> Overlay {
        match self {
            Overlay::TiledImage(l) => Overlay::TiledImage(l.with_visibility(visible)),
            Overlay::IconSet(l) => Overlay::IconSet(l.with_visibility(visible)),
            Overlay::PolygonSet(l) => Overlay::PolygonSet(l.with_visibility(visible)),
            Overlay::PointCloud(l) => Overlay::PointCloud(l.with_visibility(visible)),
        }
    }
}

/// Why a dataset produced no overlays. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    EmptyCollection,
    MissingItemId,
    MissingParameters(Vec<&'static str>),
    InvalidDatetime(String),
    MissingTilesetUrl,
    /// Layer data shape does not match the visualization type.
    DataMismatch,
}

impl std::fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildWarning::EmptyCollection => write!(f, "collection has no items"),
            BuildWarning::MissingItemId => write!(f, "first item has no id"),
            BuildWarning::MissingParameters(names) => {
                write!(f, "missing required parameters: {}", names.join(", "))
            }
            BuildWarning::InvalidDatetime(s) => write!(f, "unparsable datetime: {s}"),
            BuildWarning::MissingTilesetUrl => write!(f, "point cloud has no tileset url"),
            BuildWarning::DataMismatch => write!(f, "layer data does not match visualization type"),
        }
    }
}
