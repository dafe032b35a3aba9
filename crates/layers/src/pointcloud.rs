use foundation::make_id;
use serde::Serialize;

use crate::layer::{Layer, kind};
use crate::symbology::LayerStyle;

/// Streamed 3D Tiles point cloud. The engine loads the manifest itself and
/// reports it back through `LayerManager::tileset_loaded`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointCloudLayer {
    id: String,
    pub style: LayerStyle,
    pub tileset_url: String,
    pub point_size_px: f32,
}

impl PointCloudLayer {
    pub fn new(dataset_id: &str, tileset_url: impl Into<String>, style: LayerStyle) -> Self {
        Self {
            id: make_id(kind::POINT_CLOUD, dataset_id, None),
            style,
            tileset_url: tileset_url.into(),
            point_size_px: 2.0,
        }
    }
}

impl Layer for PointCloudLayer {
    fn id(&self) -> &str {
        &self.id
    }

    fn style(&self) -> &LayerStyle {
        &self.style
    }

    fn with_style(&self, style: LayerStyle) -> Self {
        Self {
            style,
            ..self.clone()
        }
    }
}
