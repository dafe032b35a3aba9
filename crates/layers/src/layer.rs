use crate::symbology::LayerStyle;

/// Kind tags used as the first segment of overlay ids; always the dataset's
/// visualization type.
pub mod kind {
    use catalog::VisualizationType;

    pub const RASTER: &str = VisualizationType::Raster.as_str();
    pub const NETCDF: &str = VisualizationType::NetCdf2d.as_str();
    pub const FEATURE: &str = VisualizationType::Feature.as_str();
    pub const POINT_CLOUD: &str = VisualizationType::PointCloud.as_str();
}

/// Common surface of every overlay variant.
///
/// Restyling never mutates: it returns a new value with the same id, so an
/// engine diffing by id sees an update rather than a new overlay.
pub trait Layer: Sized {
    fn id(&self) -> &str;
    fn style(&self) -> &LayerStyle;

    fn with_style(&self, style: LayerStyle) -> Self;

    fn opacity(&self) -> f32 {
        self.style().opacity
    }

    fn visible(&self) -> bool {
        self.style().visible
    }

    fn with_opacity(&self, opacity: f32) -> Self {
        self.with_style(self.style().with_opacity(opacity))
    }

    fn with_visibility(&self, visible: bool) -> Self {
        self.with_style(self.style().with_visibility(visible))
    }
}
