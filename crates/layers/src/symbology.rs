use serde::Serialize;

/// Per-overlay presentation state the manager controls.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LayerStyle {
    pub visible: bool,
    /// 0.0 (transparent) ..= 1.0 (opaque).
    pub opacity: f32,
    /// Vertical offset in meters; stacks NetCDF levels above the base map.
    pub lift_m: f64,
}

impl LayerStyle {
    pub const fn new(visible: bool, opacity: f32, lift_m: f64) -> Self {
        Self {
            visible,
            opacity,
            lift_m,
        }
    }

    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            opacity: opacity.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn with_visibility(self, visible: bool) -> Self {
        Self { visible, ..self }
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            visible: true,
            opacity: 1.0,
            lift_m: 0.0,
        }
    }
}

/// Display-list opacity (integer percent) to overlay opacity.
pub fn percent_to_opacity(percent: u8) -> f32 {
    f32::from(percent.min(100)) / 100.0
}

/// RGBA colours used by the station icon and extrusion overlays.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Palette {
    pub icon: [u8; 4],
    pub fill: [u8; 4],
    pub line: [u8; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            icon: [255, 140, 0, 255],
            fill: [160, 160, 180, 200],
            line: [80, 80, 80, 255],
        }
    }
}
