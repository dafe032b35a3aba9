use std::sync::Arc;

use earcutr::earcut;
use formats::{Feature, FeatureCollection, Geometry};
use foundation::make_id;
use serde::Serialize;
use tracing::debug;

use crate::layer::{Layer, kind};
use crate::symbology::{LayerStyle, Palette};

/// Icon anchor for one feature; `feature_index` points back into the
/// overlay's feature list so picks resolve to the full record.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct IconPoint {
    pub position: [f64; 2],
    pub feature_index: usize,
}

/// Per-point renderer nested inside the icon overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSubLayer {
    pub style: LayerStyle,
    pub radius_px: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconSetLayer {
    id: String,
    pub style: LayerStyle,
    #[serde(skip)]
    pub features: Arc<Vec<Feature>>,
    pub points: Arc<Vec<IconPoint>>,
    pub icon_size_px: f32,
    pub color: [u8; 4],
    pub sub_layer: PointSubLayer,
}

impl IconSetLayer {
    /// Feature behind the `index`th icon.
    pub fn feature_at(&self, index: usize) -> Option<&Feature> {
        let point = self.points.get(index)?;
        self.features.get(point.feature_index)
    }
}

impl Layer for IconSetLayer {
    fn id(&self) -> &str {
        &self.id
    }

    fn style(&self) -> &LayerStyle {
        &self.style
    }

    fn with_style(&self, style: LayerStyle) -> Self {
        Self {
            style,
            sub_layer: PointSubLayer {
                style,
                ..self.sub_layer.clone()
            },
            ..self.clone()
        }
    }
}

/// Extruded footprint. `triangles` indexes the flattened ring vertices
/// (outer ring first, then holes) and covers the roof cap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtrudedPolygon {
    pub rings: Vec<Vec<[f64; 2]>>,
    pub triangles: Vec<usize>,
    pub height_m: f64,
    pub base_height_m: f64,
    pub feature_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonSetLayer {
    id: String,
    pub style: LayerStyle,
    #[serde(skip)]
    pub features: Arc<Vec<Feature>>,
    pub polygons: Arc<Vec<ExtrudedPolygon>>,
    pub palette: Palette,
    pub wireframe: bool,
}

impl PolygonSetLayer {
    pub fn feature_at(&self, index: usize) -> Option<&Feature> {
        let polygon = self.polygons.get(index)?;
        self.features.get(polygon.feature_index)
    }
}

impl Layer for PolygonSetLayer {
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

/// Station icons for every feature with a usable position, plus an
/// extrusion overlay when the collection carries polygons.
pub fn build_stations(
    dataset_id: &str,
    collection: &FeatureCollection,
    style: LayerStyle,
    palette: Palette,
) -> (IconSetLayer, Option<PolygonSetLayer>) {
    let features = Arc::new(collection.features.clone());

    let mut points = Vec::with_capacity(features.len());
    for (i, f) in features.iter().enumerate() {
        match f.point_position() {
            Some(position) => points.push(IconPoint {
                position,
                feature_index: i,
            }),
            None => debug!(dataset_id, feature = i, "feature has no point position"),
        }
    }

    let icons = IconSetLayer {
        id: make_id(kind::FEATURE, dataset_id, None),
        style,
        features: Arc::clone(&features),
        points: Arc::new(points),
        icon_size_px: 24.0,
        color: palette.icon,
        sub_layer: PointSubLayer {
            style,
            radius_px: 6.0,
        },
    };

    let polygons: Vec<ExtrudedPolygon> = features
        .iter()
        .enumerate()
        .flat_map(|(i, f)| extrude_feature(i, f))
        .collect();
    let extrusions = (!polygons.is_empty()).then(|| PolygonSetLayer {
        id: make_id(kind::FEATURE, dataset_id, Some("extrusions")),
        style,
        features,
        polygons: Arc::new(polygons),
        palette,
        wireframe: true,
    });

    (icons, extrusions)
}

fn extrude_feature(index: usize, feature: &Feature) -> Vec<ExtrudedPolygon> {
    let parts: Vec<&Vec<Vec<Vec<f64>>>> = match &feature.geometry {
        Some(Geometry::Polygon { coordinates }) => vec![coordinates],
        Some(Geometry::MultiPolygon { coordinates }) => coordinates.iter().collect(),
        _ => return Vec::new(),
    };
    let height_m = feature.property_f64("height").unwrap_or(0.0);
    let base_height_m = feature.property_f64("base_height").unwrap_or(0.0);

    parts
        .into_iter()
        .filter_map(|rings| {
            let rings: Vec<Vec<[f64; 2]>> = rings.iter().map(|r| ring_positions(r)).collect();
            if rings.first().is_none_or(|outer| outer.len() < 3) {
                return None;
            }
            let triangles = triangulate(&rings);
            Some(ExtrudedPolygon {
                rings,
                triangles,
                height_m,
                base_height_m,
                feature_index: index,
            })
        })
        .collect()
}

fn ring_positions(ring: &[Vec<f64>]) -> Vec<[f64; 2]> {
    let mut pts: Vec<[f64; 2]> = ring
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| [c[0], c[1]])
        .collect();
    drop_closing_duplicate(&mut pts);
    pts
}

fn drop_closing_duplicate(points: &mut Vec<[f64; 2]>) {
    if let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) {
        if points.len() >= 2
            && (first[0] - last[0]).abs() < 1e-12
            && (first[1] - last[1]).abs() < 1e-12
        {
            points.pop();
        }
    }
}

fn triangulate(rings: &[Vec<[f64; 2]>]) -> Vec<usize> {
    let mut coords: Vec<f64> = Vec::new();
    let mut holes: Vec<usize> = Vec::new();
    for (i, ring) in rings.iter().enumerate() {
        if i > 0 {
            holes.push(coords.len() / 2);
        }
        for p in ring {
            coords.extend_from_slice(p);
        }
    }
    earcut(&coords, &holes, 2).unwrap_or_default()
}
