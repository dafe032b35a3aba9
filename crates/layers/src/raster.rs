use std::sync::Arc;

use catalog::NetCdfRender;
use formats::{Feature, FeatureCollection};
use foundation::make_id;
use serde::Serialize;
use streaming::{NetCdfTileParams, RasterTileParams, UrlBuilder, iso_timestamp};

use crate::layer::{Layer, kind};
use crate::overlay::BuildWarning;
use crate::symbology::LayerStyle;

/// Bitmap renderer the tiled-image overlay draws each tile with. Carries its
/// own copy of the style so restyling has to reach it explicitly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BitmapSubLayer {
    pub style: LayerStyle,
    pub desaturate: f32,
}

/// What a click on a tiled-image overlay reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TilePick {
    #[serde(rename = "raster")]
    Raster {
        #[serde(skip)]
        feature: Arc<Feature>,
        datetime: Option<String>,
    },
    #[serde(rename = "netcdf-2d")]
    NetCdf {
        concept_id: String,
        datetime: String,
        variable: String,
        level: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TiledImageLayer {
    id: String,
    pub style: LayerStyle,
    /// Template with `{z}/{x}/{y}` placeholders.
    pub url_template: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub tile_size: u32,
    pub sub_layer: BitmapSubLayer,
    pub pick: TilePick,
}

impl TiledImageLayer {
    pub fn new(id: String, url_template: String, style: LayerStyle, pick: TilePick) -> Self {
        Self {
            id,
            style,
            url_template,
            min_zoom: 0,
            max_zoom: 18,
            tile_size: 256,
            sub_layer: BitmapSubLayer {
                style,
                desaturate: 0.0,
            },
            pick,
        }
    }
}

impl Layer for TiledImageLayer {
    fn id(&self) -> &str {
        &self.id
    }

    fn style(&self) -> &LayerStyle {
        &self.style
    }

    fn with_style(&self, style: LayerStyle) -> Self {
        Self {
            style,
            sub_layer: BitmapSubLayer {
                style,
                ..self.sub_layer.clone()
            },
            ..self.clone()
        }
    }
}

/// One COG tile overlay for the first STAC item of the collection.
pub fn build_raster(
    dataset_id: &str,
    collection: &FeatureCollection,
    urls: &UrlBuilder,
    style: LayerStyle,
) -> Result<TiledImageLayer, BuildWarning> {
    let first = collection.features.first().ok_or(BuildWarning::EmptyCollection)?;
    let item_id = first.id.as_ref().ok_or(BuildWarning::MissingItemId)?.to_string();
    let stac_collection = first.collection.as_deref().unwrap_or(dataset_id);
    let url = urls.raster_tile_url(stac_collection, &item_id, &RasterTileParams::default());
    let pick = TilePick::Raster {
        feature: Arc::new(first.clone()),
        datetime: first.property_text("datetime"),
    };
    Ok(TiledImageLayer::new(
        make_id(kind::RASTER, dataset_id, None),
        url,
        style,
        pick,
    ))
}

/// One tile overlay per vertical level, each lifted by `level * lift_per_level_m`.
pub fn build_netcdf(
    dataset_id: &str,
    render: Option<&NetCdfRender>,
    default_levels: &[f64],
    lift_per_level_m: f64,
    urls: &UrlBuilder,
    style: LayerStyle,
) -> Result<Vec<TiledImageLayer>, BuildWarning> {
    let empty = NetCdfRender::default();
    let render = render.unwrap_or(&empty);

    fn present(v: &Option<String>) -> Option<&str> {
        v.as_deref().filter(|s| !s.trim().is_empty())
    }
    let fields = [
        ("concept_id", present(&render.concept_id)),
        ("datetime", present(&render.datetime)),
        ("variable", present(&render.variable)),
    ];
    let [(_, Some(concept_id)), (_, Some(datetime)), (_, Some(variable))] = fields else {
        let missing = fields
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(name, _)| *name)
            .collect();
        return Err(BuildWarning::MissingParameters(missing));
    };
    let iso = iso_timestamp(datetime)
        .ok_or_else(|| BuildWarning::InvalidDatetime(datetime.to_string()))?;

    let levels = if render.levels.is_empty() {
        default_levels
    } else {
        render.levels.as_slice()
    };

    let mut out = Vec::with_capacity(levels.len());
    for (i, &level) in levels.iter().enumerate() {
        let mut params = NetCdfTileParams::new(concept_id, datetime, variable)
            .with_level_selection(level, &iso);
        if let Some(colormap) = &render.colormap {
            params.colormap = colormap.clone();
        }
        if let Some(rescale) = &render.rescale {
            params.rescale = rescale.clone();
        }
        let level_style = LayerStyle {
            lift_m: level * lift_per_level_m,
            ..style
        };
        out.push(TiledImageLayer::new(
            make_id(kind::NETCDF, dataset_id, Some(&i.to_string())),
            urls.netcdf_tile_url(&params),
            level_style,
            TilePick::NetCdf {
                concept_id: concept_id.to_string(),
                datetime: datetime.to_string(),
                variable: variable.to_string(),
                level,
            },
        ));
    }
    Ok(out)
}
