//! Endpoint derivation for catalog records, map tiles and station
//! observations.
//!
//! Tile URLs keep `{z}/{x}/{y}` placeholders; the rendering engine fills them
//! per tile.

use catalog::{DatasetDescriptor, VisualizationType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use url::form_urlencoded;

pub const DEFAULT_API_BASE: &str = "https://dev.openveda.cloud/api";
pub const DEFAULT_RASTER_BASE: &str = "https://dev.openveda.cloud/api/raster";
pub const DEFAULT_NETCDF_BASE: &str = "https://dev-titiler-cmr.delta-backend.com";
pub const DEFAULT_STATION_COLLECTION: &str = "public.aqs_sites_gases";
pub const DEFAULT_ITEM_LIMIT: u32 = 1000;

/// Base URLs the builder derives everything from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_base: String,
    pub raster_base: String,
    pub netcdf_base: String,
    pub station_collection: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            raster_base: DEFAULT_RASTER_BASE.to_string(),
            netcdf_base: DEFAULT_NETCDF_BASE.to_string(),
            station_collection: DEFAULT_STATION_COLLECTION.to_string(),
        }
    }
}

/// Render options for COG raster tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterTileParams {
    pub assets: String,
    pub colormap: String,
    pub rescale: String,
    pub nodata: String,
}

impl Default for RasterTileParams {
    fn default() -> Self {
        Self {
            assets: "cog_default".to_string(),
            colormap: "plasma".to_string(),
            rescale: "0,255".to_string(),
            nodata: "-9999".to_string(),
        }
    }
}

/// Query for one NetCDF tile layer. `extra` pairs are appended verbatim
/// after the fixed parameters, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct NetCdfTileParams {
    pub concept_id: String,
    pub datetime: String,
    pub variable: String,
    pub scale: String,
    pub colormap: String,
    pub rescale: String,
    pub backend: String,
    pub extra: Vec<(String, String)>,
}

impl NetCdfTileParams {
    pub fn new(
        concept_id: impl Into<String>,
        datetime: impl Into<String>,
        variable: impl Into<String>,
    ) -> Self {
        Self {
            concept_id: concept_id.into(),
            datetime: datetime.into(),
            variable: variable.into(),
            scale: "1".to_string(),
            colormap: "reds".to_string(),
            rescale: "0,8".to_string(),
            backend: "xarray".to_string(),
            extra: Vec::new(),
        }
    }

    /// Adds the `sel=level=<v>` and `sel=time=<iso>` selectors for one
    /// stacked level.
    pub fn with_level_selection(mut self, level: f64, iso_time: &str) -> Self {
        self.extra.push(("sel".to_string(), format!("level={level}")));
        self.extra.push(("sel".to_string(), format!("time={iso_time}")));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct UrlBuilder {
    endpoints: Endpoints,
}

impl UrlBuilder {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Items endpoint for a dataset, or `None` for visualization types this
    /// build does not know how to fetch.
    pub fn dataset_items_url(&self, dataset: &DatasetDescriptor) -> Option<String> {
        let api = self.endpoints.api_base.trim_end_matches('/');
        let id = &dataset.id;
        match dataset.visualization_type {
            VisualizationType::Raster | VisualizationType::NetCdf2d => {
                Some(format!("{api}/stac/collections/{id}/items"))
            }
            VisualizationType::Feature => Some(format!("{api}/features/collections/{id}/items")),
            VisualizationType::PointCloud => Some(
                dataset
                    .source_url
                    .clone()
                    .unwrap_or_else(|| format!("{api}/stac/collections/{id}/items")),
            ),
            VisualizationType::Unknown => None,
        }
    }

    /// Items endpoint with a page size, used to pull a whole collection.
    pub fn bulk_items_url(&self, dataset: &DatasetDescriptor, limit: u32) -> Option<String> {
        let base = self.dataset_items_url(dataset)?;
        let sep = if base.contains('?') { '&' } else { '?' };
        Some(format!("{base}{sep}limit={limit}"))
    }

    /// Single record detail: `{api}/features/collections/{collection}/items/{id}`.
    pub fn record_url(&self, collection: &str, record_id: &str) -> String {
        let api = self.endpoints.api_base.trim_end_matches('/');
        format!("{api}/features/collections/{collection}/items/{record_id}")
    }

    pub fn raster_tile_url(
        &self,
        collection: &str,
        item_id: &str,
        params: &RasterTileParams,
    ) -> String {
        let base = self.endpoints.raster_base.trim_end_matches('/');
        format!(
            "{base}/collections/{collection}/tiles/WebMercatorQuad/{{z}}/{{x}}/{{y}}@1x\
             ?item={item_id}&assets={}&bidx=1&colormap_name={}&rescale={}&nodata={}",
            params.assets, params.colormap, params.rescale, params.nodata
        )
    }

    pub fn netcdf_tile_url(&self, params: &NetCdfTileParams) -> String {
        let base = self.endpoints.netcdf_base.trim_end_matches('/');
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("scale", &params.scale)
            .append_pair("concept_id", &params.concept_id)
            .append_pair("datetime", &params.datetime)
            .append_pair("variable", &params.variable)
            .append_pair("backend", &params.backend)
            .append_pair("colormap_name", &params.colormap)
            .append_pair("rescale", &params.rescale);
        for (k, v) in &params.extra {
            query.append_pair(k, v);
        }
        format!("{base}/tiles/WebMercatorQuad/{{z}}/{{x}}/{{y}}?{}", query.finish())
    }

    pub fn station_observations_url(&self, station_code: &str) -> String {
        let api = self.endpoints.api_base.trim_end_matches('/');
        let code: String = form_urlencoded::byte_serialize(station_code.as_bytes()).collect();
        format!(
            "{api}/features/collections/{}/items?station_code={code}",
            self.endpoints.station_collection
        )
    }
}

/// Normalizes a catalog datetime to a UTC ISO-8601 timestamp with
/// millisecond precision (`2024-01-01T00:00:00.000Z`).
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC) or a bare
/// date. Anything else is `None`.
pub fn iso_timestamp(datetime: &str) -> Option<String> {
    let s = datetime.trim();
    let utc: DateTime<Utc> = if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        dt.with_timezone(&Utc)
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        naive.and_utc()
    } else {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()?
            .and_hms_opt(0, 0, 0)?
            .and_utc()
    };
    Some(utc.to_rfc3339_opts(SecondsFormat::Millis, true))
}
