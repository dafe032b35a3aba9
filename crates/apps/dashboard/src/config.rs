use std::env;
use std::path::PathBuf;

use streaming::{DEFAULT_ITEM_LIMIT, Endpoints};

use crate::error::DashboardError;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub endpoints: Endpoints,
    pub item_limit: u32,
    /// JSON catalog document; the built-in gallery is used when unset.
    pub catalog_path: Option<PathBuf>,
    /// Datasets to activate on a headless run.
    pub datasets: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            item_limit: DEFAULT_ITEM_LIMIT,
            catalog_path: None,
            datasets: Vec::new(),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads `DASHBOARD_*` settings through `lookup`; unset or blank values
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DashboardError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = get("DASHBOARD_API_BASE") {
            config.endpoints.api_base = v;
        }
        if let Some(v) = get("DASHBOARD_RASTER_TILES") {
            config.endpoints.raster_base = v;
        }
        if let Some(v) = get("DASHBOARD_NETCDF_TILES") {
            config.endpoints.netcdf_base = v;
        }
        if let Some(v) = get("DASHBOARD_STATION_COLLECTION") {
            config.endpoints.station_collection = v;
        }
        if let Some(v) = get("DASHBOARD_ITEM_LIMIT") {
            config.item_limit = v.trim().parse().map_err(|_| {
                DashboardError::Config(format!("DASHBOARD_ITEM_LIMIT is not a count: {v}"))
            })?;
        }
        config.catalog_path = get("DASHBOARD_CATALOG").map(PathBuf::from);
        if let Some(v) = get("DASHBOARD_DATASETS") {
            config.datasets = split_ids(&v);
        }
        Ok(config)
    }
}

pub fn split_ids(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
