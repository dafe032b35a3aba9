use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod gallery;

pub use gallery::*;

/// Selects which overlay construction path a dataset takes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualizationType {
    #[serde(rename = "raster")]
    Raster,
    #[serde(rename = "feature")]
    Feature,
    #[serde(rename = "point-cloud")]
    PointCloud,
    #[serde(rename = "netcdf-2d")]
    NetCdf2d,
    /// Anything a served catalog names that this build does not render.
    #[serde(other, rename = "unknown")]
    Unknown,
}

impl VisualizationType {
    /// Tag used as the `{kind}` part of overlay ids.
    pub const fn as_str(&self) -> &'static str {
        match self {
            VisualizationType::Raster => "raster",
            VisualizationType::Feature => "feature",
            VisualizationType::PointCloud => "point-cloud",
            VisualizationType::NetCdf2d => "netcdf-2d",
            VisualizationType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for VisualizationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering parameters for gridded NetCDF datasets served through a
/// titiler-cmr style tiler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetCdfRender {
    #[serde(default)]
    pub concept_id: Option<String>,
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub variable: Option<String>,
    /// Vertical levels to stack; empty means "use the manager default".
    #[serde(default)]
    pub levels: Vec<f64>,
    #[serde(default)]
    pub colormap: Option<String>,
    #[serde(default)]
    pub rescale: Option<String>,
}

/// One gallery card. Immutable once loaded from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub visualization_type: VisualizationType,
    /// Overrides the derived items endpoint (point clouds point at a
    /// tileset manifest).
    #[serde(rename = "url", default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netcdf: Option<NetCdfRender>,
}

impl DatasetDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        visualization_type: VisualizationType,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            visualization_type,
            source_url: None,
            category: category.into(),
            thumbnail_url: None,
            netcdf: None,
        }
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn with_netcdf(mut self, netcdf: NetCdfRender) -> Self {
        self.netcdf = Some(netcdf);
        self
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub entries: BTreeMap<String, DatasetDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    NotFound(String),
    Corrupt(String),
    Io(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NotFound(id) => write!(f, "dataset not found in catalog: {id}"),
            CatalogError::Corrupt(msg) => write!(f, "catalog document corrupt: {msg}"),
            CatalogError::Io(msg) => write!(f, "catalog io error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

pub trait CatalogStore {
    fn list(&self) -> Result<Vec<DatasetDescriptor>, CatalogError>;
    fn get(&self, id: &str) -> Result<Option<DatasetDescriptor>, CatalogError>;
}

#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    snapshot: CatalogSnapshot,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptors(descriptors: impl IntoIterator<Item = DatasetDescriptor>) -> Self {
        let mut store = Self::new();
        for d in descriptors {
            store.snapshot.entries.insert(d.id.clone(), d);
        }
        store
    }

    /// Loads a served catalog: a JSON array of descriptors.
    ///
    /// Duplicate ids are rejected rather than silently collapsed, since the
    /// gallery would otherwise show a card that can never be selected.
    pub fn from_json_str(payload: &str) -> Result<Self, CatalogError> {
        let descriptors: Vec<DatasetDescriptor> =
            serde_json::from_str(payload).map_err(|e| CatalogError::Corrupt(e.to_string()))?;
        let mut store = Self::new();
        for d in descriptors {
            if store.snapshot.entries.contains_key(&d.id) {
                return Err(CatalogError::Corrupt(format!("duplicate dataset id: {}", d.id)));
            }
            store.snapshot.entries.insert(d.id.clone(), d);
        }
        Ok(store)
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn list(&self) -> Result<Vec<DatasetDescriptor>, CatalogError> {
        Ok(self.snapshot.entries.values().cloned().collect())
    }

    fn get(&self, id: &str) -> Result<Option<DatasetDescriptor>, CatalogError> {
        Ok(self.snapshot.entries.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_served_catalog() {
        let json = r#"[
            {"id": "no2-monthly", "name": "NO2 monthly", "type": "raster", "category": "Satellite"},
            {"id": "lidar", "name": "Lidar", "type": "point-cloud", "category": "Terrain",
             "url": "https://tiles.example.test/lidar/tileset.json"},
            {"id": "wind", "name": "Wind", "type": "vector-tiles", "category": "Weather"}
        ]"#;
        let store = InMemoryCatalogStore::from_json_str(json).expect("parse");
        let lidar = store.get("lidar").unwrap().unwrap();
        assert_eq!(lidar.visualization_type, VisualizationType::PointCloud);
        assert_eq!(
            lidar.source_url.as_deref(),
            Some("https://tiles.example.test/lidar/tileset.json")
        );
        let wind = store.get("wind").unwrap().unwrap();
        assert_eq!(wind.visualization_type, VisualizationType::Unknown);
    }

    #[test]
    fn duplicate_ids_are_corrupt() {
        let json = r#"[
            {"id": "a", "name": "A", "type": "raster", "category": "x"},
            {"id": "a", "name": "A2", "type": "feature", "category": "x"}
        ]"#;
        let err = InMemoryCatalogStore::from_json_str(json).unwrap_err();
        assert_eq!(err, CatalogError::Corrupt("duplicate dataset id: a".to_string()));
    }

    #[test]
    fn list_is_ordered_by_id() {
        let store = InMemoryCatalogStore::from_descriptors([
            DatasetDescriptor::new("b", "B", VisualizationType::Raster, "x"),
            DatasetDescriptor::new("a", "A", VisualizationType::Feature, "x"),
        ]);
        let ids: Vec<_> = store.list().unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn visualization_tags_match_wire_names() {
        let tags: Vec<_> = [
            VisualizationType::Raster,
            VisualizationType::Feature,
            VisualizationType::PointCloud,
            VisualizationType::NetCdf2d,
        ]
        .iter()
        .map(|t| serde_json::to_string(t).unwrap())
        .collect();
        assert_eq!(
            tags,
            vec![
                "\"raster\"".to_string(),
                "\"feature\"".to_string(),
                "\"point-cloud\"".to_string(),
                "\"netcdf-2d\"".to_string(),
            ]
        );
    }
}
