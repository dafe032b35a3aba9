use std::collections::BTreeMap;

use crate::{
    CatalogError, CatalogStore, DatasetDescriptor, InMemoryCatalogStore, NetCdfRender,
    VisualizationType,
};

/// Datasets shipped with the dashboard when no catalog document is configured.
pub fn builtin_datasets() -> Vec<DatasetDescriptor> {
    vec![
        DatasetDescriptor::new(
            "public.aqs_gases_metadata",
            "AQS gas monitoring stations",
            VisualizationType::Feature,
            "Air Quality",
        ),
        DatasetDescriptor::new(
            "no2-monthly",
            "NO2 tropospheric column (monthly)",
            VisualizationType::Raster,
            "Satellite",
        ),
        DatasetDescriptor::new(
            "mur-sst",
            "MUR sea surface temperature",
            VisualizationType::NetCdf2d,
            "Oceanography",
        )
        .with_netcdf(NetCdfRender {
            concept_id: Some("C1996881146-POCLOUD".to_string()),
            datetime: Some("2024-01-01T00:00:00Z".to_string()),
            variable: Some("analysed_sst".to_string()),
            levels: vec![0.0],
            colormap: None,
            rescale: None,
        }),
        DatasetDescriptor::new(
            "lidar-sandia",
            "Sandia foothills lidar",
            VisualizationType::PointCloud,
            "Lidar",
        )
        .with_source_url("https://tiles.openveda.cloud/lidar/sandia/tileset.json"),
    ]
}

impl InMemoryCatalogStore {
    pub fn builtin() -> Self {
        Self::from_descriptors(builtin_datasets())
    }
}

/// Gallery view over a catalog: cards grouped by category plus the
/// currently highlighted card.
#[derive(Debug)]
pub struct Gallery<S: CatalogStore> {
    store: S,
    selected: Option<String>,
}

impl<S: CatalogStore> Gallery<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            selected: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Categories ordered by name; cards within a category ordered by id.
    pub fn categories(&self) -> Result<BTreeMap<String, Vec<DatasetDescriptor>>, CatalogError> {
        let mut grouped: BTreeMap<String, Vec<DatasetDescriptor>> = BTreeMap::new();
        for d in self.store.list()? {
            grouped.entry(d.category.clone()).or_default().push(d);
        }
        Ok(grouped)
    }

    pub fn select(&mut self, id: &str) -> Result<DatasetDescriptor, CatalogError> {
        let descriptor = self
            .store
            .get(id)?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        self.selected = Some(descriptor.id.clone());
        Ok(descriptor)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}
