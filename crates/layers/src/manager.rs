//! Layer lifecycle manager.
//!
//! Owns the managed overlay set: an insertion-ordered map from dataset id to
//! that dataset's overlays. Every mutation re-flattens the set and pushes it
//! to the engine and to registered observers.

use std::collections::BTreeMap;
use std::sync::Arc;

use catalog::{DatasetDescriptor, VisualizationType};
use formats::{Feature, FeatureCollection, TilesetManifest};
use foundation::{GeoBounds, owned_by};
use indexmap::IndexMap;
use runtime::EventBus;
use streaming::UrlBuilder;
use tracing::{debug, info, warn};

use crate::camera::{Camera, FitOptions, FlyTo, FrameOutcome, frame_to_bounds};
use crate::display_list::ActiveDatasetEntry;
use crate::engine::RenderEngine;
use crate::overlay::{BuildWarning, Overlay};
use crate::pick::{ClickReport, PickInfo};
use crate::pointcloud::PointCloudLayer;
use crate::raster::{TilePick, build_netcdf, build_raster};
use crate::symbology::{LayerStyle, Palette, percent_to_opacity};
use crate::vector::build_stations;

/// Fetched payload for one dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerData {
    /// Items page (STAC or OGC features).
    Collection(FeatureCollection),
    /// 3D Tiles manifest location.
    Tileset { url: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManagerConfig {
    pub fit: FitOptions,
    /// NetCDF levels used when a dataset configures none.
    pub default_levels: Vec<f64>,
    pub lift_per_level_m: f64,
    pub palette: Palette,
    pub point_cloud_zoom: f64,
    pub point_cloud_pitch: f64,
    pub point_cloud_duration_ms: u32,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            fit: FitOptions::default(),
            default_levels: vec![0.0],
            lift_per_level_m: 100.0,
            palette: Palette::default(),
            point_cloud_zoom: 8.0,
            point_cloud_pitch: 60.0,
            point_cloud_duration_ms: 2000,
        }
    }
}

/// Non-fatal events worth surfacing to a status bar or a test.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerDiagnostic {
    BuildSkipped {
        dataset_id: String,
        warning: BuildWarning,
    },
    FramingSkipped {
        dataset_id: String,
    },
    Framed {
        dataset_id: String,
        outcome: FrameOutcome,
    },
    PointCloudCentered {
        dataset_id: String,
        center: [f64; 2],
    },
}

pub type LayersObserver = Box<dyn FnMut(&[Arc<Overlay>]) + Send>;
pub type StationSink = Box<dyn FnMut(&Feature) + Send>;

pub struct LayerManager<E, C> {
    engine: E,
    camera: C,
    urls: UrlBuilder,
    config: ManagerConfig,
    managed: IndexMap<String, Vec<Arc<Overlay>>>,
    opacity: BTreeMap<String, u8>,
    visible: bool,
    pending_frames: BTreeMap<String, GeoBounds>,
    observers: Vec<LayersObserver>,
    station_sink: Option<StationSink>,
    diagnostics: EventBus<LayerDiagnostic>,
}

impl<E: std::fmt::Debug, C: std::fmt::Debug> std::fmt::Debug for LayerManager<E, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerManager")
            .field("engine", &self.engine)
            .field("camera", &self.camera)
            .field("managed", &self.managed.keys().collect::<Vec<_>>())
            .field("visible", &self.visible)
            .field("pending_frames", &self.pending_frames)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<E: RenderEngine, C: Camera> LayerManager<E, C> {
    pub fn new(engine: E, camera: C, urls: UrlBuilder, config: ManagerConfig) -> Self {
        Self {
            engine,
            camera,
            urls,
            config,
            managed: IndexMap::new(),
            opacity: BTreeMap::new(),
            visible: true,
            pending_frames: BTreeMap::new(),
            observers: Vec::new(),
            station_sink: None,
            diagnostics: EventBus::new(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn diagnostics(&self) -> &EventBus<LayerDiagnostic> {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut EventBus<LayerDiagnostic> {
        &mut self.diagnostics
    }

    pub fn on_layers_changed(&mut self, observer: LayersObserver) {
        self.observers.push(observer);
    }

    pub fn set_station_sink(&mut self, sink: StationSink) {
        self.station_sink = Some(sink);
    }

    /// Dataset ids currently managed, in first-activation order.
    pub fn managed_ids(&self) -> Vec<&str> {
        self.managed.keys().map(String::as_str).collect()
    }

    pub fn overlays_for(&self, dataset_id: &str) -> Option<&[Arc<Overlay>]> {
        self.managed.get(dataset_id).map(Vec::as_slice)
    }

    pub fn has_pending_frame(&self, dataset_id: &str) -> bool {
        self.pending_frames.contains_key(dataset_id)
    }

    /// Builds (or with `None`, removes) the overlays for one dataset,
    /// replacing whatever it had before.
    pub fn activate(&mut self, dataset: &DatasetDescriptor, data: Option<LayerData>) {
        let Some(data) = data else {
            self.deactivate(&dataset.id);
            return;
        };

        let style = LayerStyle {
            visible: self.visible,
            opacity: self
                .opacity
                .get(&dataset.id)
                .copied()
                .map_or(1.0, percent_to_opacity),
            lift_m: 0.0,
        };

        let overlays = match self.build(dataset, &data, style) {
            Ok(overlays) => overlays,
            Err(warning) => {
                warn!(dataset_id = %dataset.id, %warning, "dataset produced no overlays");
                self.diagnostics.emit(LayerDiagnostic::BuildSkipped {
                    dataset_id: dataset.id.clone(),
                    warning,
                });
                Vec::new()
            }
        };
        info!(
            dataset_id = %dataset.id,
            kind = %dataset.visualization_type,
            overlays = overlays.len(),
            "activated dataset"
        );

        let registered = self.managed.get(&dataset.id).is_some_and(|previous| {
            !overlays.is_empty()
                && overlays
                    .iter()
                    .all(|o| previous.iter().any(|p| p.id() == o.id()))
        });

        self.pending_frames.remove(&dataset.id);
        if !overlays.is_empty() {
            self.schedule_frame(dataset, &data);
        }

        self.managed
            .insert(dataset.id.clone(), overlays.into_iter().map(Arc::new).collect());
        self.publish();

        // The engine already knows these ids and will not report them ready
        // again.
        if registered {
            self.run_pending_frame(&dataset.id);
        }
    }

    /// Removes every overlay of `dataset_id`. Idempotent.
    pub fn deactivate(&mut self, dataset_id: &str) {
        self.pending_frames.remove(dataset_id);
        if self.managed.shift_remove(dataset_id).is_some() {
            info!(dataset_id, "deactivated dataset");
        }
        self.publish();
    }

    /// Applies the display list's opacities. Overlays already at the target
    /// opacity keep their identity; ids, membership and order never change.
    pub fn restyle_opacity(&mut self, entries: &[ActiveDatasetEntry]) {
        self.opacity = entries
            .iter()
            .map(|e| (e.dataset_id.clone(), e.opacity))
            .collect();

        for entry in entries {
            let Some(overlays) = self.managed.get_mut(&entry.dataset_id) else {
                continue;
            };
            let target = percent_to_opacity(entry.opacity);
            for overlay in overlays.iter_mut() {
                if (overlay.opacity() - target).abs() > f32::EPSILON {
                    *overlay = Arc::new(overlay.with_opacity(target));
                }
            }
        }
        self.publish();
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        for overlays in self.managed.values_mut() {
            for overlay in overlays.iter_mut() {
                if overlay.visible() != visible {
                    *overlay = Arc::new(overlay.with_visibility(visible));
                }
            }
        }
        self.publish();
    }

    pub fn teardown_all(&mut self) {
        self.managed.clear();
        self.pending_frames.clear();
        self.publish();
    }

    /// Every managed overlay, datasets in insertion order.
    pub fn flatten(&self) -> Vec<Arc<Overlay>> {
        self.managed.values().flatten().cloned().collect()
    }

    /// Number of flattened overlays whose id claims `dataset_id`.
    pub fn owned_overlay_count(&self, dataset_id: &str) -> usize {
        self.managed
            .values()
            .flatten()
            .filter(|o| owned_by(o.id(), dataset_id))
            .count()
    }

    /// Engine hand-off: `overlay_id` is registered and drawable. Runs the
    /// pending camera frame of the owning dataset, if any.
    pub fn overlay_ready(&mut self, overlay_id: &str) -> Option<FrameOutcome> {
        let dataset_id = self.owner_of(overlay_id)?.to_string();
        self.run_pending_frame(&dataset_id)
    }

    fn run_pending_frame(&mut self, dataset_id: &str) -> Option<FrameOutcome> {
        let bounds = self.pending_frames.remove(dataset_id)?;
        let outcome = frame_to_bounds(&mut self.camera, bounds, self.config.fit);
        debug!(dataset_id, ?outcome, "framed dataset");
        self.diagnostics.emit(LayerDiagnostic::Framed {
            dataset_id: dataset_id.to_string(),
            outcome,
        });
        Some(outcome)
    }

    /// Engine hand-off: the point cloud's manifest finished loading. Flies to
    /// its centre.
    pub fn tileset_loaded(
        &mut self,
        overlay_id: &str,
        manifest: &TilesetManifest,
    ) -> Option<[f64; 2]> {
        let dataset_id = self.owner_of(overlay_id)?.to_string();
        let is_point_cloud = self.managed.get(&dataset_id).is_some_and(|list| {
            list.iter()
                .any(|o| o.id() == overlay_id && matches!(o.as_ref(), Overlay::PointCloud(_)))
        });
        if !is_point_cloud {
            return None;
        }
        let Some(center) = manifest.center_lng_lat() else {
            warn!(dataset_id = %dataset_id, "tileset has no usable bounding volume");
            return None;
        };
        self.camera.fly_to(FlyTo {
            center,
            zoom: self.config.point_cloud_zoom,
            pitch: self.config.point_cloud_pitch,
            bearing: 0.0,
            duration_ms: self.config.point_cloud_duration_ms,
        });
        self.diagnostics
            .emit(LayerDiagnostic::PointCloudCentered { dataset_id, center });
        Some(center)
    }

    /// Resolves a click against the managed overlays. Station picks are also
    /// forwarded to the station sink.
    pub fn handle_pick(&mut self, pick: &PickInfo) -> Option<ClickReport> {
        let overlay = self
            .managed
            .values()
            .flatten()
            .find(|o| o.id() == pick.overlay_id)
            .cloned()?;

        let tile = pick.resolved_tile();
        let report = match overlay.as_ref() {
            Overlay::TiledImage(layer) => match &layer.pick {
                TilePick::Raster { feature, datetime } => ClickReport::Raster {
                    feature: Arc::clone(feature),
                    tile,
                    coordinate: pick.coordinate,
                    datetime: datetime.clone(),
                },
                TilePick::NetCdf {
                    concept_id,
                    datetime,
                    variable,
                    level,
                } => ClickReport::NetCdf {
                    concept_id: concept_id.clone(),
                    datetime: datetime.clone(),
                    variable: variable.clone(),
                    level: *level,
                    tile,
                    coordinate: pick.coordinate,
                },
            },
            Overlay::IconSet(layer) => ClickReport::Station {
                feature: layer.feature_at(pick.index?)?.clone(),
            },
            Overlay::PolygonSet(layer) => ClickReport::Station {
                feature: layer.feature_at(pick.index?)?.clone(),
            },
            Overlay::PointCloud(_) => return None,
        };

        if let (ClickReport::Station { feature }, Some(sink)) = (&report, self.station_sink.as_mut())
        {
            sink(feature);
        }
        Some(report)
    }

    fn owner_of(&self, overlay_id: &str) -> Option<&str> {
        self.managed
            .iter()
            .find(|(_, list)| list.iter().any(|o| o.id() == overlay_id))
            .map(|(id, _)| id.as_str())
    }

    fn build(
        &self,
        dataset: &DatasetDescriptor,
        data: &LayerData,
        style: LayerStyle,
    ) -> Result<Vec<Overlay>, BuildWarning> {
        let id = dataset.id.as_str();
        match (dataset.visualization_type, data) {
            (VisualizationType::Raster, LayerData::Collection(fc)) => {
                let layer = build_raster(id, fc, &self.urls, style)?;
                Ok(vec![Overlay::TiledImage(layer)])
            }
            (VisualizationType::NetCdf2d, LayerData::Collection(_)) => {
                let layers = build_netcdf(
                    id,
                    dataset.netcdf.as_ref(),
                    &self.config.default_levels,
                    self.config.lift_per_level_m,
                    &self.urls,
                    style,
                )?;
                Ok(layers.into_iter().map(Overlay::TiledImage).collect())
            }
            (VisualizationType::Feature, LayerData::Collection(fc)) => {
                let (icons, extrusions) = build_stations(id, fc, style, self.config.palette);
                let mut out = vec![Overlay::IconSet(icons)];
                out.extend(extrusions.map(Overlay::PolygonSet));
                Ok(out)
            }
            (VisualizationType::PointCloud, LayerData::Tileset { url }) => {
                Ok(vec![Overlay::PointCloud(PointCloudLayer::new(id, url.clone(), style))])
            }
            (VisualizationType::PointCloud, LayerData::Collection(_)) => {
                let url = dataset
                    .source_url
                    .clone()
                    .ok_or(BuildWarning::MissingTilesetUrl)?;
                Ok(vec![Overlay::PointCloud(PointCloudLayer::new(id, url, style))])
            }
            (VisualizationType::Unknown, _) => {
                debug!(dataset_id = id, "unknown visualization type, nothing to draw");
                Ok(Vec::new())
            }
            _ => Err(BuildWarning::DataMismatch),
        }
    }

    fn schedule_frame(&mut self, dataset: &DatasetDescriptor, data: &LayerData) {
        let LayerData::Collection(fc) = data else {
            return;
        };
        if dataset.visualization_type == VisualizationType::PointCloud {
            return;
        }
        match fc.bounds() {
            Some(bounds) => {
                self.pending_frames.insert(dataset.id.clone(), bounds);
            }
            None => {
                debug!(dataset_id = %dataset.id, "no usable bounds, skipping camera framing");
                self.diagnostics.emit(LayerDiagnostic::FramingSkipped {
                    dataset_id: dataset.id.clone(),
                });
            }
        }
    }

    fn publish(&mut self) {
        let flat = self.flatten();
        self.engine.set_overlays(&flat);
        for observer in &mut self.observers {
            observer(&flat);
        }
    }
}
