//! Dashboard coordinator.
//!
//! The single owner of gallery selection, the display list and the layer
//! manager. Every user event lands here; fetches run async and their results
//! are applied only while their request token is still current.

use catalog::{DatasetDescriptor, Gallery, InMemoryCatalogStore, VisualizationType};
use compute::{StationSelection, build_series};
use formats::Feature;
use layers::{
    Camera, ClickReport, DisplayList, FrameOutcome, LayerData, LayerManager, ManagerConfig,
    Overlay, PickInfo, PluginAction, PluginRegistry, RenderEngine,
};
use runtime::{EventBus, LayerSignal};
use serde::Serialize;
use serde_json::Value;
use streaming::{FetchError, RecordSource, Request, RequestTracker, UrlBuilder};
use tracing::{debug, error, info, warn};

use crate::chart::StationChart;
use crate::config::DashboardConfig;
use crate::error::DashboardError;

const STATION_REQUEST: &str = "station-chart";
const PLUGIN_CATEGORY: &str = "Plugins";

/// How a selected dataset gets its data.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadPlan {
    Fetch { url: String },
    Tileset { url: String },
    Unsupported,
}

/// A selection waiting on its fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLoad {
    pub dataset: DatasetDescriptor,
    pub request: Request,
    pub plan: LoadPlan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Applied { overlays: usize },
    /// Superseded by a newer selection or by removal.
    Stale,
    Failed(String),
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedRecord {
    pub dataset_id: String,
    pub record_id: String,
    pub body: Value,
}

pub struct Dashboard<S, E, C> {
    gallery: Gallery<InMemoryCatalogStore>,
    display: DisplayList,
    manager: LayerManager<E, C>,
    requests: RequestTracker,
    urls: UrlBuilder,
    item_limit: u32,
    source: S,
    plugins: PluginRegistry,
    signals: EventBus<LayerSignal>,
    selected_record: Option<SelectedRecord>,
    chart: StationChart,
    last_error: Option<String>,
}

impl<S, E: std::fmt::Debug, C: std::fmt::Debug> std::fmt::Debug for Dashboard<S, E, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("display", &self.display)
            .field("manager", &self.manager)
            .field("plugins", &self.plugins)
            .field("selected_record", &self.selected_record)
            .field("chart", &self.chart)
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl<S: RecordSource, E: RenderEngine, C: Camera> Dashboard<S, E, C> {
    pub fn new(
        source: S,
        engine: E,
        camera: C,
        store: InMemoryCatalogStore,
        config: &DashboardConfig,
    ) -> Self {
        let urls = UrlBuilder::new(config.endpoints.clone());
        let mut plugins = PluginRegistry::builtin();
        plugins.load_all();
        Self {
            gallery: Gallery::new(store),
            display: DisplayList::new(),
            manager: LayerManager::new(engine, camera, urls.clone(), ManagerConfig::default()),
            requests: RequestTracker::new(),
            urls,
            item_limit: config.item_limit,
            source,
            plugins,
            signals: EventBus::new(),
            selected_record: None,
            chart: StationChart::default(),
            last_error: None,
        }
    }

    pub fn gallery(&self) -> &Gallery<InMemoryCatalogStore> {
        &self.gallery
    }

    pub fn display(&self) -> &DisplayList {
        &self.display
    }

    pub fn manager(&self) -> &LayerManager<E, C> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut LayerManager<E, C> {
        &mut self.manager
    }

    pub fn signals(&self) -> &EventBus<LayerSignal> {
        &self.signals
    }

    pub fn chart(&self) -> &StationChart {
        &self.chart
    }

    pub fn selected_record(&self) -> Option<&SelectedRecord> {
        self.selected_record.as_ref()
    }

    /// Message of the most recent failed dataset load, cleared by the next
    /// successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn plugin_status(&self) -> Vec<String> {
        self.plugins.render_all()
    }

    /// Marks `dataset_id` selected, announces it to plugins and opens a
    /// request for its data. The returned load must be fetched and handed
    /// back to [`Dashboard::complete_load`].
    pub fn begin_select(&mut self, dataset_id: &str) -> Result<PendingLoad, DashboardError> {
        let dataset = self.gallery.select(dataset_id)?;
        let plan = match dataset.visualization_type {
            VisualizationType::PointCloud => match dataset.source_url.clone() {
                Some(url) => LoadPlan::Tileset { url },
                None => LoadPlan::Unsupported,
            },
            _ => self
                .urls
                .bulk_items_url(&dataset, self.item_limit)
                .map_or(LoadPlan::Unsupported, |url| LoadPlan::Fetch { url }),
        };

        let signal_url = self
            .urls
            .dataset_items_url(&dataset)
            .or_else(|| dataset.source_url.clone());
        if let Some(url) = signal_url {
            let signal = LayerSignal::Selected { url };
            let actions = self.plugins.dispatch(&signal);
            self.signals.emit(signal);
            for action in actions {
                self.apply_plugin_action(action, &dataset);
            }
        }

        let request = self.requests.begin(dataset.id.clone());
        debug!(dataset_id = %dataset.id, request = request.0, ?plan, "load started");
        Ok(PendingLoad {
            dataset,
            request,
            plan,
        })
    }

    /// Runs the network part of a pending load. Point clouds need no fetch;
    /// the engine streams the tileset itself.
    pub async fn fetch(&self, pending: &PendingLoad) -> Result<Option<LayerData>, FetchError> {
        match &pending.plan {
            LoadPlan::Fetch { url } => {
                let collection = self.source.fetch_collection(url).await?;
                Ok(Some(LayerData::Collection(collection)))
            }
            LoadPlan::Tileset { url } => Ok(Some(LayerData::Tileset { url: url.clone() })),
            LoadPlan::Unsupported => Ok(None),
        }
    }

    pub fn complete_load(
        &mut self,
        pending: PendingLoad,
        result: Result<Option<LayerData>, FetchError>,
    ) -> LoadOutcome {
        let dataset = &pending.dataset;
        if !self.requests.finish(&dataset.id, pending.request) {
            debug!(dataset_id = %dataset.id, request = pending.request.0, "dropping stale load");
            return LoadOutcome::Stale;
        }

        match result {
            Ok(Some(data)) => {
                self.display.upsert(dataset);
                self.manager.restyle_opacity(self.display.entries());
                self.manager.activate(dataset, Some(data));
                self.last_error = None;
                let overlays = self.manager.overlays_for(&dataset.id).map_or(0, <[_]>::len);
                LoadOutcome::Applied { overlays }
            }
            Ok(None) => {
                warn!(
                    dataset_id = %dataset.id,
                    kind = %dataset.visualization_type,
                    "no loader for visualization type"
                );
                LoadOutcome::Unsupported
            }
            Err(err) => {
                error!(dataset_id = %dataset.id, error = %err, "failed to load dataset");
                let message = format!("failed to load {}: {err}", dataset.id);
                self.last_error = Some(message.clone());
                LoadOutcome::Failed(message)
            }
        }
    }

    /// Selects, fetches and applies in one step.
    pub async fn select_dataset(&mut self, dataset_id: &str) -> Result<LoadOutcome, DashboardError> {
        let pending = self.begin_select(dataset_id)?;
        let result = self.fetch(&pending).await;
        Ok(self.complete_load(pending, result))
    }

    /// Drops a dataset from the display list and the map. Any load still in
    /// flight for it becomes stale.
    pub fn remove_layer(&mut self, dataset_id: &str) -> bool {
        let removed = self.display.remove(dataset_id).is_some();
        if self.requests.cancel(dataset_id).is_some() {
            debug!(dataset_id, "cancelled in-flight load");
        }
        self.manager.deactivate(dataset_id);
        self.manager.restyle_opacity(self.display.entries());

        if self
            .selected_record
            .as_ref()
            .is_some_and(|r| r.dataset_id == dataset_id)
        {
            self.selected_record = None;
        }
        if self.gallery.selected() == Some(dataset_id) {
            self.gallery.clear_selection();
        }
        removed
    }

    /// `opacity` is a percentage.
    pub fn set_opacity(&mut self, dataset_id: &str, opacity: u8) -> bool {
        if !self.display.set_opacity(dataset_id, opacity) {
            return false;
        }
        let opacity = self.display.get(dataset_id).map_or(opacity, |e| e.opacity);
        let signal = LayerSignal::Opacity {
            dataset_id: dataset_id.to_string(),
            opacity,
        };
        let actions = self.plugins.dispatch(&signal);
        self.signals.emit(signal);
        if !actions.is_empty() {
            debug!(count = actions.len(), "ignoring plugin actions for opacity change");
        }
        self.manager.restyle_opacity(self.display.entries());
        true
    }

    /// Reorders the display list only; map stacking is unaffected.
    pub fn move_layer(&mut self, from: usize, to: usize) -> bool {
        self.display.move_entry(from, to)
    }

    /// Fetches one record for the detail panel. A failed fetch clears
    /// whatever was shown.
    pub async fn load_record(&mut self, dataset_id: &str, record_id: &str) -> Option<&SelectedRecord> {
        let url = self.urls.record_url(dataset_id, record_id);
        match self.source.fetch_record(&url).await {
            Ok(body) => {
                self.selected_record = Some(SelectedRecord {
                    dataset_id: dataset_id.to_string(),
                    record_id: record_id.to_string(),
                    body,
                });
            }
            Err(err) => {
                warn!(dataset_id, record_id, error = %err, "record fetch failed");
                self.selected_record = None;
            }
        }
        self.selected_record.as_ref()
    }

    /// Engine hand-off; see [`LayerManager::overlay_ready`].
    pub fn overlay_ready(&mut self, overlay_id: &str) -> Option<FrameOutcome> {
        self.manager.overlay_ready(overlay_id)
    }

    /// Loads the manifest behind a point-cloud overlay and centres the camera
    /// on it.
    pub async fn tileset_ready(&mut self, overlay_id: &str) -> Option<[f64; 2]> {
        let url = self
            .manager
            .flatten()
            .iter()
            .find_map(|o| match o.as_ref() {
                Overlay::PointCloud(layer) if o.id() == overlay_id => {
                    Some(layer.tileset_url.clone())
                }
                _ => None,
            })?;
        match self.source.fetch_tileset(&url).await {
            Ok(manifest) => self.manager.tileset_loaded(overlay_id, &manifest),
            Err(err) => {
                warn!(overlay_id, error = %err, "tileset manifest unavailable");
                None
            }
        }
    }

    /// Resolves a map click; station clicks open the time-series chart.
    pub async fn click(&mut self, pick: &PickInfo) -> Option<ClickReport> {
        let report = self.manager.handle_pick(pick)?;
        if let ClickReport::Station { feature } = &report {
            self.show_station(feature).await;
        }
        Some(report)
    }

    pub async fn show_station(&mut self, feature: &Feature) {
        let Some(station) = StationSelection::from_feature(feature) else {
            warn!("clicked feature has no station_code");
            return;
        };
        let url = self.urls.station_observations_url(&station.station_code);
        self.chart.show(station.clone());
        let request = self.requests.begin(STATION_REQUEST);

        let result = self.source.fetch_collection(&url).await;
        if !self.requests.finish(STATION_REQUEST, request) {
            return;
        }
        match result {
            Ok(observations) => {
                let series = build_series(&observations, Some(station));
                info!(
                    station = ?series.station,
                    parameter = ?series.parameter,
                    points = series.values.len(),
                    "station series ready"
                );
                self.chart.finish(series);
            }
            Err(err) => {
                error!(error = %err, "station observations fetch failed");
                self.chart.fail(err.to_string());
            }
        }
    }

    pub fn hide_chart(&mut self) {
        self.requests.cancel(STATION_REQUEST);
        self.chart.hide();
    }

    fn apply_plugin_action(&mut self, action: PluginAction, selected: &DatasetDescriptor) {
        match action {
            PluginAction::ActivatePointCloud {
                dataset_id,
                tileset_url,
            } => {
                if selected.visualization_type == VisualizationType::PointCloud {
                    debug!(dataset_id = %selected.id, "point cloud loads through its own selection");
                    return;
                }
                info!(dataset_id = %dataset_id, tileset_url = %tileset_url, "plugin activating point cloud");
                let descriptor = DatasetDescriptor::new(
                    dataset_id.clone(),
                    dataset_id,
                    VisualizationType::PointCloud,
                    PLUGIN_CATEGORY,
                )
                .with_source_url(tileset_url.clone());
                self.display.upsert(&descriptor);
                self.manager.restyle_opacity(self.display.entries());
                self.manager
                    .activate(&descriptor, Some(LayerData::Tileset { url: tileset_url }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layers::{RecordingCamera, RecordingEngine};
    use serde_json::json;
    use streaming::{Endpoints, MemoryRecordSource};

    type TestDashboard = Dashboard<MemoryRecordSource, RecordingEngine, RecordingCamera>;

    fn urls() -> UrlBuilder {
        UrlBuilder::new(Endpoints::default())
    }

    fn dataset(id: &str) -> DatasetDescriptor {
        InMemoryCatalogStore::builtin()
            .snapshot()
            .entries
            .get(id)
            .cloned()
            .expect("builtin dataset")
    }

    fn bulk_url(id: &str) -> String {
        urls().bulk_items_url(&dataset(id), 1000).expect("items url")
    }

    fn raster_items() -> Value {
        json!({"type": "FeatureCollection", "features": [{
            "type": "Feature", "id": "no2-2024-01", "collection": "no2-monthly",
            "bbox": [-180.0, -90.0, 180.0, 90.0],
            "geometry": {"type": "Polygon", "coordinates": [[
                [-180.0, -90.0], [180.0, -90.0], [180.0, 90.0], [-180.0, 90.0], [-180.0, -90.0]
            ]]},
            "properties": {"datetime": "2024-01-01T00:00:00Z"}
        }]})
    }

    fn stations() -> Value {
        json!({"type": "FeatureCollection", "features": [{
            "type": "Feature", "id": 1,
            "geometry": {"type": "Point", "coordinates": [-118.23, 34.07]},
            "properties": {"station_code": "060371103", "city": "Los Angeles"}
        }]})
    }

    fn observations() -> Value {
        json!({"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": null, "properties": {
                "parameter": "no2", "value": "12.5", "units_of_measure": "ppb",
                "datetime": "2024-01-02T00:00:00Z"}},
            {"type": "Feature", "geometry": null, "properties": {
                "parameter": "no2", "value": "10.0", "units_of_measure": "ppb",
                "datetime": "2024-01-01T00:00:00Z"}}
        ]})
    }

    fn dashboard(source: MemoryRecordSource) -> TestDashboard {
        Dashboard::new(
            source,
            RecordingEngine::default(),
            RecordingCamera::default(),
            InMemoryCatalogStore::builtin(),
            &DashboardConfig::default(),
        )
    }

    fn collection(doc: Value) -> LayerData {
        LayerData::Collection(serde_json::from_value(doc).expect("collection"))
    }

    #[tokio::test]
    async fn select_raster_adds_display_entry_and_overlay() {
        let mut src = MemoryRecordSource::new();
        src.insert(bulk_url("no2-monthly"), raster_items());
        let mut dash = dashboard(src);

        let outcome = dash.select_dataset("no2-monthly").await.expect("select");
        assert_eq!(outcome, LoadOutcome::Applied { overlays: 1 });
        assert!(dash.display().contains("no2-monthly"));
        assert_eq!(dash.gallery().selected(), Some("no2-monthly"));
        assert_eq!(dash.manager().managed_ids(), vec!["no2-monthly"]);
        assert_eq!(
            dash.signals().events()[0].payload,
            LayerSignal::Selected {
                url: urls().dataset_items_url(&dataset("no2-monthly")).expect("url")
            }
        );
    }

    #[tokio::test]
    async fn unknown_dataset_is_an_error() {
        let mut dash = dashboard(MemoryRecordSource::new());
        let err = dash.select_dataset("nope").await.unwrap_err();
        assert!(matches!(err, DashboardError::Catalog(_)));
        assert!(dash.display().is_empty());
    }

    #[tokio::test]
    async fn reselect_makes_earlier_completion_stale() {
        let mut dash = dashboard(MemoryRecordSource::new());
        let first = dash.begin_select("no2-monthly").expect("first");
        let second = dash.begin_select("no2-monthly").expect("second");

        assert_eq!(
            dash.complete_load(first, Ok(Some(collection(raster_items())))),
            LoadOutcome::Stale
        );
        assert!(dash.manager().overlays_for("no2-monthly").is_none());
        assert!(!dash.display().contains("no2-monthly"));

        assert_eq!(
            dash.complete_load(second, Ok(Some(collection(raster_items())))),
            LoadOutcome::Applied { overlays: 1 }
        );
    }

    #[tokio::test]
    async fn removal_makes_in_flight_completion_stale() {
        let mut dash = dashboard(MemoryRecordSource::new());
        let pending = dash.begin_select("no2-monthly").expect("select");
        dash.remove_layer("no2-monthly");

        let outcome = dash.complete_load(pending, Ok(Some(collection(raster_items()))));
        assert_eq!(outcome, LoadOutcome::Stale);
        assert_eq!(dash.manager().owned_overlay_count("no2-monthly"), 0);
        assert!(!dash.display().contains("no2-monthly"));
    }

    #[tokio::test]
    async fn removing_a_layer_leaves_no_overlays() {
        let mut src = MemoryRecordSource::new();
        src.insert(bulk_url("no2-monthly"), raster_items());
        src.insert(
            urls().record_url("no2-monthly", "no2-2024-01"),
            json!({"id": "no2-2024-01"}),
        );
        let mut dash = dashboard(src);
        dash.select_dataset("no2-monthly").await.expect("select");
        assert!(dash.load_record("no2-monthly", "no2-2024-01").await.is_some());

        assert!(dash.remove_layer("no2-monthly"));
        assert_eq!(dash.manager().owned_overlay_count("no2-monthly"), 0);
        assert!(dash.manager().engine().current_ids().is_empty());
        assert!(dash.display().is_empty());
        assert_eq!(dash.selected_record(), None);
        assert_eq!(dash.gallery().selected(), None);
        assert!(!dash.remove_layer("no2-monthly"));
    }

    #[tokio::test]
    async fn reselect_frames_the_camera_again() {
        let mut src = MemoryRecordSource::new();
        src.insert(bulk_url("public.aqs_gases_metadata"), stations());
        let mut dash = dashboard(src);

        dash.select_dataset("public.aqs_gases_metadata").await.expect("select");
        let overlay_id = dash.manager().flatten()[0].id().to_string();
        assert_eq!(dash.overlay_ready(&overlay_id), Some(FrameOutcome::Fitted));
        assert_eq!(dash.manager().camera().fits.len(), 1);

        dash.select_dataset("public.aqs_gases_metadata").await.expect("reselect");
        assert_eq!(dash.manager().camera().fits.len(), 2);
    }

    #[tokio::test]
    async fn fetch_failure_becomes_error_state() {
        let mut dash = dashboard(MemoryRecordSource::new());
        let outcome = dash.select_dataset("no2-monthly").await.expect("select");
        let LoadOutcome::Failed(message) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert!(message.starts_with("failed to load no2-monthly: HTTP 404"));
        assert_eq!(dash.last_error(), Some(message.as_str()));
        assert!(dash.display().is_empty());
        assert!(dash.manager().managed_ids().is_empty());
    }

    #[tokio::test]
    async fn opacity_change_restyles_and_signals() {
        let mut src = MemoryRecordSource::new();
        src.insert(bulk_url("no2-monthly"), raster_items());
        let mut dash = dashboard(src);
        dash.select_dataset("no2-monthly").await.expect("select");

        assert!(dash.set_opacity("no2-monthly", 40));
        let overlays = dash.manager().overlays_for("no2-monthly").expect("overlays");
        assert!((overlays[0].opacity() - 0.4).abs() < 1e-6);
        assert_eq!(dash.display().get("no2-monthly").map(|e| e.opacity), Some(40));
        assert_eq!(
            dash.signals().events().last().map(|e| e.payload.clone()),
            Some(LayerSignal::Opacity {
                dataset_id: "no2-monthly".to_string(),
                opacity: 40
            })
        );
        assert!(!dash.set_opacity("missing", 10));
    }

    #[tokio::test]
    async fn reselect_keeps_opacity() {
        let mut src = MemoryRecordSource::new();
        src.insert(bulk_url("no2-monthly"), raster_items());
        let mut dash = dashboard(src);
        dash.select_dataset("no2-monthly").await.expect("select");
        dash.set_opacity("no2-monthly", 25);
        dash.select_dataset("no2-monthly").await.expect("reselect");

        assert_eq!(dash.display().len(), 1);
        let overlays = dash.manager().overlays_for("no2-monthly").expect("overlays");
        assert!((overlays[0].opacity() - 0.25).abs() < 1e-6);
    }

    #[tokio::test]
    async fn station_click_fills_chart() {
        let mut src = MemoryRecordSource::new();
        src.insert(bulk_url("public.aqs_gases_metadata"), stations());
        src.insert(urls().station_observations_url("060371103"), observations());
        let mut dash = dashboard(src);
        dash.select_dataset("public.aqs_gases_metadata")
            .await
            .expect("select");

        let overlay_id = dash.manager().flatten()[0].id().to_string();
        let report = dash
            .click(&PickInfo::new(overlay_id).object(0))
            .await
            .expect("report");
        assert!(matches!(report, ClickReport::Station { .. }));

        let chart = dash.chart();
        assert!(chart.visible);
        assert!(!chart.loading);
        assert_eq!(chart.error, None);
        assert_eq!(chart.series.values, vec![10.0, 12.5]);
        assert_eq!(chart.series.labels, vec!["Jan 1, 2024", "Jan 2, 2024"]);
        assert_eq!(chart.series.parameter.as_deref(), Some("no2"));

        dash.hide_chart();
        assert!(!dash.chart().visible);
    }

    #[tokio::test]
    async fn station_fetch_failure_shows_empty_chart() {
        let mut src = MemoryRecordSource::new();
        src.insert(bulk_url("public.aqs_gases_metadata"), stations());
        let mut dash = dashboard(src);
        dash.select_dataset("public.aqs_gases_metadata")
            .await
            .expect("select");

        let overlay_id = dash.manager().flatten()[0].id().to_string();
        dash.click(&PickInfo::new(overlay_id).object(0)).await;
        let chart = dash.chart();
        assert!(chart.series.is_empty());
        assert!(chart.error.as_deref().is_some_and(|e| e.contains("HTTP 404")));
    }

    #[tokio::test]
    async fn point_cloud_activates_without_fetch_and_centres_on_manifest() {
        let mut src = MemoryRecordSource::new();
        let tileset = dataset("lidar-sandia").source_url.expect("tileset url");
        src.insert(
            tileset,
            json!({"asset": {"version": "1.0"}, "root": {
                "boundingVolume": {"region": [
                    -1.8560, 0.6136, -1.8550, 0.6146, 1500.0, 2000.0
                ]},
                "geometricError": 10.0
            }}),
        );
        let mut dash = dashboard(src);

        let outcome = dash.select_dataset("lidar-sandia").await.expect("select");
        assert_eq!(outcome, LoadOutcome::Applied { overlays: 1 });
        assert_eq!(dash.manager().managed_ids(), vec!["lidar-sandia"]);

        let overlay_id = dash.manager().flatten()[0].id().to_string();
        let center = dash.tileset_ready(&overlay_id).await.expect("center");
        assert!((center[0] - (-1.8555f64).to_degrees()).abs() < 1e-9);
        assert_eq!(dash.manager().camera().flights.len(), 1);
    }

    #[tokio::test]
    async fn plugin_activates_point_cloud_for_untyped_tileset() {
        let store = InMemoryCatalogStore::from_descriptors([DatasetDescriptor::new(
            "city-mesh",
            "City mesh",
            VisualizationType::Unknown,
            "Lidar",
        )
        .with_source_url("https://tiles.test/downtown/tileset.json")]);
        let mut dash = Dashboard::new(
            MemoryRecordSource::new(),
            RecordingEngine::default(),
            RecordingCamera::default(),
            store,
            &DashboardConfig::default(),
        );

        let outcome = dash.select_dataset("city-mesh").await.expect("select");
        assert_eq!(outcome, LoadOutcome::Unsupported);
        assert_eq!(dash.manager().managed_ids(), vec!["downtown"]);
        assert!(dash.display().contains("downtown"));

        dash.remove_layer("downtown");
        assert_eq!(dash.manager().owned_overlay_count("downtown"), 0);
    }

    #[tokio::test]
    async fn record_failure_clears_selection() {
        let mut src = MemoryRecordSource::new();
        src.insert(urls().record_url("no2-monthly", "a"), json!({"id": "a"}));
        let mut dash = dashboard(src);

        let record = dash.load_record("no2-monthly", "a").await.expect("record");
        assert_eq!(record.body, json!({"id": "a"}));
        assert!(dash.load_record("no2-monthly", "b").await.is_none());
        assert_eq!(dash.selected_record(), None);
    }

    #[tokio::test]
    async fn move_layer_only_reorders_display_list() {
        let mut src = MemoryRecordSource::new();
        src.insert(bulk_url("no2-monthly"), raster_items());
        src.insert(bulk_url("public.aqs_gases_metadata"), stations());
        let mut dash = dashboard(src);
        dash.select_dataset("no2-monthly").await.expect("raster");
        dash.select_dataset("public.aqs_gases_metadata")
            .await
            .expect("stations");

        assert!(dash.move_layer(1, 0));
        let order: Vec<&str> = dash
            .display()
            .entries()
            .iter()
            .map(|e| e.dataset_id.as_str())
            .collect();
        assert_eq!(order, vec!["public.aqs_gases_metadata", "no2-monthly"]);
        assert_eq!(
            dash.manager().managed_ids(),
            vec!["no2-monthly", "public.aqs_gases_metadata"]
        );
        assert!(!dash.move_layer(5, 0));
    }

    #[test]
    fn builtin_plugin_is_loaded() {
        let dash = dashboard(MemoryRecordSource::new());
        assert_eq!(dash.plugin_status(), vec!["pointcloud plugin is active."]);
    }
}
