//! Compiled-in map plugins.
//!
//! Plugins observe layer signals and answer with actions for the dashboard
//! to carry out; they never touch the map directly.

use runtime::LayerSignal;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginAction {
    ActivatePointCloud {
        dataset_id: String,
        tileset_url: String,
    },
}

pub trait MapPlugin: Send {
    fn name(&self) -> &str;

    fn on_load(&mut self) {}

    /// Short status line for the plugin panel.
    fn on_render(&self) -> String {
        format!("{} plugin is active.", self.name())
    }

    fn on_signal(&mut self, signal: &LayerSignal) -> Vec<PluginAction>;
}

/// Turns a selected 3D Tiles manifest into a point-cloud activation.
#[derive(Debug, Default)]
pub struct PointCloudPlugin {
    loaded: bool,
}

impl PointCloudPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// `.../sandia/tileset.json?sig=..` -> `sandia`.
    fn dataset_id_for(url: &str) -> Option<String> {
        let path = url.split(['?', '#']).next()?;
        let mut segments = path.trim_end_matches('/').rsplit('/');
        let file = segments.next()?;
        if !file.ends_with(".json") {
            return None;
        }
        let parent = segments.next().filter(|s| !s.is_empty() && !s.contains(':'));
        Some(parent.unwrap_or("pointcloud").to_string())
    }
}

impl MapPlugin for PointCloudPlugin {
    fn name(&self) -> &str {
        "pointcloud"
    }

    fn on_load(&mut self) {
        self.loaded = true;
        info!(plugin = self.name(), "plugin loaded");
    }

    fn on_signal(&mut self, signal: &LayerSignal) -> Vec<PluginAction> {
        let LayerSignal::Selected { url } = signal else {
            return Vec::new();
        };
        match Self::dataset_id_for(url) {
            Some(dataset_id) => vec![PluginAction::ActivatePointCloud {
                dataset_id,
                tileset_url: url.clone(),
            }],
            None => Vec::new(),
        }
    }
}

#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn MapPlugin>>,
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|p| p.name()))
            .finish()
    }
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every plugin shipped in this build.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PointCloudPlugin::new()));
        registry
    }

    pub fn register(&mut self, plugin: Box<dyn MapPlugin>) {
        self.plugins.push(plugin);
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn load_all(&mut self) {
        for p in &mut self.plugins {
            p.on_load();
        }
    }

    pub fn render_all(&self) -> Vec<String> {
        self.plugins.iter().map(|p| p.on_render()).collect()
    }

    /// Delivers `signal` to every plugin in registration order.
    pub fn dispatch(&mut self, signal: &LayerSignal) -> Vec<PluginAction> {
        self.plugins
            .iter_mut()
            .flat_map(|p| p.on_signal(signal))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(url: &str) -> LayerSignal {
        LayerSignal::Selected {
            url: url.to_string(),
        }
    }

    #[test]
    fn tileset_selection_requests_point_cloud() {
        let mut reg = PluginRegistry::builtin();
        reg.load_all();
        let actions = reg.dispatch(&selected("https://tiles.test/lidar/sandia/tileset.json?v=2"));
        assert_eq!(
            actions,
            vec![PluginAction::ActivatePointCloud {
                dataset_id: "sandia".to_string(),
                tileset_url: "https://tiles.test/lidar/sandia/tileset.json?v=2".to_string(),
            }]
        );
    }

    #[test]
    fn items_endpoints_and_opacity_are_ignored() {
        let mut reg = PluginRegistry::builtin();
        assert!(reg
            .dispatch(&selected("https://api.test/features/collections/aqs/items"))
            .is_empty());
        assert!(reg
            .dispatch(&LayerSignal::Opacity {
                dataset_id: "a".to_string(),
                opacity: 10,
            })
            .is_empty());
    }

    #[test]
    fn render_reports_each_plugin() {
        let reg = PluginRegistry::builtin();
        assert_eq!(reg.names(), vec!["pointcloud"]);
        assert_eq!(reg.render_all(), vec!["pointcloud plugin is active.".to_string()]);
    }

    #[test]
    fn load_marks_plugin_loaded() {
        let mut p = PointCloudPlugin::new();
        assert!(!p.is_loaded());
        p.on_load();
        assert!(p.is_loaded());
    }
}
