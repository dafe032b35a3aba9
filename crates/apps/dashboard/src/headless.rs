//! Engine and camera stand-ins for running the dashboard without a map.

use std::sync::Arc;

use foundation::GeoBounds;
use layers::{Camera, CameraError, FitOptions, FlyTo, Overlay, RenderEngine};
use tracing::info;

/// Logs every overlay list and remembers the ids it has already seen, so the
/// caller can report newly registered overlays as ready.
#[derive(Debug, Default)]
pub struct LoggingEngine {
    current: Vec<Arc<Overlay>>,
    announced: Vec<String>,
}

impl LoggingEngine {
    pub fn current(&self) -> &[Arc<Overlay>] {
        &self.current
    }

    /// Ids that appeared since the last call.
    pub fn take_new_ids(&mut self) -> Vec<String> {
        let fresh: Vec<String> = self
            .current
            .iter()
            .map(|o| o.id().to_string())
            .filter(|id| !self.announced.contains(id))
            .collect();
        self.announced.extend(fresh.iter().cloned());
        fresh
    }
}

impl RenderEngine for LoggingEngine {
    fn set_overlays(&mut self, overlays: &[Arc<Overlay>]) {
        let ids: Vec<&str> = overlays.iter().map(|o| o.id()).collect();
        info!(count = overlays.len(), ?ids, "overlays updated");
        self.current = overlays.to_vec();
        self.announced.retain(|id| ids.contains(&id.as_str()));
    }
}

#[derive(Debug, Default)]
pub struct LoggingCamera {
    pub last: Option<String>,
}

impl Camera for LoggingCamera {
    fn fly_to(&mut self, target: FlyTo) {
        info!(
            lng = target.center[0],
            lat = target.center[1],
            zoom = target.zoom,
            pitch = target.pitch,
            "camera fly_to"
        );
        self.last = Some(format!(
            "fly_to [{:.4}, {:.4}] z{}",
            target.center[0], target.center[1], target.zoom
        ));
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, options: FitOptions) -> Result<(), CameraError> {
        info!(
            min_lng = bounds.min_lng,
            min_lat = bounds.min_lat,
            max_lng = bounds.max_lng,
            max_lat = bounds.max_lat,
            padding = options.padding_px,
            "camera fit_bounds"
        );
        self.last = Some(format!(
            "fit [{:.4}, {:.4}, {:.4}, {:.4}]",
            bounds.min_lng, bounds.min_lat, bounds.max_lng, bounds.max_lat
        ));
        Ok(())
    }
}
