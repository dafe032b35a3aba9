//! Camera framing policy.
//!
//! The camera itself belongs to the host map; this module decides where to
//! send it. Commands are fire-and-forget and the last one issued wins.

use foundation::GeoBounds;
use serde::Serialize;
use tracing::warn;

/// Default world view used when bounds are global or meaningless.
pub const WORLD_CENTER: [f64; 2] = [0.0, 30.0];
pub const WORLD_ZOOM: f64 = 2.0;
/// Zoom used when a fit fails and the camera flies to the bounds centroid.
pub const CENTROID_FALLBACK_ZOOM: f64 = 10.0;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct FlyTo {
    pub center: [f64; 2],
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    pub duration_ms: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct FitOptions {
    pub padding_px: u32,
    pub max_zoom: f64,
    pub duration_ms: u32,
    pub pitch: f64,
    pub bearing: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding_px: 50,
            max_zoom: 18.0,
            duration_ms: 2000,
            pitch: 0.0,
            bearing: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraError {
    pub message: String,
}

impl CameraError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CameraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "camera error: {}", self.message)
    }
}

impl std::error::Error for CameraError {}

pub trait Camera {
    fn fly_to(&mut self, target: FlyTo);
    fn fit_bounds(&mut self, bounds: GeoBounds, options: FitOptions) -> Result<(), CameraError>;
}

/// Which framing path `frame_to_bounds` took.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FrameOutcome {
    WorldView,
    Fitted,
    CentroidFallback,
}

/// Frames `bounds`, falling back to the world view for global extents and to
/// a centroid fly-to when the camera rejects the fit.
pub fn frame_to_bounds<C: Camera + ?Sized>(
    camera: &mut C,
    bounds: GeoBounds,
    options: FitOptions,
) -> FrameOutcome {
    if bounds.is_global_extent() {
        camera.fly_to(FlyTo {
            center: WORLD_CENTER,
            zoom: WORLD_ZOOM,
            pitch: options.pitch,
            bearing: options.bearing,
            duration_ms: options.duration_ms,
        });
        return FrameOutcome::WorldView;
    }
    match camera.fit_bounds(bounds, options) {
        Ok(()) => FrameOutcome::Fitted,
        Err(err) => {
            warn!(%err, "fit_bounds failed, flying to centroid");
            camera.fly_to(FlyTo {
                center: bounds.center(),
                zoom: CENTROID_FALLBACK_ZOOM,
                pitch: options.pitch,
                bearing: options.bearing,
                duration_ms: options.duration_ms,
            });
            FrameOutcome::CentroidFallback
        }
    }
}

/// Records every command; `fail_fits` makes `fit_bounds` reject.
#[derive(Debug, Default)]
pub struct RecordingCamera {
    pub flights: Vec<FlyTo>,
    pub fits: Vec<(GeoBounds, FitOptions)>,
    pub fail_fits: bool,
}

impl Camera for RecordingCamera {
    fn fly_to(&mut self, target: FlyTo) {
        self.flights.push(target);
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, options: FitOptions) -> Result<(), CameraError> {
        if self.fail_fits {
            return Err(CameraError::new("viewport too small"));
        }
        self.fits.push((bounds, options));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_extent_flies_to_world_view() {
        let mut cam = RecordingCamera::default();
        let out = frame_to_bounds(
            &mut cam,
            GeoBounds::new(-180.0, -60.0, 180.0, 60.0),
            FitOptions::default(),
        );
        assert_eq!(out, FrameOutcome::WorldView);
        assert!(cam.fits.is_empty());
        assert_eq!(cam.flights[0].center, [0.0, 30.0]);
        assert_eq!(cam.flights[0].zoom, 2.0);
    }

    #[test]
    fn tall_extent_is_also_global() {
        let mut cam = RecordingCamera::default();
        let out = frame_to_bounds(
            &mut cam,
            GeoBounds::new(0.0, -80.0, 10.0, 80.0),
            FitOptions::default(),
        );
        assert_eq!(out, FrameOutcome::WorldView);
    }

    #[test]
    fn near_world_longitude_span_is_global() {
        let mut cam = RecordingCamera::default();
        let out = frame_to_bounds(
            &mut cam,
            GeoBounds::new(-175.0, -10.0, 175.0, 10.0),
            FitOptions::default(),
        );
        assert_eq!(out, FrameOutcome::WorldView);
        assert!(cam.fits.is_empty());
    }

    #[test]
    fn longitude_span_of_exactly_300_is_fitted() {
        let mut cam = RecordingCamera::default();
        let b = GeoBounds::new(-150.0, -10.0, 150.0, 10.0);
        let out = frame_to_bounds(&mut cam, b, FitOptions::default());
        assert_eq!(out, FrameOutcome::Fitted);
        assert_eq!(cam.fits.len(), 1);
    }

    #[test]
    fn regional_extent_is_fitted() {
        let mut cam = RecordingCamera::default();
        let b = GeoBounds::new(-125.0, 24.0, -66.0, 49.0);
        let out = frame_to_bounds(&mut cam, b, FitOptions::default());
        assert_eq!(out, FrameOutcome::Fitted);
        assert_eq!(cam.fits, vec![(b, FitOptions::default())]);
        assert!(cam.flights.is_empty());
    }

    #[test]
    fn fit_failure_falls_back_to_centroid() {
        let mut cam = RecordingCamera {
            fail_fits: true,
            ..RecordingCamera::default()
        };
        let out = frame_to_bounds(
            &mut cam,
            GeoBounds::new(10.0, 20.0, 12.0, 24.0),
            FitOptions::default(),
        );
        assert_eq!(out, FrameOutcome::CentroidFallback);
        assert_eq!(cam.flights[0].center, [11.0, 22.0]);
        assert_eq!(cam.flights[0].zoom, 10.0);
    }
}
