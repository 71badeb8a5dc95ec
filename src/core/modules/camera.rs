//=========================================================================
// Camera Module
//=========================================================================
//
// Zoom/distance conversion and frame-aligned camera view requests.
//
// View requests made before the engine is ready are held and applied on
// initialization; later requests are applied on the next update tick.
// Only the most recent pending request survives.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::MapModule;
use crate::core::boundary::{CameraView, EngineHandle};
use crate::core::config::LatLng;

/// Camera distance at zoom level 0, in meters.
const ZOOM_ZERO_DISTANCE: f64 = 27_428_700.0;

pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 22.0;

//=== CameraModule ========================================================

pub struct CameraModule {
    engine: EngineHandle,
    ready: bool,
    pending_view: Option<CameraView>,
    last_view: Option<CameraView>,
}

impl CameraModule {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            ready: false,
            pending_view: None,
            last_view: None,
        }
    }

    //--- Conversions ------------------------------------------------------

    /// Camera distance in meters for a zoom level. Each zoom step halves
    /// the distance; levels outside `MIN_ZOOM..=MAX_ZOOM` are clamped.
    pub fn zoom_level_to_distance(zoom: f64) -> f64 {
        ZOOM_ZERO_DISTANCE / 2f64.powf(zoom.clamp(MIN_ZOOM, MAX_ZOOM))
    }

    /// Inverse of [`Self::zoom_level_to_distance`].
    pub fn distance_to_zoom_level(distance: f64) -> f64 {
        let min_distance = Self::zoom_level_to_distance(MAX_ZOOM);
        (ZOOM_ZERO_DISTANCE / distance.max(min_distance))
            .log2()
            .clamp(MIN_ZOOM, MAX_ZOOM)
    }

    //--- Requests ---------------------------------------------------------

    /// Requests the camera to look at `center` from `zoom`.
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.pending_view = Some(CameraView {
            center,
            distance: Self::zoom_level_to_distance(zoom),
        });
    }

    /// Records a camera position reported by the engine.
    pub fn record_view(&mut self, view: CameraView) {
        self.last_view = Some(view);
    }

    pub fn last_view(&self) -> Option<CameraView> {
        self.last_view
    }

    pub fn has_pending_view(&self) -> bool {
        self.pending_view.is_some()
    }

    fn flush(&mut self) {
        if let Some(view) = self.pending_view.take() {
            debug!(
                target: "modules::camera",
                "Applying view {:.5},{:.5} @ {:.1}m",
                view.center.lat, view.center.lng, view.distance
            );
            self.engine.set_camera_view(view);
            self.last_view = Some(view);
        }
    }
}

impl MapModule for CameraModule {
    fn name(&self) -> &'static str {
        "camera"
    }

    fn on_initialized(&mut self) {
        self.ready = true;
        self.flush();
    }

    fn on_update(&mut self, _delta_seconds: f64) {
        if self.ready {
            self.flush();
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
