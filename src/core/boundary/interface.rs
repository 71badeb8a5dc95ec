//=========================================================================
// Engine Boundary Interface
//=========================================================================
//
// Contract between the controller and the native rendering/streaming
// engine (events, payloads and the entry points the core consumes).
//
// The engine is addressed through a shared handle. All methods take
// `&self`; implementations own whatever interior state they need, since
// every module and the controller hold a clone of the same handle.
//
// Availability:
//   construction:  bind_canvas, set_startup_arguments
//   on_initialized: on_initialized, resize_entry_point,
//                   set_camera_event_sink
//   after init:     everything else
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use crossbeam_channel::Sender;

//=== Internal Dependencies ===============================================

use crate::controller::FrameHooks;
use crate::core::config::{LatLng, StartupArgs};
use crate::core::error::BoundaryError;

//=== Handles =============================================================

/// Shared handle to the native engine.
pub type EngineHandle = Rc<dyn EngineApi>;

/// Native "resize surface" entry point, resolved after initialization.
pub type ResizeCanvas = Box<dyn FnMut(u32, u32)>;

/// Opaque pointer the engine reports once it is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnginePointer(pub usize);

//=== Payloads ============================================================

/// Camera placement as understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub center: LatLng,
    /// Distance from the interest point, in meters.
    pub distance: f64,
}

/// Camera notifications emitted by the engine's camera control surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraEvent {
    MoveStart,
    Move { center: LatLng, distance: f64 },
    MoveEnd,
}

/// Position of a projected point on the drawable surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// Engine-side identifier of a created polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolygonId(pub u32);

/// Closed polygon outline with an RGBA fill.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonSpec {
    pub outline: Vec<LatLng>,
    pub color: [f32; 4],
}

/// Building entrance reported by the engine's indoor subsystem.
#[derive(Debug, Clone, PartialEq)]
pub struct IndoorEntrance {
    pub indoor_map_id: String,
    pub name: String,
    pub position: LatLng,
}

/// Indoor subsystem notifications, polled by the indoors module.
#[derive(Debug, Clone, PartialEq)]
pub enum IndoorEvent {
    EntranceAdded(IndoorEntrance),
    EntranceRemoved { indoor_map_id: String },
    Entered { indoor_map_id: String },
    Exited,
}

//=== EngineApi ===========================================================

/// Entry points exported by the native engine.
pub trait EngineApi {
    //--- Construction-time setup -----------------------------------------

    /// Assigns the drawable surface to the runtime's canvas slot.
    fn bind_canvas(&self, surface_id: &str);

    /// Hands over the startup argument vector. Called exactly once.
    fn set_startup_arguments(&self, args: &StartupArgs);

    //--- Initialization ---------------------------------------------------

    /// Registers the per-frame hooks the engine drives from now on.
    fn on_initialized(&self, pointer: EnginePointer, hooks: FrameHooks) -> Result<(), BoundaryError>;

    /// Resolves the native resize entry point. `None` until the engine's
    /// export table is live.
    fn resize_entry_point(&self) -> Option<ResizeCanvas>;

    /// Routes camera move notifications into `sink`.
    fn set_camera_event_sink(&self, sink: Sender<CameraEvent>) -> Result<(), BoundaryError>;

    //--- Module capabilities ---------------------------------------------

    fn set_camera_view(&self, view: CameraView);

    fn apply_theme(&self, theme: &str);

    fn begin_precache(&self, center: LatLng, radius_m: f64);

    fn create_polygon(&self, polygon: &PolygonSpec) -> PolygonId;

    fn remove_polygon(&self, id: PolygonId);

    fn enter_indoor_map(&self, indoor_map_id: &str);

    fn exit_indoor_map(&self);

    /// Returns and clears indoor notifications queued since the last call.
    fn drain_indoor_events(&self) -> Vec<IndoorEvent>;

    /// Projects a geographic position onto the surface. `None` when the
    /// point is behind the camera or off the globe.
    fn project_to_screen(&self, position: LatLng) -> Option<ScreenPoint>;
}

//=========================================================================
// Unit Tests
//=========================================================================
