//=========================================================================
// Test Doubles
//=========================================================================
//
// In-memory stand-ins for the native engine and the host anchor element.
//
// `MockEngine` records every boundary call as a string in a shared call
// log ("apply_theme:winter", "set_camera_view", ...), so tests can assert
// both that a call happened and where it landed relative to others.
//
//=========================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crossbeam_channel::Sender;

use crate::controller::FrameHooks;
use crate::core::boundary::{
    CameraEvent, CameraView, EngineApi, EnginePointer, IndoorEvent, PolygonId, PolygonSpec,
    ResizeCanvas, ScreenPoint,
};
use crate::core::config::{LatLng, StartupArgs};
use crate::core::error::BoundaryError;
use crate::core::surface::ContainerElement;

//=== MockEngine ==========================================================

pub(crate) struct MockEngine {
    calls: Rc<RefCell<Vec<String>>>,
    /// When `false`, the camera control surface is missing.
    pub camera_surface: Cell<bool>,
    /// When `false`, the resize entry point never resolves.
    pub exports_resize: Cell<bool>,
    /// When `false`, per-frame hook registration is rejected.
    pub accepts_hooks: Cell<bool>,
    resizes: Rc<RefCell<Vec<(u32, u32)>>>,
    canvas: RefCell<Option<String>>,
    argv: RefCell<Option<Vec<String>>>,
    pointer: Cell<Option<EnginePointer>>,
    hooks: RefCell<Option<FrameHooks>>,
    camera_sink: RefCell<Option<Sender<CameraEvent>>>,
    indoor_events: RefCell<Vec<IndoorEvent>>,
    next_polygon: Cell<u32>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
            camera_surface: Cell::new(true),
            exports_resize: Cell::new(true),
            accepts_hooks: Cell::new(true),
            resizes: Rc::new(RefCell::new(Vec::new())),
            canvas: RefCell::new(None),
            argv: RefCell::new(None),
            pointer: Cell::new(None),
            hooks: RefCell::new(None),
            camera_sink: RefCell::new(None),
            indoor_events: RefCell::new(Vec::new()),
            next_polygon: Cell::new(0),
        }
    }

    //--- Inspection -------------------------------------------------------

    /// Shared call log; tests may append their own markers to it.
    pub fn call_log(&self) -> Rc<RefCell<Vec<String>>> {
        self.calls.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn calls_matching(&self, prefix: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn resizes(&self) -> Vec<(u32, u32)> {
        self.resizes.borrow().clone()
    }

    pub fn canvas(&self) -> Option<String> {
        self.canvas.borrow().clone()
    }

    pub fn argv(&self) -> Option<Vec<String>> {
        self.argv.borrow().clone()
    }

    pub fn pointer(&self) -> Option<EnginePointer> {
        self.pointer.get()
    }

    /// Hooks registered by the controller, as the engine would hold them.
    pub fn hooks(&self) -> Option<FrameHooks> {
        self.hooks.borrow().clone()
    }

    //--- Stimulus ---------------------------------------------------------

    /// Emits a camera notification on the registered sink, if any.
    pub fn emit_camera(&self, event: CameraEvent) {
        if let Some(sink) = self.camera_sink.borrow().as_ref() {
            let _ = sink.send(event);
        }
    }

    pub fn push_indoor_event(&self, event: IndoorEvent) {
        self.indoor_events.borrow_mut().push(event);
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }
}

impl EngineApi for MockEngine {
    fn bind_canvas(&self, surface_id: &str) {
        self.record(format!("bind_canvas:{}", surface_id));
        *self.canvas.borrow_mut() = Some(surface_id.to_string());
    }

    fn set_startup_arguments(&self, args: &StartupArgs) {
        self.record("set_startup_arguments");
        *self.argv.borrow_mut() = Some(args.to_argv());
    }

    fn on_initialized(&self, pointer: EnginePointer, hooks: FrameHooks) -> Result<(), BoundaryError> {
        if !self.accepts_hooks.get() {
            return Err(BoundaryError::CallbackRegistrationFailed(
                "hook slots unavailable".into(),
            ));
        }
        self.record("on_initialized");
        self.pointer.set(Some(pointer));
        *self.hooks.borrow_mut() = Some(hooks);
        Ok(())
    }

    fn resize_entry_point(&self) -> Option<ResizeCanvas> {
        self.record("resize_entry_point");
        if !self.exports_resize.get() {
            return None;
        }
        let resizes = self.resizes.clone();
        let calls = self.calls.clone();
        Some(Box::new(move |width, height| {
            calls.borrow_mut().push(format!("resize:{}x{}", width, height));
            resizes.borrow_mut().push((width, height));
        }))
    }

    fn set_camera_event_sink(&self, sink: Sender<CameraEvent>) -> Result<(), BoundaryError> {
        if !self.camera_surface.get() {
            return Err(BoundaryError::CameraControlUnavailable);
        }
        self.record("set_camera_event_sink");
        *self.camera_sink.borrow_mut() = Some(sink);
        Ok(())
    }

    fn set_camera_view(&self, _view: CameraView) {
        self.record("set_camera_view");
    }

    fn apply_theme(&self, theme: &str) {
        self.record(format!("apply_theme:{}", theme));
    }

    fn begin_precache(&self, _center: LatLng, _radius_m: f64) {
        self.record("begin_precache");
    }

    fn create_polygon(&self, _polygon: &PolygonSpec) -> PolygonId {
        self.record("create_polygon");
        let id = self.next_polygon.get();
        self.next_polygon.set(id + 1);
        PolygonId(id)
    }

    fn remove_polygon(&self, _id: PolygonId) {
        self.record("remove_polygon");
    }

    fn enter_indoor_map(&self, indoor_map_id: &str) {
        self.record(format!("enter_indoor_map:{}", indoor_map_id));
    }

    fn exit_indoor_map(&self) {
        self.record("exit_indoor_map");
    }

    fn drain_indoor_events(&self) -> Vec<IndoorEvent> {
        self.record("drain_indoor_events");
        std::mem::take(&mut *self.indoor_events.borrow_mut())
    }

    fn project_to_screen(&self, position: LatLng) -> Option<ScreenPoint> {
        self.record("project_to_screen");
        Some(ScreenPoint {
            x: position.lng,
            y: position.lat,
        })
    }
}

//=== MockElement =========================================================

pub(crate) struct MockElement {
    width: Cell<u32>,
    height: Cell<u32>,
}

impl MockElement {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: Cell::new(width),
            height: Cell::new(height),
        }
    }

    /// Simulates a host layout change.
    pub fn set_size(&self, width: u32, height: u32) {
        self.width.set(width);
        self.height.set(height);
    }
}

impl ContainerElement for MockElement {
    fn client_width(&self) -> u32 {
        self.width.get()
    }

    fn client_height(&self) -> u32 {
        self.height.get()
    }
}
