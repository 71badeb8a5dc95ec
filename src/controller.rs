//=========================================================================
// Map Controller
//
// Entry point and coordinator between the host map UI and the native
// rendering/streaming engine.
//
// Architecture:
// ```text
//     MapController::new()  ──>  [Constructed]  ──on_initialized()──>  [Initialized]
//         │                                           │
//         ├─ merges options                           ├─ resolves resize entry point
//         ├─ builds the six modules                   ├─ binds move relay
//         ├─ binds canvas, hands startup args         ├─ registers FrameHooks
//         └─ builds facade (DOM input live)           └─ module + facade init
//
//     engine tick:  update(dt) ─> draw(dt)      (via FrameHooks)
//     engine state: initial_streaming_completed (once, out of band)
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use winit::dpi::PhysicalSize;

//=== Internal Dependencies ===============================================

use crate::core::boundary::{EngineHandle, EnginePointer, MoveEventRelay};
use crate::core::config::{MapOptions, MapOptionsOverrides, StartupArgs};
use crate::core::error::{BoundaryError, ControllerError, LifecycleViolation};
use crate::core::events::{ListenerId, MapEvents, TransitionNotifier};
use crate::core::facade::{EntranceMarkerUpdater, MapFacade};
use crate::core::modules::{CameraModule, ModuleHandles, ModuleSet};
use crate::core::surface::{resolve_surface_size, ContainerElement, SurfaceContainer};

//=== Module Declarations =================================================

mod dispatcher;
mod hooks;

use dispatcher::{Dispatcher, SharedState};

//=== Public API ==========================================================

pub use hooks::FrameHooks;

//=== MapController =======================================================

/// Lifecycle owner and per-frame dispatcher for one map instance.
///
/// Created fully wired but not yet initialized. The engine completes setup
/// by calling [`MapController::on_initialized`] exactly once, after which
/// it drives the registered [`FrameHooks`] every tick.
///
/// # Dispatch Order
///
/// Every fan-out visits the modules in the same fixed order:
/// screen-point mapping, themes, indoors, precache, camera, polygon.
/// Draw runs all module draws before the facade update.
///
/// # Errors
///
/// Construction fails with a configuration error if the surface has no
/// usable size. Frame operations invoked before initialization, with a
/// negative or non-finite delta, or re-entrantly from inside a dispatch
/// return a [`LifecycleViolation`].
pub struct MapController {
    engine: EngineHandle,
    options: MapOptions,
    startup_args: StartupArgs,
    events: MapEvents,
    transitions: TransitionNotifier,
    modules: ModuleHandles,
    shared: SharedState,
    dispatcher: Rc<RefCell<Dispatcher>>,
}

impl MapController {
    //--- Construction -----------------------------------------------------

    /// Builds a controller for `map_id`, anchored to `element`.
    ///
    /// Binds the drawable surface and hands the startup argument vector to
    /// the engine before returning.
    pub fn new(
        map_id: u32,
        engine: EngineHandle,
        element: Rc<dyn ContainerElement>,
        api_key: impl Into<String>,
        overrides: MapOptionsOverrides,
    ) -> Result<Self, ControllerError> {
        let options = MapOptions::default().merged(overrides);
        options.validate()?;

        let events = MapEvents::new();
        let transitions = TransitionNotifier::new(events.clone());
        let modules = ModuleHandles::new(&engine, transitions.clone());
        let module_set = ModuleSet::new(&modules);

        let size = resolve_surface_size(&options, &*element)?;
        let container = SurfaceContainer::new(element, options.canvas_id.clone(), size);
        engine.bind_canvas(container.surface_id());

        let startup_args = StartupArgs {
            canvas_id: options.canvas_id.clone(),
            map_id,
            size,
            api_key: api_key.into(),
            center: options.center,
            distance: CameraModule::zoom_level_to_distance(options.zoom),
            indoors_enabled: options.indoors_enabled,
        };
        engine.set_startup_arguments(&startup_args);

        let mut facade = MapFacade::new(
            container.overlay().clone(),
            options.clone(),
            modules.clone(),
            events.clone(),
            MoveEventRelay::new(),
        );
        facade.bind_dom_events(&container);

        if options.display_entrance_markers {
            facade.attach_entrance_markers(EntranceMarkerUpdater::new(modules.indoors.clone()));
        }

        info!(
            target: "controller",
            "Map {} constructed on '{}' ({}x{}, zoom {})",
            map_id, options.canvas_id, size.width, size.height, options.zoom
        );

        let shared = SharedState::new(container.initial_size());
        let dispatcher = Dispatcher::new(shared.clone(), module_set, container, facade);

        Ok(Self {
            engine,
            options,
            startup_args,
            events,
            transitions,
            modules,
            shared,
            dispatcher: Rc::new(RefCell::new(dispatcher)),
        })
    }

    //--- Initialization ---------------------------------------------------

    /// Completes setup once the engine reports `pointer` is ready.
    ///
    /// Every fallible engine call runs before anything is committed, and
    /// hook registration is the last of them: a failed attempt leaves the
    /// controller `Constructed` with no hooks handed out, so it can be
    /// retried. Binding the move relay only replaces the engine's camera
    /// sink and is safe to repeat.
    pub fn on_initialized(&self, pointer: EnginePointer) -> Result<(), ControllerError> {
        let mut dispatcher = dispatcher::enter(&self.dispatcher)?;

        if self.shared.is_initialized() {
            return Err(LifecycleViolation::AlreadyInitialized.into());
        }

        let resize = self
            .engine
            .resize_entry_point()
            .ok_or(BoundaryError::ResizeUnavailable)?;

        dispatcher.facade.bind_move_relay(&*self.engine)?;

        let hooks = FrameHooks::new(Rc::downgrade(&self.dispatcher));
        self.engine.on_initialized(pointer, hooks)?;
        debug!(target: "controller", "Frame hooks registered for {:?}", pointer);

        if !dispatcher.container.is_ready() {
            dispatcher.container.on_initialized();
        }
        dispatcher.resize_canvas = Some(resize);

        dispatcher.modules.for_each(|m| m.on_initialized());
        self.shared.mark_initialized();
        dispatcher.facade.on_initialized(self.engine.clone());

        info!(target: "controller", "Map controller initialized");
        Ok(())
    }

    //--- Frame Dispatch ---------------------------------------------------

    /// Syncs the canvas size, then updates every module.
    pub fn on_update(&self, delta_seconds: f64) -> Result<(), LifecycleViolation> {
        dispatcher::enter(&self.dispatcher)?.update(delta_seconds)
    }

    /// Draws every module, then lets the facade apply the frame's results.
    pub fn on_draw(&self, delta_seconds: f64) -> Result<(), LifecycleViolation> {
        dispatcher::enter(&self.dispatcher)?.draw(delta_seconds)
    }

    pub fn on_initial_streaming_completed(&self) -> Result<(), LifecycleViolation> {
        dispatcher::enter(&self.dispatcher)?.initial_streaming_completed()
    }

    //--- Listeners --------------------------------------------------------

    /// Runs `callback` once, when the next camera transition completes.
    pub fn set_indoor_transition_complete_listener<F>(&self, callback: F) -> ListenerId
    where
        F: FnOnce() + 'static,
    {
        self.transitions.on_transition_complete(callback)
    }

    /// Facade event stream; subscribing never conflicts with dispatch.
    pub fn events(&self) -> &MapEvents {
        &self.events
    }

    //--- Accessors --------------------------------------------------------

    /// Runs `f` against the facade outside of any dispatch.
    pub fn with_facade<R>(&self, f: impl FnOnce(&mut MapFacade) -> R) -> Result<R, LifecycleViolation> {
        let mut dispatcher = dispatcher::enter(&self.dispatcher)?;
        Ok(f(&mut dispatcher.facade))
    }

    pub fn modules(&self) -> &ModuleHandles {
        &self.modules
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn startup_args(&self) -> &StartupArgs {
        &self.startup_args
    }

    /// Last canvas size pushed to the engine.
    ///
    /// Readable at any time, including from listeners running mid-dispatch.
    pub fn canvas_size(&self) -> PhysicalSize<u32> {
        self.shared.canvas_size()
    }

    pub fn is_initialized(&self) -> bool {
        self.shared.is_initialized()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::boundary::{CameraEvent, PolygonSpec};
    use crate::core::config::LatLng;
    use crate::core::error::ConfigurationError;
    use crate::core::events::{MapEvent, MapEventKind};
    use crate::core::facade::DomEvent;
    use crate::testing::{MockElement, MockEngine};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    const POINTER: EnginePointer = EnginePointer(0xBEEF);

    struct Harness {
        engine: Rc<MockEngine>,
        element: Rc<MockElement>,
        controller: MapController,
    }

    fn build(overrides: MapOptionsOverrides) -> Harness {
        let engine = Rc::new(MockEngine::new());
        let element = Rc::new(MockElement::new(800, 600));
        let controller =
            MapController::new(1, engine.clone(), element.clone(), "X", overrides).unwrap();
        Harness {
            engine,
            element,
            controller,
        }
    }

    fn initialized() -> Harness {
        let harness = build(MapOptionsOverrides::default());
        harness.controller.on_initialized(POINTER).unwrap();
        harness
    }

    fn triangle() -> PolygonSpec {
        PolygonSpec {
            outline: vec![
                LatLng::new(0.0, 0.0),
                LatLng::new(0.0, 1.0),
                LatLng::new(1.0, 0.0),
            ],
            color: [0.0, 0.0, 1.0, 1.0],
        }
    }

    //--- Construction -----------------------------------------------------

    #[test]
    fn startup_arguments_follow_wire_order() {
        let harness = build(MapOptionsOverrides {
            center: Some(LatLng::new(10.0, 20.0)),
            zoom: Some(14.0),
            indoors_enabled: Some(true),
            ..Default::default()
        });

        let distance = CameraModule::zoom_level_to_distance(14.0).to_string();
        assert_eq!(
            harness.engine.argv().unwrap(),
            vec!["canvas", "1", "800", "600", "X", "10", "20", distance.as_str(), "1"]
        );
        assert_eq!(harness.engine.canvas().as_deref(), Some("canvas"));
    }

    #[test]
    fn defaults_fill_unspecified_options() {
        let harness = build(MapOptionsOverrides {
            zoom_control: Some(true),
            ..Default::default()
        });
        let options = harness.controller.options();

        assert_eq!(options.canvas_id, "canvas");
        assert!(!options.indoors_enabled);
        assert!(options.display_entrance_markers);
        assert!(options.zoom_control);

        let argv = harness.engine.argv().unwrap();
        assert_eq!(argv[5], "37.7858");
        assert_eq!(argv[6], "-122.401");
        assert_eq!(argv[8], "0");
    }

    #[test]
    fn zero_sized_container_fails_construction() {
        let engine = Rc::new(MockEngine::new());
        let element = Rc::new(MockElement::new(0, 0));

        let result = MapController::new(1, engine.clone(), element, "X", MapOptionsOverrides::default());

        assert!(matches!(
            result,
            Err(ControllerError::Configuration(
                ConfigurationError::UnresolvableSurfaceSize { .. }
            ))
        ));
        assert!(engine.argv().is_none());
    }

    #[test]
    fn explicit_size_rescues_collapsed_container() {
        let engine = Rc::new(MockEngine::new());
        let element = Rc::new(MockElement::new(0, 0));
        let overrides = MapOptionsOverrides {
            width: Some(640),
            height: Some(480),
            ..Default::default()
        };

        let controller = MapController::new(7, engine.clone(), element, "X", overrides).unwrap();

        assert_eq!(controller.startup_args().size, PhysicalSize::new(640, 480));
        assert_eq!(engine.argv().unwrap()[1..4].to_vec(), vec!["7", "640", "480"]);
    }

    #[test]
    fn dom_events_are_live_before_engine_ready() {
        let harness = build(MapOptionsOverrides::default());
        let clicks = Rc::new(Cell::new(0));
        let sink = clicks.clone();
        harness
            .controller
            .events()
            .on(MapEventKind::Click, move |_| sink.set(sink.get() + 1));

        let handled = harness
            .controller
            .with_facade(|f| f.handle_dom_event(DomEvent::Click { x: 1.0, y: 2.0 }))
            .unwrap();

        assert!(handled);
        assert_eq!(clicks.get(), 1);
        assert!(!harness.controller.is_initialized());
    }

    //--- Initialization ---------------------------------------------------

    #[test]
    fn initialization_registers_hooks_and_fires_initialized() {
        let Harness { engine, controller, .. } = build(MapOptionsOverrides::default());
        let controller = Rc::new(controller);
        let ready = Rc::new(Cell::new(None));
        let sink = ready.clone();
        let observed = Rc::downgrade(&controller);
        controller.events().on(MapEventKind::Initialized, move |_| {
            sink.set(observed.upgrade().map(|c| c.is_initialized()));
        });

        controller.on_initialized(POINTER).unwrap();

        assert!(controller.is_initialized());
        assert_eq!(engine.pointer(), Some(POINTER));
        assert!(engine.hooks().is_some_and(|h| h.is_live()));
        assert_eq!(ready.get(), Some(true));
        assert!(controller.with_facade(|f| f.is_initialized()).unwrap());
    }

    #[test]
    fn modules_flush_early_requests_on_init_in_order() {
        let harness = build(MapOptionsOverrides::default());
        let modules = harness.controller.modules();
        modules.themes.borrow_mut().set_theme("winter");
        modules.indoors.borrow_mut().enter_indoor_map("westport");
        modules.camera.borrow_mut().set_view(LatLng::new(1.0, 2.0), 15.0);
        modules.polygon.borrow_mut().add_polygon(triangle());
        harness.engine.clear_calls();

        harness.controller.on_initialized(POINTER).unwrap();

        assert_eq!(
            harness.engine.calls(),
            vec![
                "resize_entry_point",
                "set_camera_event_sink",
                "on_initialized",
                "apply_theme:winter",
                "enter_indoor_map:westport",
                "set_camera_view",
                "create_polygon",
            ]
        );
    }

    #[test]
    fn second_initialization_is_rejected_without_side_effects() {
        let harness = initialized();
        harness.engine.clear_calls();

        let err = harness.controller.on_initialized(POINTER).unwrap_err();

        assert_eq!(err.as_lifecycle(), Some(&LifecycleViolation::AlreadyInitialized));
        assert!(harness.engine.calls().is_empty());
    }

    #[test]
    fn missing_resize_export_is_boundary_error() {
        let harness = build(MapOptionsOverrides::default());
        harness.engine.exports_resize.set(false);

        let err = harness.controller.on_initialized(POINTER).unwrap_err();

        assert!(matches!(err, ControllerError::Boundary(BoundaryError::ResizeUnavailable)));
        assert!(!harness.controller.is_initialized());
        assert!(harness.engine.hooks().is_none());

        harness.engine.exports_resize.set(true);
        harness.controller.on_initialized(POINTER).unwrap();
        assert!(harness.controller.is_initialized());
    }

    #[test]
    fn rejected_hook_registration_is_boundary_error() {
        let harness = build(MapOptionsOverrides::default());
        harness.engine.accepts_hooks.set(false);

        let err = harness.controller.on_initialized(POINTER).unwrap_err();

        assert!(matches!(
            err,
            ControllerError::Boundary(BoundaryError::CallbackRegistrationFailed(_))
        ));
        assert!(!harness.controller.is_initialized());
    }

    #[test]
    fn missing_camera_surface_leaves_hooks_unregistered() {
        let harness = build(MapOptionsOverrides::default());
        harness.engine.camera_surface.set(false);

        let err = harness.controller.on_initialized(POINTER).unwrap_err();

        assert!(matches!(
            err,
            ControllerError::Boundary(BoundaryError::CameraControlUnavailable)
        ));
        assert!(!harness.controller.is_initialized());
        assert!(harness.engine.hooks().is_none());
        assert!(harness.engine.calls_matching("on_initialized").is_empty());

        harness.engine.camera_surface.set(true);
        harness.controller.on_initialized(POINTER).unwrap();

        assert!(harness.controller.is_initialized());
        assert_eq!(harness.engine.calls_matching("on_initialized").len(), 1);
        assert!(harness.engine.hooks().is_some_and(|h| h.is_live()));
    }

    //--- Frame Dispatch ---------------------------------------------------

    #[test]
    fn dispatch_before_init_is_lifecycle_violation() {
        let harness = build(MapOptionsOverrides::default());

        assert_eq!(
            harness.controller.on_update(0.016),
            Err(LifecycleViolation::NotInitialized { operation: "on_update" })
        );
        assert_eq!(
            harness.controller.on_draw(0.016),
            Err(LifecycleViolation::NotInitialized { operation: "on_draw" })
        );
        assert_eq!(
            harness.controller.on_initial_streaming_completed(),
            Err(LifecycleViolation::NotInitialized {
                operation: "on_initial_streaming_completed"
            })
        );
    }

    #[test]
    fn invalid_delta_is_rejected() {
        let harness = initialized();

        assert_eq!(
            harness.controller.on_update(-1.0),
            Err(LifecycleViolation::InvalidDelta(-1.0))
        );
        assert!(harness.controller.on_draw(f64::NAN).is_err());
    }

    #[test]
    fn resize_is_pushed_once_per_change() {
        let harness = initialized();

        harness.controller.on_update(0.016).unwrap();
        assert!(harness.engine.resizes().is_empty());

        harness.element.set_size(1024, 768);
        harness.controller.on_update(0.016).unwrap();
        harness.controller.on_update(0.016).unwrap();
        harness.controller.on_update(0.016).unwrap();

        assert_eq!(harness.engine.resizes(), vec![(1024, 768)]);
        assert_eq!(harness.controller.canvas_size(), PhysicalSize::new(1024, 768));
    }

    #[test]
    fn collapsed_container_does_not_resize() {
        let harness = initialized();

        harness.element.set_size(0, 768);
        harness.controller.on_update(0.016).unwrap();

        assert!(harness.engine.resizes().is_empty());
        assert_eq!(harness.controller.canvas_size(), PhysicalSize::new(800, 600));
    }

    #[test]
    fn update_resizes_before_module_fan_out() {
        let harness = initialized();
        let modules = harness.controller.modules();
        modules.camera.borrow_mut().set_view(LatLng::new(1.0, 2.0), 10.0);
        modules.polygon.borrow_mut().add_polygon(triangle());
        modules.screen_point_mapping.borrow_mut().add_mapping(LatLng::new(3.0, 4.0));
        harness.element.set_size(1024, 768);
        harness.engine.clear_calls();

        harness.controller.on_update(0.016).unwrap();

        assert_eq!(
            harness.engine.calls(),
            vec![
                "resize:1024x768",
                "drain_indoor_events",
                "set_camera_view",
                "create_polygon",
            ]
        );
    }

    #[test]
    fn draw_runs_modules_before_facade_update() {
        let harness = initialized();
        harness
            .controller
            .modules()
            .screen_point_mapping
            .borrow_mut()
            .add_mapping(LatLng::new(3.0, 4.0));

        let log = harness.engine.call_log();
        harness.controller.events().on(MapEventKind::Move, move |_| {
            log.borrow_mut().push("facade:move".into());
        });

        harness.engine.emit_camera(CameraEvent::Move {
            center: LatLng::new(5.0, 6.0),
            distance: CameraModule::zoom_level_to_distance(11.0),
        });
        harness.engine.clear_calls();

        harness.controller.on_draw(0.016).unwrap();

        assert_eq!(harness.engine.calls(), vec!["project_to_screen", "facade:move"]);
        let view = harness.controller.with_facade(|f| f.view()).unwrap();
        assert_eq!(view.center, LatLng::new(5.0, 6.0));
        assert!((view.zoom - 11.0).abs() < 1e-9);
    }

    #[test]
    fn streaming_completion_releases_precache() {
        let harness = initialized();
        harness
            .controller
            .modules()
            .precache
            .borrow_mut()
            .precache(LatLng::new(1.0, 1.0), 2000.0);
        assert!(harness.engine.calls_matching("begin_precache").is_empty());

        harness.controller.on_initial_streaming_completed().unwrap();

        assert_eq!(harness.engine.calls_matching("begin_precache").len(), 1);
    }

    //--- Hooks ------------------------------------------------------------

    #[test]
    fn engine_drives_frames_through_registered_hooks() {
        let harness = initialized();
        let hooks = harness.engine.hooks().unwrap();

        harness.element.set_size(1024, 768);
        hooks.update(0.016).unwrap();
        hooks.draw(0.016).unwrap();
        hooks.initial_streaming_completed().unwrap();

        assert_eq!(harness.engine.resizes(), vec![(1024, 768)]);
    }

    #[test]
    fn hooks_outliving_controller_report_drop() {
        let Harness {
            engine, controller, ..
        } = initialized();
        let hooks = engine.hooks().unwrap();

        drop(controller);

        assert!(!hooks.is_live());
        assert_eq!(hooks.update(0.016), Err(LifecycleViolation::ControllerDropped));
    }

    #[test]
    fn dispatch_from_facade_listener_is_reentrant() {
        let harness = initialized();
        let hooks = harness.engine.hooks().unwrap();
        let outcome = Rc::new(RefCell::new(None));
        let sink = outcome.clone();
        harness.controller.events().on(MapEventKind::MoveStart, move |_| {
            *sink.borrow_mut() = Some(hooks.update(0.0));
        });

        harness.engine.emit_camera(CameraEvent::MoveStart);
        harness.controller.on_draw(0.016).unwrap();

        assert_eq!(
            *outcome.borrow(),
            Some(Err(LifecycleViolation::ReentrantDispatch))
        );
    }

    #[test]
    fn state_is_readable_from_listeners_mid_dispatch() {
        let Harness { controller, .. } = build(MapOptionsOverrides::default());
        let controller = Rc::new(controller);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let observed = Rc::downgrade(&controller);
        controller.events().on(MapEventKind::Click, move |_| {
            if let Some(c) = observed.upgrade() {
                sink.borrow_mut().push((c.is_initialized(), c.canvas_size()));
            }
        });
        let click = || DomEvent::Click { x: 4.0, y: 4.0 };

        controller.with_facade(|f| f.handle_dom_event(click())).unwrap();
        controller.on_initialized(POINTER).unwrap();
        controller.with_facade(|f| f.handle_dom_event(click())).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                (false, PhysicalSize::new(800, 600)),
                (true, PhysicalSize::new(800, 600)),
            ]
        );
    }

    //--- Listeners --------------------------------------------------------

    #[test]
    fn transition_listener_fires_exactly_once() {
        let harness = initialized();
        let count = Rc::new(Cell::new(0));
        let sink = count.clone();
        harness
            .controller
            .set_indoor_transition_complete_listener(move || sink.set(sink.get() + 1));

        harness.engine.emit_camera(CameraEvent::MoveStart);
        harness.controller.on_draw(0.016).unwrap();
        assert_eq!(count.get(), 0);

        harness.engine.emit_camera(CameraEvent::MoveEnd);
        harness.controller.on_draw(0.016).unwrap();
        harness.engine.emit_camera(CameraEvent::MoveEnd);
        harness.controller.on_draw(0.016).unwrap();

        assert_eq!(count.get(), 1);
        assert_eq!(harness.controller.events().listener_count(MapEventKind::MoveEnd), 0);
    }

    #[test]
    fn indoor_entry_is_announced_after_transition() {
        let harness = initialized();
        let entered = Rc::new(RefCell::new(Vec::new()));
        let sink = entered.clone();
        harness
            .controller
            .events()
            .on(MapEventKind::IndoorMapEntered, move |e| sink.borrow_mut().push(e.clone()));

        harness.engine.push_indoor_event(crate::core::boundary::IndoorEvent::Entered {
            indoor_map_id: "westport".into(),
        });
        harness.controller.on_update(0.016).unwrap();
        harness.controller.on_draw(0.016).unwrap();
        assert!(entered.borrow().is_empty());

        harness.engine.emit_camera(CameraEvent::MoveEnd);
        harness.controller.on_draw(0.016).unwrap();

        assert_eq!(
            *entered.borrow(),
            vec![MapEvent::IndoorMapEntered {
                indoor_map_id: "westport".into()
            }]
        );
    }
}
