//=========================================================================
// Map Facade
//=========================================================================
//
// User-facing map object. Composes the feature modules, forwards surface
// input as map events and reflects engine camera movement back into its
// own view state.
//
// Lifecycle:
//   new() ─> bind_dom_events()    (construction, before engine ready)
//         ─> bind_move_relay()    (controller initialization)
//         ─> on_initialized()     (controller initialization, last step)
//         ─> update()             (every draw tick, after module draw)
//
// Surface input is live from `bind_dom_events()` onward, so pointer
// events reach listeners even before the engine reports ready.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;

use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::boundary::{
    CameraEvent, CameraView, EngineApi, EngineHandle, MoveEventRelay, ScreenPoint,
};
use crate::core::config::{LatLng, MapOptions};
use crate::core::error::BoundaryError;
use crate::core::events::{ListenerId, MapEvent, MapEventKind, MapEvents};
use crate::core::modules::{CameraModule, ModuleHandles, MAX_ZOOM, MIN_ZOOM};
use crate::core::surface::{Overlay, SurfaceContainer};

//=== Module Declarations =================================================

mod entrance_markers;

pub use entrance_markers::EntranceMarkerUpdater;

//=== Markers =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Entrance,
    Custom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: String,
    pub position: LatLng,
    pub label: String,
    pub kind: MarkerKind,
}

/// Markers shown on the facade's overlay, keyed by id.
#[derive(Debug, Default)]
pub struct MarkerLayer {
    markers: BTreeMap<String, Marker>,
}

impl MarkerLayer {
    /// Inserts or replaces a marker.
    pub fn insert(&mut self, marker: Marker) {
        self.markers.insert(marker.id.clone(), marker);
    }

    pub fn remove(&mut self, id: &str) -> Option<Marker> {
        self.markers.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Marker> {
        self.markers.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

//=== Surface Input =======================================================

/// Pointer input delivered by the host for the drawable surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DomEvent {
    Click { x: f64, y: f64 },
    DoubleClick { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    /// Positive `delta_y` scrolls away (zoom out).
    Wheel { delta_y: f64 },
}

//=== MapView =============================================================

/// The facade's view of where the camera is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: f64,
}

//=== MapFacade ===========================================================

pub struct MapFacade {
    overlay: Overlay,
    options: MapOptions,
    events: MapEvents,
    modules: ModuleHandles,
    move_relay: MoveEventRelay,
    entrance_markers: Option<EntranceMarkerUpdater>,
    markers: MarkerLayer,
    view: MapView,
    dom_surface: Option<String>,
    engine: Option<EngineHandle>,
}

impl MapFacade {
    //--- Construction -----------------------------------------------------

    pub fn new(
        overlay: Overlay,
        options: MapOptions,
        modules: ModuleHandles,
        events: MapEvents,
        move_relay: MoveEventRelay,
    ) -> Self {
        let view = MapView {
            center: options.center,
            zoom: options.zoom,
        };

        Self {
            overlay,
            options,
            events,
            modules,
            move_relay,
            entrance_markers: None,
            markers: MarkerLayer::default(),
            view,
            dom_surface: None,
            engine: None,
        }
    }

    /// Starts forwarding input from `container`'s drawable surface.
    pub fn bind_dom_events(&mut self, container: &SurfaceContainer) {
        debug!(target: "facade", "Surface input bound to '{}'", container.surface_id());
        self.dom_surface = Some(container.surface_id().to_string());
    }

    pub fn attach_entrance_markers(&mut self, updater: EntranceMarkerUpdater) {
        self.entrance_markers = Some(updater);
    }

    /// Connects the move relay to the engine camera surface.
    pub fn bind_move_relay(&mut self, engine: &dyn EngineApi) -> Result<(), BoundaryError> {
        self.move_relay.bind(engine)
    }

    /// Completes facade setup once the engine is live.
    pub fn on_initialized(&mut self, engine: EngineHandle) {
        self.engine = Some(engine);
        info!(target: "facade", "Map facade initialized");
        self.events.fire(&MapEvent::Initialized);
    }

    //--- Frame ------------------------------------------------------------

    /// Applies state accumulated since the last draw: camera moves relayed
    /// from the engine and entrance marker changes.
    pub fn update(&mut self) {
        for event in self.move_relay.drain_frame() {
            let map_event = match event {
                CameraEvent::MoveStart => MapEvent::MoveStart,
                CameraEvent::Move { center, distance } => {
                    let zoom = CameraModule::distance_to_zoom_level(distance);
                    self.modules
                        .camera
                        .borrow_mut()
                        .record_view(CameraView { center, distance });
                    self.view = MapView { center, zoom };
                    MapEvent::Move { center, zoom }
                }
                CameraEvent::MoveEnd => MapEvent::MoveEnd,
            };
            self.events.fire(&map_event);
        }

        if let Some(updater) = self.entrance_markers.as_mut() {
            updater.sync(&mut self.markers);
        }
    }

    //--- Surface Input ----------------------------------------------------

    /// Translates surface input into map events. Returns `false` when
    /// input is not bound yet.
    pub fn handle_dom_event(&mut self, event: DomEvent) -> bool {
        if self.dom_surface.is_none() {
            return false;
        }

        match event {
            DomEvent::Click { x, y } => {
                self.events.fire(&MapEvent::Click {
                    point: ScreenPoint { x, y },
                });
            }
            DomEvent::DoubleClick { x, y } => {
                self.events.fire(&MapEvent::DoubleClick {
                    point: ScreenPoint { x, y },
                });
            }
            DomEvent::PointerMove { x, y } => {
                self.events.fire(&MapEvent::PointerMove {
                    point: ScreenPoint { x, y },
                });
            }
            DomEvent::Wheel { delta_y } => {
                if delta_y != 0.0 {
                    let zoom = self.view.zoom - delta_y.signum();
                    self.set_view(self.view.center, zoom);
                }
            }
        }
        true
    }

    //--- View -------------------------------------------------------------

    /// Requests a new camera view; the engine applies it on a later tick.
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.modules.camera.borrow_mut().set_view(center, zoom);
        self.view = MapView { center, zoom };
    }

    pub fn view(&self) -> MapView {
        self.view
    }

    /// Projects `position` onto the surface, once the engine is live.
    pub fn project(&self, position: LatLng) -> Option<ScreenPoint> {
        self.engine.as_ref()?.project_to_screen(position)
    }

    //--- Events -----------------------------------------------------------

    pub fn events(&self) -> &MapEvents {
        &self.events
    }

    pub fn on<F>(&self, kind: MapEventKind, callback: F) -> ListenerId
    where
        F: FnMut(&MapEvent) + 'static,
    {
        self.events.on(kind, callback)
    }

    pub fn once<F>(&self, kind: MapEventKind, callback: F) -> ListenerId
    where
        F: FnOnce(&MapEvent) + 'static,
    {
        self.events.once(kind, callback)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    //--- Markers ----------------------------------------------------------

    pub fn add_marker(&mut self, id: impl Into<String>, position: LatLng, label: impl Into<String>) {
        self.markers.insert(Marker {
            id: id.into(),
            position,
            label: label.into(),
            kind: MarkerKind::Custom,
        });
    }

    pub fn remove_marker(&mut self, id: &str) -> bool {
        self.markers.remove(id).is_some()
    }

    pub fn markers(&self) -> &MarkerLayer {
        &self.markers
    }

    //--- Accessors --------------------------------------------------------

    pub fn modules(&self) -> &ModuleHandles {
        &self.modules
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn zoom_control_enabled(&self) -> bool {
        self.options.zoom_control
    }

    pub fn dom_events_bound(&self) -> bool {
        self.dom_surface.is_some()
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
