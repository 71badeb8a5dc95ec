//=========================================================================
// Feature Modules
//=========================================================================
//
// Fixed, ordered set of feature modules driven by the controller.
//
// Architecture:
//   ModuleHandles (typed, shared with the facade)
//     └─> ModuleSet [screen-point mapping, themes, indoors,
//                    precache, camera, polygon]
//
// Flow:
//   dispatch event ──for_each()──> MapModule hook, in set order
//
// The order is fixed at construction and identical for every dispatch
// event (init, update, draw, streaming-complete).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::boundary::EngineHandle;
use crate::core::events::TransitionNotifier;

//=== Module Declarations =================================================

mod camera;
mod indoors;
mod polygons;
mod precache;
mod screen_point_mapping;
mod themes;

//=== Public API ==========================================================

pub use camera::{CameraModule, MAX_ZOOM, MIN_ZOOM};
pub use indoors::IndoorsModule;
pub use polygons::{PolygonHandle, PolygonModule};
pub use precache::{PrecacheModule, PrecacheRequest};
pub use screen_point_mapping::{MappingId, ScreenPointMappingModule};
pub use themes::ThemesModule;

/// Number of modules in a [`ModuleSet`].
pub const MODULE_COUNT: usize = 6;

//=== MapModule Trait =====================================================

/// Lifecycle capability shared by every feature module.
///
/// All hooks default to no-ops; a module overrides the ones it needs.
pub trait MapModule {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Engine reported ready. Called once.
    fn on_initialized(&mut self) {}

    /// Per-tick update with elapsed seconds.
    fn on_update(&mut self, _delta_seconds: f64) {}

    /// Per-tick draw with elapsed seconds, after update.
    fn on_draw(&mut self, _delta_seconds: f64) {}

    /// Engine finished streaming its initial data set.
    fn on_initial_streaming_completed(&mut self) {}
}

/// Module shared between the dispatch set and the facade.
pub type SharedModule = Rc<RefCell<dyn MapModule>>;

//=== ModuleHandles =======================================================

/// Typed handles to the six modules.
#[derive(Clone)]
pub struct ModuleHandles {
    pub screen_point_mapping: Rc<RefCell<ScreenPointMappingModule>>,
    pub themes: Rc<RefCell<ThemesModule>>,
    pub indoors: Rc<RefCell<IndoorsModule>>,
    pub precache: Rc<RefCell<PrecacheModule>>,
    pub camera: Rc<RefCell<CameraModule>>,
    pub polygon: Rc<RefCell<PolygonModule>>,
}

impl ModuleHandles {
    /// Builds every module against the same engine handle.
    pub fn new(engine: &EngineHandle, notifier: TransitionNotifier) -> Self {
        Self {
            screen_point_mapping: Rc::new(RefCell::new(ScreenPointMappingModule::new(engine.clone()))),
            themes: Rc::new(RefCell::new(ThemesModule::new(engine.clone()))),
            indoors: Rc::new(RefCell::new(IndoorsModule::new(engine.clone(), notifier))),
            precache: Rc::new(RefCell::new(PrecacheModule::new(engine.clone()))),
            camera: Rc::new(RefCell::new(CameraModule::new(engine.clone()))),
            polygon: Rc::new(RefCell::new(PolygonModule::new(engine.clone()))),
        }
    }
}

//=== ModuleSet ===========================================================

/// Ordered, fixed-cardinality dispatch list.
pub struct ModuleSet {
    ordered: [SharedModule; MODULE_COUNT],
}

impl ModuleSet {
    pub fn new(handles: &ModuleHandles) -> Self {
        Self {
            ordered: [
                handles.screen_point_mapping.clone(),
                handles.themes.clone(),
                handles.indoors.clone(),
                handles.precache.clone(),
                handles.camera.clone(),
                handles.polygon.clone(),
            ],
        }
    }

    /// Builds a set from arbitrary modules, keeping the given order.
    pub fn from_modules(ordered: [SharedModule; MODULE_COUNT]) -> Self {
        Self { ordered }
    }

    /// Invokes `f` on every module in set order.
    pub fn for_each(&self, mut f: impl FnMut(&mut dyn MapModule)) {
        for module in &self.ordered {
            let mut module = module.borrow_mut();
            trace!(target: "modules", "Dispatching to {}", module.name());
            f(&mut *module);
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.ordered.iter().map(|m| m.borrow().name()).collect()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
