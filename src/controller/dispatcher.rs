//=========================================================================
// Frame Dispatcher
//=========================================================================
//
// Mutable half of the controller: module set, surface container,
// resize entry point and the facade. Shared between the controller and
// the engine's frame hooks behind one `RefCell`.
//
// Lifecycle flag and canvas size live in `SharedState`, outside that
// `RefCell`, so they stay readable from listeners running mid-dispatch.
//
// Per tick:
//   update(dt) ─> sync canvas size ─> module.on_update(dt) × 6
//   draw(dt)   ─> module.on_draw(dt) × 6 ─> facade.update()
//
// Out of band:
//   initial_streaming_completed() ─> module.on_initial_streaming_completed() × 6
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell, RefMut};
use std::rc::Rc;

use log::{debug, trace, warn};
use winit::dpi::PhysicalSize;

//=== Internal Dependencies ===============================================

use crate::core::boundary::ResizeCanvas;
use crate::core::error::LifecycleViolation;
use crate::core::facade::MapFacade;
use crate::core::modules::ModuleSet;
use crate::core::surface::SurfaceContainer;

//=== LifecycleState ======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecycleState {
    Constructed,
    Initialized,
}

//=== SharedState =========================================================

/// Borrow-free view of the lifecycle flag and canvas size state.
#[derive(Clone)]
pub(crate) struct SharedState {
    lifecycle: Rc<Cell<LifecycleState>>,
    canvas_size: Rc<Cell<PhysicalSize<u32>>>,
}

impl SharedState {
    pub(crate) fn new(canvas_size: PhysicalSize<u32>) -> Self {
        Self {
            lifecycle: Rc::new(Cell::new(LifecycleState::Constructed)),
            canvas_size: Rc::new(Cell::new(canvas_size)),
        }
    }

    pub(crate) fn lifecycle(&self) -> LifecycleState {
        self.lifecycle.get()
    }

    pub(crate) fn mark_initialized(&self) {
        self.lifecycle.set(LifecycleState::Initialized);
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.lifecycle() == LifecycleState::Initialized
    }

    pub(crate) fn canvas_size(&self) -> PhysicalSize<u32> {
        self.canvas_size.get()
    }

    fn set_canvas_size(&self, size: PhysicalSize<u32>) {
        self.canvas_size.set(size);
    }
}

//=== Dispatcher ==========================================================

pub(crate) struct Dispatcher {
    pub(crate) shared: SharedState,
    pub(crate) modules: ModuleSet,
    pub(crate) container: SurfaceContainer,
    pub(crate) resize_canvas: Option<ResizeCanvas>,
    pub(crate) facade: MapFacade,
}

/// Borrows the dispatcher for one dispatch, refusing re-entry.
pub(crate) fn enter(cell: &RefCell<Dispatcher>) -> Result<RefMut<'_, Dispatcher>, LifecycleViolation> {
    cell.try_borrow_mut()
        .map_err(|_| LifecycleViolation::ReentrantDispatch)
}

impl Dispatcher {
    pub(crate) fn new(
        shared: SharedState,
        modules: ModuleSet,
        container: SurfaceContainer,
        facade: MapFacade,
    ) -> Self {
        Self {
            shared,
            modules,
            container,
            resize_canvas: None,
            facade,
        }
    }

    //--- Frame ------------------------------------------------------------

    pub(crate) fn update(&mut self, delta_seconds: f64) -> Result<(), LifecycleViolation> {
        self.ensure_initialized("on_update")?;
        validate_delta(delta_seconds)?;

        self.sync_canvas_size();

        trace!(target: "controller::frame", "update dt={:.4}", delta_seconds);
        self.modules.for_each(|m| m.on_update(delta_seconds));
        Ok(())
    }

    pub(crate) fn draw(&mut self, delta_seconds: f64) -> Result<(), LifecycleViolation> {
        self.ensure_initialized("on_draw")?;
        validate_delta(delta_seconds)?;

        trace!(target: "controller::frame", "draw dt={:.4}", delta_seconds);
        self.modules.for_each(|m| m.on_draw(delta_seconds));
        self.facade.update();
        Ok(())
    }

    pub(crate) fn initial_streaming_completed(&mut self) -> Result<(), LifecycleViolation> {
        self.ensure_initialized("on_initial_streaming_completed")?;

        debug!(target: "controller", "Initial streaming completed");
        self.modules.for_each(|m| m.on_initial_streaming_completed());
        Ok(())
    }

    //--- Internals --------------------------------------------------------

    fn ensure_initialized(&self, operation: &'static str) -> Result<(), LifecycleViolation> {
        match self.shared.lifecycle() {
            LifecycleState::Initialized => Ok(()),
            LifecycleState::Constructed => Err(LifecycleViolation::NotInitialized { operation }),
        }
    }

    /// Pushes the container's live size to the engine when it changed.
    ///
    /// A live size with a zero dimension is deliberately not forwarded,
    /// even though it differs from the stored size: a collapsed container
    /// (hidden tab, detached element) would hand the engine a degenerate
    /// surface. The last good size is kept and the resize happens once the
    /// container has a real size again.
    fn sync_canvas_size(&mut self) {
        let live = self.container.size();
        let current = self.shared.canvas_size();
        if live == current {
            return;
        }

        if live.width == 0 || live.height == 0 {
            warn!(
                target: "controller",
                "Ignoring degenerate surface size {}x{}",
                live.width, live.height
            );
            return;
        }

        if let Some(resize) = self.resize_canvas.as_mut() {
            debug!(
                target: "controller",
                "Resizing canvas {}x{} -> {}x{}",
                current.width, current.height, live.width, live.height
            );
            resize(live.width, live.height);
            self.shared.set_canvas_size(live);
        }
    }
}

fn validate_delta(delta_seconds: f64) -> Result<(), LifecycleViolation> {
    if delta_seconds.is_finite() && delta_seconds >= 0.0 {
        Ok(())
    } else {
        Err(LifecycleViolation::InvalidDelta(delta_seconds))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
