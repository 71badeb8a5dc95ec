//=========================================================================
// Frame Hooks
//=========================================================================
//
// The three per-frame callbacks the controller registers with the engine.
//
// Hooks hold a weak reference to the dispatcher: the engine may keep them
// for as long as it likes without extending the controller's lifetime.
// A hook fired after the controller is gone reports `ControllerDropped`.
//
//=========================================================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Weak;

use super::dispatcher::{self, Dispatcher};
use crate::core::error::LifecycleViolation;

//=== FrameHooks ==========================================================

/// Engine-held handle for `update`, `draw` and streaming completion.
#[derive(Clone)]
pub struct FrameHooks {
    dispatcher: Weak<RefCell<Dispatcher>>,
}

impl FrameHooks {
    pub(crate) fn new(dispatcher: Weak<RefCell<Dispatcher>>) -> Self {
        Self { dispatcher }
    }

    /// Per-tick update; see [`crate::MapController::on_update`].
    pub fn update(&self, delta_seconds: f64) -> Result<(), LifecycleViolation> {
        self.dispatch(|d| d.update(delta_seconds))
    }

    /// Per-tick draw; see [`crate::MapController::on_draw`].
    pub fn draw(&self, delta_seconds: f64) -> Result<(), LifecycleViolation> {
        self.dispatch(|d| d.draw(delta_seconds))
    }

    pub fn initial_streaming_completed(&self) -> Result<(), LifecycleViolation> {
        self.dispatch(|d| d.initial_streaming_completed())
    }

    /// `false` once the owning controller has been dropped.
    pub fn is_live(&self) -> bool {
        self.dispatcher.strong_count() > 0
    }

    fn dispatch<R>(
        &self,
        f: impl FnOnce(&mut Dispatcher) -> Result<R, LifecycleViolation>,
    ) -> Result<R, LifecycleViolation> {
        let cell = self
            .dispatcher
            .upgrade()
            .ok_or(LifecycleViolation::ControllerDropped)?;
        let mut guard = dispatcher::enter(&cell)?;
        f(&mut *guard)
    }
}

impl fmt::Debug for FrameHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameHooks")
            .field("live", &self.is_live())
            .finish()
    }
}
