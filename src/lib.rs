//=========================================================================
// Map View Bridge — Library Root
//
// Lifecycle and per-frame dispatch layer between a host map UI and a
// native rendering/streaming engine.
//
// Responsibilities:
// - Expose the controller (`MapController`) and the hooks the engine
//   drives every tick (`FrameHooks`)
// - Expose the collaborator subsystems under `core` (modules, facade,
//   surface, events, engine boundary)
// - Keep dispatch internals private to the controller
//
// Typical flow:
// ```text
// MapController::new(map_id, engine, element, api_key, overrides)?
//     engine ──on_initialized(pointer)──> controller
//     engine ──hooks.update(dt) / hooks.draw(dt)──> every tick
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the controller's collaborators: configuration, errors,
// the engine boundary contract, the six feature modules, the surface
// container, the facade and its event stream.
//
pub mod core;
pub mod logging;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `controller` owns the lifecycle state machine and the dispatcher; only
// its entry points are re-exported.
//
mod controller;

#[cfg(test)]
mod testing;

//--- Public Exports ------------------------------------------------------

pub use controller::{FrameHooks, MapController};
pub use crate::core::config::{LatLng, MapOptions, MapOptionsOverrides, StartupArgs};
pub use crate::core::error::{BoundaryError, ConfigurationError, ControllerError, LifecycleViolation};
