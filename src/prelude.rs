//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use mapview_bridge::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Controller
pub use crate::controller::{FrameHooks, MapController};

// Configuration and errors
pub use crate::core::config::{LatLng, MapOptions, MapOptionsOverrides};
pub use crate::core::error::{ControllerError, LifecycleViolation};

// Engine boundary
pub use crate::core::boundary::{EngineApi, EngineHandle, EnginePointer};

// Host surface and facade
pub use crate::core::events::{MapEvent, MapEventKind};
pub use crate::core::facade::{DomEvent, MapFacade};
pub use crate::core::modules::MapModule;
pub use crate::core::surface::ContainerElement;
