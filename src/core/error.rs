//=========================================================================
// Controller Errors
//=========================================================================
//
// Failure kinds surfaced by the controller and its collaborators.
//
// Taxonomy:
//   ConfigurationError  - construction-time, bad options or surface size
//   LifecycleViolation  - call made in the wrong lifecycle state
//   BoundaryError       - native entry point missing when required
//
// None of these are transient. Callers are expected to treat every
// variant as fatal for the controller instance that produced it.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== ConfigurationError ==================================================

/// Options that cannot produce a usable controller.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Neither the explicit option nor the container layout yields a
    /// positive pixel size.
    #[error("surface size cannot be resolved (width: {width}, height: {height})")]
    UnresolvableSurfaceSize { width: u32, height: u32 },

    /// Zoom level is not a finite number.
    #[error("zoom level must be finite, got {0}")]
    InvalidZoom(f64),

    /// Options payload from the host could not be parsed.
    #[error("invalid map options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

//=== LifecycleViolation ==================================================

/// A contract violation against the constructed → initialized state machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LifecycleViolation {
    #[error("controller is already initialized")]
    AlreadyInitialized,

    #[error("`{operation}` invoked before the engine reported ready")]
    NotInitialized { operation: &'static str },

    #[error("frame delta must be finite and non-negative, got {0}")]
    InvalidDelta(f64),

    /// A dispatch was entered while another dispatch was still running
    /// on the same call stack.
    #[error("dispatch re-entered while a frame callback is in progress")]
    ReentrantDispatch,

    #[error("frame hook invoked after the controller was dropped")]
    ControllerDropped,
}

//=== BoundaryError =======================================================

/// Native boundary entry points unavailable at the point they are needed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundaryError {
    #[error("native resize entry point is not exported")]
    ResizeUnavailable,

    #[error("engine rejected frame callback registration: {0}")]
    CallbackRegistrationFailed(String),

    #[error("engine camera control surface is unavailable")]
    CameraControlUnavailable,
}

//=== ControllerError =====================================================

/// Umbrella error returned by [`crate::MapController`] operations.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleViolation),

    #[error(transparent)]
    Boundary(#[from] BoundaryError),
}

impl ControllerError {
    /// Returns the lifecycle violation, if this is one.
    pub fn as_lifecycle(&self) -> Option<&LifecycleViolation> {
        match self {
            Self::Lifecycle(v) => Some(v),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
