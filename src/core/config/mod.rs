//=========================================================================
// Configuration
//=========================================================================
//
// Controller options and the engine's startup argument vector.
//
// Components:
// - `options`: defaults, caller overrides and merge
// - `startup_args`: fixed-order positional arguments for the engine
//
//=========================================================================

//=== Module Declarations =================================================

mod options;
mod startup_args;

//=== Public API ==========================================================

pub use options::{
    LatLng, MapOptions, MapOptionsOverrides, DEFAULT_CANVAS_ID, DEFAULT_CENTER, DEFAULT_ZOOM,
};
pub use startup_args::{format_number, StartupArgs, STARTUP_ARG_COUNT};
