//=========================================================================
// Engine Boundary
//=========================================================================
//
// Bridges the native engine with the controller core.
//
// Components:
// - `interface`: engine entry points and payload types (the contract)
// - `move_relay`: core-side collection of camera move notifications
//
//=========================================================================

//=== Module Declarations =================================================

mod interface;
mod move_relay;

//=== Public API ==========================================================

pub use interface::{
    CameraEvent, CameraView, EngineApi, EngineHandle, EnginePointer, IndoorEntrance, IndoorEvent,
    PolygonId, PolygonSpec, ResizeCanvas, ScreenPoint,
};
pub use move_relay::MoveEventRelay;
