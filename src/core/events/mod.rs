//=========================================================================
// Facade Events
//=========================================================================
//
// Event-subscription surface exposed to the surrounding UI framework.
//
// Architecture:
//   MapEvents (shared registry)
//     ├─ MapFacade            fires move / pointer / indoor events
//     ├─ TransitionNotifier   one-shot move-end hook for the indoors module
//     └─ MapController        one-shot indoor transition listener
//
//=========================================================================

//=== Module Declarations =================================================

mod map_events;
mod transition;

//=== Public API ==========================================================

pub use map_events::{ListenerId, MapEvent, MapEventKind, MapEvents};
pub use transition::TransitionNotifier;
