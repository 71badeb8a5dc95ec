//=========================================================================
// Transition Notifier
//=========================================================================
//
// Narrow capability handed to the indoors module so it can wait for the
// camera transition that follows an indoor enter/exit, without holding
// a reference to the controller.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::map_events::{ListenerId, MapEvent, MapEventKind, MapEvents};

//=== TransitionNotifier ==================================================

/// One-shot "move finished" registration on the facade's event stream.
#[derive(Clone)]
pub struct TransitionNotifier {
    events: MapEvents,
}

impl TransitionNotifier {
    pub fn new(events: MapEvents) -> Self {
        Self { events }
    }

    /// Runs `callback` on the next move-end, then discards it.
    pub fn on_transition_complete<F>(&self, callback: F) -> ListenerId
    where
        F: FnOnce() + 'static,
    {
        self.events.once(MapEventKind::MoveEnd, move |_| callback())
    }

    /// Publishes a follow-up event on the facade stream.
    pub fn announce(&self, event: &MapEvent) {
        self.events.fire(event);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
