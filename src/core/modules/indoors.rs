//=========================================================================
// Indoors Module
//=========================================================================
//
// Tracks building entrances and the active indoor map from the engine's
// indoor notifications, and announces indoor enter/exit on the facade
// once the accompanying camera transition has finished.
//
// Flow:
//   on_update() ─drain_indoor_events()─> entrances / active map
//        Entered / Exited ─> TransitionNotifier (next move-end)
//                               └─> IndoorMapEntered / IndoorMapExited
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::MapModule;
use crate::core::boundary::{EngineHandle, IndoorEntrance, IndoorEvent};
use crate::core::events::{MapEvent, TransitionNotifier};

//=== IndoorsModule =======================================================

pub struct IndoorsModule {
    engine: EngineHandle,
    notifier: TransitionNotifier,
    ready: bool,
    pending_enter: Option<String>,
    entrances: BTreeMap<String, IndoorEntrance>,
    active: Option<String>,
    transitioning: Rc<Cell<bool>>,
}

impl IndoorsModule {
    pub fn new(engine: EngineHandle, notifier: TransitionNotifier) -> Self {
        Self {
            engine,
            notifier,
            ready: false,
            pending_enter: None,
            entrances: BTreeMap::new(),
            active: None,
            transitioning: Rc::new(Cell::new(false)),
        }
    }

    //--- Requests ---------------------------------------------------------

    /// Asks the engine to enter an indoor map; deferred until ready.
    pub fn enter_indoor_map(&mut self, indoor_map_id: impl Into<String>) {
        let indoor_map_id = indoor_map_id.into();
        if self.ready {
            self.engine.enter_indoor_map(&indoor_map_id);
        } else {
            self.pending_enter = Some(indoor_map_id);
        }
    }

    pub fn exit_indoor_map(&mut self) {
        if !self.ready {
            self.pending_enter = None;
            return;
        }
        if self.active.is_some() {
            self.engine.exit_indoor_map();
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn active_indoor_map(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn entrances(&self) -> impl Iterator<Item = &IndoorEntrance> {
        self.entrances.values()
    }

    /// `true` between an indoor enter/exit and the move-end that
    /// completes its camera transition.
    pub fn is_transitioning(&self) -> bool {
        self.transitioning.get()
    }

    //--- Event Handling ---------------------------------------------------

    fn apply(&mut self, event: IndoorEvent) {
        match event {
            IndoorEvent::EntranceAdded(entrance) => {
                debug!(target: "modules::indoors", "Entrance added: {}", entrance.indoor_map_id);
                self.entrances.insert(entrance.indoor_map_id.clone(), entrance);
            }
            IndoorEvent::EntranceRemoved { indoor_map_id } => {
                if self.entrances.remove(&indoor_map_id).is_none() {
                    warn!(target: "modules::indoors", "Unknown entrance removed: {}", indoor_map_id);
                }
            }
            IndoorEvent::Entered { indoor_map_id } => {
                info!(target: "modules::indoors", "Entered indoor map {}", indoor_map_id);
                self.active = Some(indoor_map_id.clone());
                self.announce_after_transition(MapEvent::IndoorMapEntered { indoor_map_id });
            }
            IndoorEvent::Exited => {
                info!(target: "modules::indoors", "Exited indoor map");
                self.active = None;
                self.announce_after_transition(MapEvent::IndoorMapExited);
            }
        }
    }

    fn announce_after_transition(&self, event: MapEvent) {
        let announcer = self.notifier.clone();
        let transitioning = self.transitioning.clone();
        transitioning.set(true);

        self.notifier.on_transition_complete(move || {
            transitioning.set(false);
            announcer.announce(&event);
        });
    }
}

impl MapModule for IndoorsModule {
    fn name(&self) -> &'static str {
        "indoors"
    }

    fn on_initialized(&mut self) {
        self.ready = true;
        if let Some(indoor_map_id) = self.pending_enter.take() {
            self.engine.enter_indoor_map(&indoor_map_id);
        }
    }

    fn on_update(&mut self, _delta_seconds: f64) {
        if !self.ready {
            return;
        }
        for event in self.engine.drain_indoor_events() {
            self.apply(event);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
