//=========================================================================
// Move Event Relay
//=========================================================================
//
// Relays engine camera notifications to the map facade.
//
// Architecture:
//   engine camera surface ─Sender<CameraEvent>─> channel
//                                                  │
//   MapFacade::update() ──drain_frame()────────────┘
//
// Draining is bounded per frame so a flood of camera callbacks cannot
// starve the draw tick; leftovers are picked up next frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::interface::{CameraEvent, EngineApi};
use crate::core::error::BoundaryError;

const MAX_EVENTS_PER_FRAME: usize = 256;

//=== MoveEventRelay ======================================================

/// Channel-backed relay between the engine camera surface and the facade.
pub struct MoveEventRelay {
    sender: Sender<CameraEvent>,
    receiver: Receiver<CameraEvent>,
    bound: bool,
}

impl MoveEventRelay {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            bound: false,
        }
    }

    /// Hands the sending side to the engine's camera control surface.
    pub fn bind(&mut self, engine: &dyn EngineApi) -> Result<(), BoundaryError> {
        engine.set_camera_event_sink(self.sender.clone())?;
        self.bound = true;
        debug!(target: "relay", "Move event relay bound to engine camera surface");
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Collects up to one frame's worth of pending camera events.
    pub fn drain_frame(&mut self) -> Vec<CameraEvent> {
        let mut events = Vec::new();

        while events.len() < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                // Unreachable while `self.sender` lives; kept for clarity.
                Err(TryRecvError::Disconnected) => break,
            }
        }

        if events.len() >= MAX_EVENTS_PER_FRAME {
            warn!(
                target: "relay",
                "Camera event backlog: drained {} events, {} left for next frame",
                events.len(),
                self.receiver.len()
            );
        }

        events
    }
}

impl Default for MoveEventRelay {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
