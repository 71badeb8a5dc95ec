//=========================================================================
// Precache Module
//=========================================================================
//
// Queues area precache requests until the engine's initial streaming
// milestone, then forwards them. Requests made after the milestone go
// straight to the engine.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::MapModule;
use crate::core::boundary::EngineHandle;
use crate::core::config::LatLng;

//=== PrecacheRequest =====================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecacheRequest {
    pub center: LatLng,
    pub radius_m: f64,
}

//=== PrecacheModule ======================================================

pub struct PrecacheModule {
    engine: EngineHandle,
    streaming_complete: bool,
    queued: Vec<PrecacheRequest>,
    issued: usize,
}

impl PrecacheModule {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            streaming_complete: false,
            queued: Vec::new(),
            issued: 0,
        }
    }

    pub fn precache(&mut self, center: LatLng, radius_m: f64) {
        let request = PrecacheRequest { center, radius_m };
        if self.streaming_complete {
            self.issue(request);
        } else {
            self.queued.push(request);
        }
    }

    pub fn queued(&self) -> &[PrecacheRequest] {
        &self.queued
    }

    /// Number of requests forwarded to the engine so far.
    pub fn issued(&self) -> usize {
        self.issued
    }

    fn issue(&mut self, request: PrecacheRequest) {
        debug!(
            target: "modules::precache",
            "Precaching {:.0}m around {:.5},{:.5}",
            request.radius_m, request.center.lat, request.center.lng
        );
        self.engine.begin_precache(request.center, request.radius_m);
        self.issued += 1;
    }
}

impl MapModule for PrecacheModule {
    fn name(&self) -> &'static str {
        "precache"
    }

    fn on_initial_streaming_completed(&mut self) {
        if self.streaming_complete {
            return;
        }
        self.streaming_complete = true;

        let queued = std::mem::take(&mut self.queued);
        if !queued.is_empty() {
            info!(target: "modules::precache", "Releasing {} queued precache request(s)", queued.len());
        }
        for request in queued {
            self.issue(request);
        }
    }
}
