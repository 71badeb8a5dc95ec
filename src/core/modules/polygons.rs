//=========================================================================
// Polygon Module
//=========================================================================
//
// Hands out stable local handles for polygons and creates them on the
// engine once it is ready. Creation is frame-aligned: polygons added
// after initialization are created on the next update tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::MapModule;
use crate::core::boundary::{EngineHandle, PolygonId, PolygonSpec};

//=== PolygonHandle =======================================================

/// Caller-side polygon identifier, valid before and after engine creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolygonHandle(u32);

//=== PolygonModule =======================================================

pub struct PolygonModule {
    engine: EngineHandle,
    ready: bool,
    next_handle: u32,
    pending: Vec<(PolygonHandle, PolygonSpec)>,
    created: BTreeMap<PolygonHandle, PolygonId>,
}

impl PolygonModule {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            ready: false,
            next_handle: 0,
            pending: Vec::new(),
            created: BTreeMap::new(),
        }
    }

    pub fn add_polygon(&mut self, polygon: PolygonSpec) -> PolygonHandle {
        let handle = PolygonHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push((handle, polygon));
        handle
    }

    /// Removes a polygon whether or not it reached the engine yet.
    pub fn remove_polygon(&mut self, handle: PolygonHandle) -> bool {
        if let Some(pos) = self.pending.iter().position(|(h, _)| *h == handle) {
            self.pending.remove(pos);
            return true;
        }

        match self.created.remove(&handle) {
            Some(id) => {
                self.engine.remove_polygon(id);
                true
            }
            None => false,
        }
    }

    /// Engine id for `handle`, once created.
    pub fn engine_id(&self, handle: PolygonHandle) -> Option<PolygonId> {
        self.created.get(&handle).copied()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        debug!(target: "modules::polygon", "Creating {} polygon(s)", self.pending.len());
        for (handle, polygon) in std::mem::take(&mut self.pending) {
            let id = self.engine.create_polygon(&polygon);
            self.created.insert(handle, id);
        }
    }
}

impl MapModule for PolygonModule {
    fn name(&self) -> &'static str {
        "polygon"
    }

    fn on_initialized(&mut self) {
        self.ready = true;
        self.flush();
    }

    fn on_update(&mut self, _delta_seconds: f64) {
        if self.ready {
            self.flush();
        }
    }
}
