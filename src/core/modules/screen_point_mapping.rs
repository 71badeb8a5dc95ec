//=========================================================================
// Screen Point Mapping Module
//=========================================================================
//
// Tracks geographic positions whose on-surface pixel location is needed
// by the UI layer (markers, popups). Projections are refreshed on every
// draw tick, after the camera settled for the frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;

use log::trace;

//=== Internal Dependencies ===============================================

use super::MapModule;
use crate::core::boundary::{EngineHandle, ScreenPoint};
use crate::core::config::LatLng;

//=== Types ===============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MappingId(u32);

struct Mapping {
    position: LatLng,
    screen: Option<ScreenPoint>,
}

//=== ScreenPointMappingModule ============================================

pub struct ScreenPointMappingModule {
    engine: EngineHandle,
    ready: bool,
    next_id: u32,
    mappings: BTreeMap<MappingId, Mapping>,
}

impl ScreenPointMappingModule {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            ready: false,
            next_id: 0,
            mappings: BTreeMap::new(),
        }
    }

    pub fn add_mapping(&mut self, position: LatLng) -> MappingId {
        let id = MappingId(self.next_id);
        self.next_id += 1;
        self.mappings.insert(
            id,
            Mapping {
                position,
                screen: None,
            },
        );
        id
    }

    /// Moves a tracked position. Returns `false` for unknown ids.
    pub fn move_mapping(&mut self, id: MappingId, position: LatLng) -> bool {
        match self.mappings.get_mut(&id) {
            Some(mapping) => {
                mapping.position = position;
                true
            }
            None => false,
        }
    }

    pub fn remove_mapping(&mut self, id: MappingId) -> bool {
        self.mappings.remove(&id).is_some()
    }

    /// Last projected pixel position, `None` before the first draw or
    /// when the point is not visible.
    pub fn screen_point(&self, id: MappingId) -> Option<ScreenPoint> {
        self.mappings.get(&id).and_then(|m| m.screen)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl MapModule for ScreenPointMappingModule {
    fn name(&self) -> &'static str {
        "screen_point_mapping"
    }

    fn on_initialized(&mut self) {
        self.ready = true;
    }

    fn on_draw(&mut self, _delta_seconds: f64) {
        if !self.ready || self.mappings.is_empty() {
            return;
        }

        for mapping in self.mappings.values_mut() {
            mapping.screen = self.engine.project_to_screen(mapping.position);
        }
        trace!(target: "modules::screen_points", "Reprojected {} mapping(s)", self.mappings.len());
    }
}
