//=========================================================================
// Entrance Marker Updater
//=========================================================================
//
// Keeps one facade marker per building entrance known to the indoors
// module. Runs as part of the facade update, after module draw.
//
//=========================================================================

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use log::trace;

use super::{Marker, MarkerKind, MarkerLayer};
use crate::core::modules::IndoorsModule;

const MARKER_PREFIX: &str = "entrance:";

pub struct EntranceMarkerUpdater {
    indoors: Rc<RefCell<IndoorsModule>>,
    placed: BTreeSet<String>,
}

impl EntranceMarkerUpdater {
    pub fn new(indoors: Rc<RefCell<IndoorsModule>>) -> Self {
        Self {
            indoors,
            placed: BTreeSet::new(),
        }
    }

    /// Adds markers for new entrances and drops markers for vanished ones.
    pub fn sync(&mut self, layer: &mut MarkerLayer) {
        let indoors = self.indoors.borrow();
        let current: BTreeSet<String> = indoors
            .entrances()
            .map(|e| e.indoor_map_id.clone())
            .collect();

        for stale in self.placed.difference(&current) {
            layer.remove(&marker_id(stale));
        }

        for entrance in indoors.entrances() {
            if self.placed.contains(&entrance.indoor_map_id) {
                continue;
            }
            layer.insert(Marker {
                id: marker_id(&entrance.indoor_map_id),
                position: entrance.position,
                label: entrance.name.clone(),
                kind: MarkerKind::Entrance,
            });
        }

        if current != self.placed {
            trace!(target: "facade::entrances", "Entrance markers: {}", current.len());
        }
        self.placed = current;
    }
}

fn marker_id(indoor_map_id: &str) -> String {
    format!("{}{}", MARKER_PREFIX, indoor_map_id)
}
