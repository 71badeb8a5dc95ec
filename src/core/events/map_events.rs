//=========================================================================
// Map Events
//=========================================================================
//
// Listener registry behind the facade's event-subscription surface.
//
// Architecture:
//   on(kind)   ─┐
//   once(kind) ─┼─> Registry { entries: Vec<Entry> } (shared, Rc<RefCell>)
//   off(id)    ─┘            │
//   fire(event) ─take matching─> invoke (registry unborrowed) ─> restore
//
// Listeners run with the registry released, so a callback may subscribe,
// unsubscribe or fire further events without a borrow conflict. A `once`
// listener is removed before it runs and can never fire twice.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::boundary::ScreenPoint;
use crate::core::config::LatLng;

//=== MapEvent ============================================================

/// Events observable on the facade.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Engine reported ready and the facade finished its own setup.
    Initialized,
    MoveStart,
    Move { center: LatLng, zoom: f64 },
    MoveEnd,
    Click { point: ScreenPoint },
    DoubleClick { point: ScreenPoint },
    PointerMove { point: ScreenPoint },
    IndoorMapEntered { indoor_map_id: String },
    IndoorMapExited,
}

/// Discriminant used to subscribe to a family of [`MapEvent`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    Initialized,
    MoveStart,
    Move,
    MoveEnd,
    Click,
    DoubleClick,
    PointerMove,
    IndoorMapEntered,
    IndoorMapExited,
}

impl MapEvent {
    pub fn kind(&self) -> MapEventKind {
        match self {
            Self::Initialized => MapEventKind::Initialized,
            Self::MoveStart => MapEventKind::MoveStart,
            Self::Move { .. } => MapEventKind::Move,
            Self::MoveEnd => MapEventKind::MoveEnd,
            Self::Click { .. } => MapEventKind::Click,
            Self::DoubleClick { .. } => MapEventKind::DoubleClick,
            Self::PointerMove { .. } => MapEventKind::PointerMove,
            Self::IndoorMapEntered { .. } => MapEventKind::IndoorMapEntered,
            Self::IndoorMapExited => MapEventKind::IndoorMapExited,
        }
    }
}

//=== Registry ============================================================

/// Handle returned by subscriptions, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&MapEvent)>;

struct Entry {
    id: ListenerId,
    kind: MapEventKind,
    once: bool,
    callback: Listener,
}

#[derive(Default)]
struct Registry {
    entries: Vec<Entry>,
    next_id: u64,
    /// Ids taken out for the fire currently in progress.
    in_flight: Vec<ListenerId>,
    /// In-flight ids unsubscribed by a running callback.
    cancelled: Vec<ListenerId>,
}

//=== MapEvents ===========================================================

/// Cheaply cloneable handle to a shared listener registry.
#[derive(Clone, Default)]
pub struct MapEvents {
    registry: Rc<RefCell<Registry>>,
}

impl MapEvents {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Subscription -----------------------------------------------------

    /// Subscribes `callback` to every event of `kind`.
    pub fn on<F>(&self, kind: MapEventKind, callback: F) -> ListenerId
    where
        F: FnMut(&MapEvent) + 'static,
    {
        self.insert(kind, false, Box::new(callback))
    }

    /// Subscribes `callback` to the next event of `kind` only.
    pub fn once<F>(&self, kind: MapEventKind, callback: F) -> ListenerId
    where
        F: FnOnce(&MapEvent) + 'static,
    {
        let mut slot = Some(callback);
        self.insert(
            kind,
            true,
            Box::new(move |event| {
                if let Some(callback) = slot.take() {
                    callback(event);
                }
            }),
        )
    }

    /// Removes a listener. Returns `false` if it was already gone.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut registry = self.registry.borrow_mut();

        if let Some(pos) = registry.entries.iter().position(|e| e.id == id) {
            registry.entries.remove(pos);
            return true;
        }

        if registry.in_flight.contains(&id) && !registry.cancelled.contains(&id) {
            registry.cancelled.push(id);
            return true;
        }

        false
    }

    /// Number of listeners currently subscribed to `kind`.
    pub fn listener_count(&self, kind: MapEventKind) -> usize {
        self.registry
            .borrow()
            .entries
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }

    //--- Emission ---------------------------------------------------------

    /// Delivers `event` to its subscribers in subscription order.
    ///
    /// Returns the number of listeners invoked.
    pub fn fire(&self, event: &MapEvent) -> usize {
        let kind = event.kind();

        let mut taken = {
            let mut registry = self.registry.borrow_mut();
            let (hit, keep): (Vec<Entry>, Vec<Entry>) = std::mem::take(&mut registry.entries)
                .into_iter()
                .partition(|e| e.kind == kind);
            registry.entries = keep;
            registry.in_flight.extend(hit.iter().map(|e| e.id));
            hit
        };

        if taken.is_empty() {
            return 0;
        }

        trace!(target: "events", "Firing {:?} to {} listener(s)", kind, taken.len());

        let mut invoked = 0;
        for entry in taken.iter_mut() {
            if self.registry.borrow().cancelled.contains(&entry.id) {
                continue;
            }
            (entry.callback)(event);
            invoked += 1;
        }

        let mut registry = self.registry.borrow_mut();
        let owned = |id: &ListenerId| taken.iter().any(|e| e.id == *id);
        let cancelled: Vec<ListenerId> = registry.cancelled.iter().copied().filter(owned).collect();
        registry.cancelled.retain(|id| !owned(id));
        registry.in_flight.retain(|id| !owned(id));

        // Survivors keep their place ahead of listeners added mid-fire.
        let added = std::mem::take(&mut registry.entries);
        registry.entries = taken
            .into_iter()
            .filter(|e| !e.once && !cancelled.contains(&e.id))
            .chain(added)
            .collect();

        invoked
    }

    fn insert(&self, kind: MapEventKind, once: bool, callback: Listener) -> ListenerId {
        let mut registry = self.registry.borrow_mut();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.entries.push(Entry {
            id,
            kind,
            once,
            callback,
        });
        id
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
