use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::layer::LayerId;

/// Callback fired after a layer's configuration changed.
pub type Observer = Arc<dyn Fn(LayerId) + Send + Sync>;

/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// The change subscribers of one layer.
///
/// Dispatch runs on the mutating thread, after the subscriber list lock has
/// been released, so a callback may subscribe, unsubscribe or mutate the layer
/// again.
pub struct Observers {
    layer: LayerId,
    next_id: AtomicU64,
    list: Mutex<Vec<(ObserverId, Observer)>>,
}

impl Observers {
    pub fn new(layer: LayerId) -> Self {
        Self {
            layer,
            next_id: AtomicU64::new(0),
            list: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, observer: impl Fn(LayerId) + Send + Sync + 'static) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, Arc::new(observer)));
        id
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut list = self.lock();
        let before = list.len();
        list.retain(|(oid, _)| *oid != id);
        list.len() != before
    }

    pub fn notify(&self) {
        let snapshot: Vec<Observer> = self.lock().iter().map(|(_, o)| Arc::clone(o)).collect();
        for observer in snapshot {
            observer(self.layer);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(ObserverId, Observer)>> {
        self.list.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("layer", &self.layer)
            .field("count", &self.len())
            .finish()
    }
}
