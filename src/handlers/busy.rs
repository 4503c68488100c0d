use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use super::dispatch::ActionKind;

type Key = (String, ActionKind);

/// Actions currently waiting on the backend.
///
/// A control whose action is in flight is busy; triggering it again is
/// refused until the first attempt finishes, successfully or not.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    pending: Arc<Mutex<HashSet<Key>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `(target, action)` busy. `None` when it already is.
    pub fn begin(&self, target: &str, action: ActionKind) -> Option<BusyToken> {
        let key = (target.to_string(), action);
        if !self.lock().insert(key.clone()) {
            return None;
        }
        Some(BusyToken {
            key,
            pending: Arc::clone(&self.pending),
        })
    }

    pub fn is_busy(&self, target: &str, action: ActionKind) -> bool {
        self.lock().contains(&(target.to_string(), action))
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<Key>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Releases the busy mark on drop
#[derive(Debug)]
pub struct BusyToken {
    key: Key,
    pending: Arc<Mutex<HashSet<Key>>>,
}

impl Drop for BusyToken {
    fn drop(&mut self) {
        let mut pending = self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        pending.remove(&self.key);
    }
}
