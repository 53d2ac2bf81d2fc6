//! In-process snapshot subscription registry.
//!
//! # Responsibility
//! - Track view-level listeners interested in lead table changes.
//! - Deliver committed snapshots synchronously, in registration order.
//!
//! # Invariants
//! - Listeners receive broadcasts only from the moment they subscribe;
//!   there is no replay of past state.
//! - `Subscription::unsubscribe` is idempotent and safe after the
//!   registry has been dropped.
//! - Repeated registration of the same listener yields independent
//!   handles.

use crate::model::lead::Lead;
use std::sync::{Arc, Mutex, Weak};

/// Observer contract for lead table broadcasts.
///
/// Alternate transports (real push channel, polling fallback) implement
/// this same trait; the registry does not care what sits behind it.
pub trait SnapshotListener: Send + Sync {
    /// Called with the full post-commit snapshot after every mutation.
    fn on_snapshot(&self, leads: &[Lead]);
}

impl<F> SnapshotListener for F
where
    F: Fn(&[Lead]) + Send + Sync,
{
    fn on_snapshot(&self, leads: &[Lead]) {
        self(leads);
    }
}

struct RegistryInner {
    next_id: u64,
    entries: Vec<(u64, Arc<dyn SnapshotListener>)>,
}

/// Registry of snapshot listeners with registration-order fan-out.
pub struct SubscriberRegistry {
    /// Weak self-handle cloned into every `Subscription`, so handles can
    /// outlive the registry without keeping it alive.
    self_ref: Weak<Self>,
    inner: Mutex<RegistryInner>,
}

impl SubscriberRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            self_ref: self_ref.clone(),
            inner: Mutex::new(RegistryInner {
                next_id: 0,
                entries: Vec::new(),
            }),
        })
    }

    /// Registers one listener and returns its cancellation handle.
    pub fn subscribe(&self, listener: Arc<dyn SnapshotListener>) -> Subscription {
        let mut inner = self.inner.lock().unwrap_or_else(|poisoned| {
            // A panicking listener must not wedge every later subscriber.
            poisoned.into_inner()
        });
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push((id, listener));
        Subscription {
            id,
            registry: self.self_ref.clone(),
        }
    }

    /// Delivers one snapshot to all currently registered listeners.
    ///
    /// Listeners are invoked outside the registry lock so a listener may
    /// subscribe or unsubscribe reentrantly without deadlocking; the
    /// recipient set is the one registered at the moment of broadcast.
    pub fn notify(&self, leads: &[Lead]) {
        let listeners: Vec<Arc<dyn SnapshotListener>> = {
            let inner = self
                .inner
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            inner
                .entries
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };
        for listener in listeners {
            listener.on_snapshot(leads);
        }
    }

    /// Number of currently registered listeners.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, id: u64) {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        inner.entries.retain(|(entry_id, _)| *entry_id != id);
    }
}

/// Cancellation handle returned by `subscribe`.
///
/// Dropping the handle unsubscribes as well, so a view that lets its
/// handle go out of scope stops receiving broadcasts.
pub struct Subscription {
    id: u64,
    registry: Weak<SubscriberRegistry>,
}

impl Subscription {
    /// Removes the listener from the registry.
    ///
    /// Idempotent: calling this repeatedly, or after the registry has
    /// been dropped, is a no-op.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
