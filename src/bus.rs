//! Typed event bus
//!
//! In-process pub/sub for application events. Publishers fire typed
//! [`AppEvent`]s; subscribers register a callback and receive every event
//! published after registration. Dropping the [`Subscription`] handle
//! detaches the callback, so a forgotten subscriber can never outlive its
//! owner.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, Weak};

use crate::model::DocumentId;

/// Events published on the bus. One variant per observable state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    DocumentOpened {
        id: DocumentId,
        path: PathBuf,
    },
    DocumentSaved {
        id: DocumentId,
        path: PathBuf,
    },
    DocumentClosed {
        id: DocumentId,
    },
    /// A detection warning needs the user's attention before the document
    /// can be silently saved over its original file.
    EncodingWarning {
        id: DocumentId,
        message: String,
    },
    LoadFailed {
        path: PathBuf,
        error: String,
    },
    SaveFailed {
        id: DocumentId,
        error: String,
    },
}

type Callback = Arc<dyn Fn(&AppEvent) + Send + Sync>;

struct Inner {
    next_id: u64,
    subscribers: HashMap<u64, Callback>,
}

/// Cloneable handle to the shared bus.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Mutex<Inner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                next_id: 1,
                subscribers: HashMap::new(),
            })),
        }
    }

    /// Register a callback. It runs synchronously on the publishing thread
    /// for every event until the returned handle is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.insert(id, Arc::new(callback));
        Subscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to every live subscriber.
    ///
    /// The subscriber set is snapshotted before any callback runs, so
    /// callbacks are free to subscribe or drop subscriptions mid-delivery.
    /// A subscriber added during delivery sees the next event, not the one
    /// in flight.
    pub fn publish(&self, event: &AppEvent) {
        let callbacks: Vec<Callback> = {
            let inner = self.inner.lock().unwrap();
            inner.subscribers.values().cloned().collect()
        };
        for callback in callbacks {
            callback(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().unwrap().subscribers.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle tying a subscriber's lifetime to its owner. Dropping it (or
/// calling [`Subscription::unsubscribe`]) removes the callback.
pub struct Subscription {
    id: u64,
    bus: Weak<Mutex<Inner>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work
    }

    fn detach(&self) {
        if let Some(inner) = self.bus.upgrade() {
            inner.lock().unwrap().subscribers.remove(&self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}
