//! Value with synchronous change listeners and an async watch channel.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;

pub type ListenerId = u64;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: T,
    listeners: Vec<(ListenerId, Listener<T>)>,
    next_id: ListenerId,
}

/// Shared value whose every change is pushed to listeners.
///
/// A change and the notification of all listeners for it happen under one
/// lock, so listeners see changes one at a time and in order. Listeners must
/// not call back into the same `Observable`.
pub struct Observable<T> {
    inner: Mutex<Inner<T>>,
    tx: watch::Sender<T>,
}

impl<T> Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial.clone());
        Self { inner: Mutex::new(Inner { value: initial, listeners: Vec::new(), next_id: 0 }), tx }
    }

    pub fn get(&self) -> T {
        self.inner.lock().value.clone()
    }

    /// Compute a replacement from the current value.
    ///
    /// Returning `None` leaves the value untouched and notifies nobody.
    /// Returns whether a change was published.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&T) -> Option<T>,
    {
        let mut inner = self.inner.lock();
        let Some(next) = f(&inner.value) else {
            return false;
        };
        inner.value = next;
        for (_, listener) in &inner.listeners {
            listener(&inner.value);
        }
        self.tx.send_replace(inner.value.clone());
        true
    }

    /// Register a listener called with the new value after every change.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        let listener: Listener<T> = Arc::new(listener);
        inner.listeners.push((id, listener));
        id
    }

    /// Returns false if the id was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|(lid, _)| *lid != id);
        inner.listeners.len() != before
    }

    /// Receiver that always holds the latest value.
    pub fn watch(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T> Observable<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Store `value`, notifying only if it differs from the current one.
    pub fn set(&self, value: T) -> bool {
        self.update(|current| (*current != value).then(|| value.clone()))
    }
}
