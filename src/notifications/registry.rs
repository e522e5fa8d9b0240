// SPDX-License-Identifier: MPL-2.0
//! Publish/subscribe hub between toast producers and the mounted container.
//!
//! Producers never hold a reference to a container: they publish events and
//! whichever container is subscribed at that moment receives them. Dispatch
//! is synchronous and unbuffered, so publishing with no subscriber drops the
//! event.
//!
//! The registry is single-threaded (`Rc`), matching the cooperative model of
//! the containers that subscribe to it. Cloning a registry yields another
//! handle to the same subscriber lists.

use super::notification::{ClearRequest, ToastRequest};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Events the registry carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A toast should be created.
    Create,
    /// Toasts should be cleared.
    Clear,
}

/// Handle returned by a subscribe call.
///
/// Pass it back to [`EventRegistry::unsubscribe`] to revoke the callback.
/// Unsubscribing is idempotent, and only the registry that issued the handle
/// can revoke it.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    kind: EventKind,
    active: Rc<Cell<bool>>,
    registry: Weak<RefCell<Channels>>,
}

impl Subscription {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Returns `false` once the subscription has been revoked.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

struct Subscriber<E> {
    id: u64,
    active: Rc<Cell<bool>>,
    handler: Rc<dyn Fn(&E)>,
}

// Manual impl: deriving would require `E: Clone`.
impl<E> Clone for Subscriber<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            active: Rc::clone(&self.active),
            handler: Rc::clone(&self.handler),
        }
    }
}

struct Channel<E> {
    subscribers: Vec<Subscriber<E>>,
}

impl<E> Default for Channel<E> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<E> Channel<E> {
    fn add(&mut self, id: u64, handler: Rc<dyn Fn(&E)>) -> Rc<Cell<bool>> {
        let active = Rc::new(Cell::new(true));
        self.subscribers.push(Subscriber {
            id,
            active: Rc::clone(&active),
            handler,
        });
        active
    }

    fn remove(&mut self, id: u64) {
        self.subscribers.retain(|s| s.id != id);
    }

    fn snapshot(&self) -> Vec<Subscriber<E>> {
        self.subscribers.clone()
    }
}

#[derive(Default)]
struct Channels {
    next_id: u64,
    create: Channel<ToastRequest>,
    clear: Channel<ClearRequest>,
}

/// Registry of the create and clear event channels.
#[derive(Clone, Default)]
pub struct EventRegistry {
    channels: Rc<RefCell<Channels>>,
}

impl EventRegistry {
    /// Creates a registry with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for create events.
    pub fn subscribe_create(&self, handler: impl Fn(&ToastRequest) + 'static) -> Subscription {
        let mut channels = self.channels.borrow_mut();
        let id = Self::allocate_id(&mut channels);
        let active = channels.create.add(id, Rc::new(handler));
        Subscription {
            id,
            kind: EventKind::Create,
            active,
            registry: Rc::downgrade(&self.channels),
        }
    }

    /// Registers a handler for clear events.
    pub fn subscribe_clear(&self, handler: impl Fn(&ClearRequest) + 'static) -> Subscription {
        let mut channels = self.channels.borrow_mut();
        let id = Self::allocate_id(&mut channels);
        let active = channels.clear.add(id, Rc::new(handler));
        Subscription {
            id,
            kind: EventKind::Clear,
            active,
            registry: Rc::downgrade(&self.channels),
        }
    }

    /// Revokes a create subscription. Handles for the other channel and
    /// already revoked handles are ignored.
    pub fn unsubscribe_create(&self, subscription: &Subscription) {
        if subscription.kind == EventKind::Create {
            self.unsubscribe(subscription);
        }
    }

    /// Revokes a clear subscription. Handles for the other channel and
    /// already revoked handles are ignored.
    pub fn unsubscribe_clear(&self, subscription: &Subscription) {
        if subscription.kind == EventKind::Clear {
            self.unsubscribe(subscription);
        }
    }

    /// Revokes any subscription issued by this registry.
    ///
    /// Once this returns the handler is never invoked again, including by a
    /// dispatch that is already in progress. Handles issued by another
    /// registry are ignored.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        if !self.issued(subscription) {
            tracing::trace!(id = subscription.id, "ignoring subscription from another registry");
            return;
        }
        if !subscription.active.replace(false) {
            return;
        }
        let mut channels = self.channels.borrow_mut();
        match subscription.kind {
            EventKind::Create => channels.create.remove(subscription.id),
            EventKind::Clear => channels.clear.remove(subscription.id),
        }
        tracing::trace!(kind = ?subscription.kind, id = subscription.id, "subscription revoked");
    }

    /// Dispatches a create event to every current subscriber, in
    /// subscription order.
    pub fn publish_create(&self, request: &ToastRequest) {
        let subscribers = self.channels.borrow().create.snapshot();
        if subscribers.is_empty() {
            tracing::trace!("create event dropped: no container mounted");
        }
        dispatch(&subscribers, request);
    }

    /// Dispatches a clear event to every current subscriber, in
    /// subscription order.
    pub fn publish_clear(&self, request: &ClearRequest) {
        let subscribers = self.channels.borrow().clear.snapshot();
        dispatch(&subscribers, request);
    }

    /// Returns the number of live subscribers for an event.
    #[must_use]
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        let channels = self.channels.borrow();
        match kind {
            EventKind::Create => channels.create.subscribers.len(),
            EventKind::Clear => channels.clear.subscribers.len(),
        }
    }

    fn issued(&self, subscription: &Subscription) -> bool {
        std::ptr::eq(subscription.registry.as_ptr(), Rc::as_ptr(&self.channels))
    }

    fn allocate_id(channels: &mut Channels) -> u64 {
        let id = channels.next_id;
        channels.next_id += 1;
        id
    }
}

/// Runs handlers from a snapshot taken before the first call, so handlers may
/// subscribe or unsubscribe without disturbing the iteration.
fn dispatch<E>(subscribers: &[Subscriber<E>], event: &E) {
    for subscriber in subscribers {
        if subscriber.active.get() {
            (subscriber.handler)(event);
        }
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("create_subscribers", &self.subscriber_count(EventKind::Create))
            .field("clear_subscribers", &self.subscriber_count(EventKind::Clear))
            .finish()
    }
}
