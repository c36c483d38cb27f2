// Event bus - Synchronous, ordered publish/subscribe for workout events
// One bus is created by the host and shared with the player (no global instance)

use super::event::{EventKind, WorkoutEvent};
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Error a subscriber may return; logged by the bus, never propagated
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct SubscriberError(pub String);

impl SubscriberError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Anything that consumes workout events (display widgets, narration, logging)
pub trait Subscriber {
    fn handle(&mut self, event: &WorkoutEvent) -> Result<(), SubscriberError>;
}

impl<F> Subscriber for F
where
    F: FnMut(&WorkoutEvent) -> Result<(), SubscriberError>,
{
    fn handle(&mut self, event: &WorkoutEvent) -> Result<(), SubscriberError> {
        self(event)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type SharedSubscriber = Rc<RefCell<dyn Subscriber>>;

struct Subscription {
    id: SubscriptionId,
    /// None = every event
    filter: Option<EventKind>,
    handler: SharedSubscriber,
}

impl Subscription {
    fn wants(&self, kind: EventKind) -> bool {
        self.filter.is_none_or(|k| k == kind)
    }
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    subscriptions: Vec<Subscription>,
    failures: u64,
}

/// Typed publish/subscribe channel
///
/// Delivery is synchronous: every matching subscriber runs, in subscription
/// order, before `publish` returns. A subscriber that errors or panics is
/// logged and skipped; the others still receive the event.
///
/// Subscriptions added or removed from inside a handler take effect from the
/// next published event.
#[derive(Default)]
pub struct EventBus {
    inner: RefCell<BusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a single event kind
    pub fn subscribe<S>(&self, kind: EventKind, subscriber: S) -> SubscriptionId
    where
        S: Subscriber + 'static,
    {
        self.insert(Some(kind), Rc::new(RefCell::new(subscriber)))
    }

    /// Subscribe to every event
    pub fn subscribe_all<S>(&self, subscriber: S) -> SubscriptionId
    where
        S: Subscriber + 'static,
    {
        self.insert(None, Rc::new(RefCell::new(subscriber)))
    }

    /// Subscribe a handler the caller keeps a handle to (e.g. to read its state)
    pub fn subscribe_shared<S>(
        &self,
        filter: Option<EventKind>,
        subscriber: Rc<RefCell<S>>,
    ) -> SubscriptionId
    where
        S: Subscriber + 'static,
    {
        self.insert(filter, subscriber)
    }

    /// Closure shorthand for `subscribe`
    pub fn on<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&WorkoutEvent) -> Result<(), SubscriberError> + 'static,
    {
        self.subscribe(kind, handler)
    }

    /// Closure shorthand for `subscribe_all`
    pub fn on_any<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&WorkoutEvent) -> Result<(), SubscriberError> + 'static,
    {
        self.subscribe_all(handler)
    }

    fn insert(&self, filter: Option<EventKind>, handler: SharedSubscriber) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.subscriptions.push(Subscription {
            id,
            filter,
            handler,
        });
        id
    }

    /// Remove a subscription; returns false if it was already gone
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscriptions.len();
        inner.subscriptions.retain(|sub| sub.id != id);
        inner.subscriptions.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscriptions.len()
    }

    /// Number of handler invocations that errored, panicked or were skipped
    pub fn failure_count(&self) -> u64 {
        self.inner.borrow().failures
    }

    /// Deliver an event to every matching subscriber
    ///
    /// Returns the number of subscribers that handled it successfully.
    pub fn publish(&self, event: &WorkoutEvent) -> usize {
        let kind = event.kind();

        // Snapshot so handlers may (un)subscribe while we iterate
        let targets: Vec<(SubscriptionId, SharedSubscriber)> = self
            .inner
            .borrow()
            .subscriptions
            .iter()
            .filter(|sub| sub.wants(kind))
            .map(|sub| (sub.id, Rc::clone(&sub.handler)))
            .collect();

        let mut delivered = 0;
        for (id, handler) in targets {
            if self.deliver(id, &handler, event) {
                delivered += 1;
            } else {
                self.inner.borrow_mut().failures += 1;
            }
        }
        delivered
    }

    fn deliver(
        &self,
        id: SubscriptionId,
        handler: &SharedSubscriber,
        event: &WorkoutEvent,
    ) -> bool {
        let Ok(mut subscriber) = handler.try_borrow_mut() else {
            log::warn!("Subscriber {:?} is busy, skipping '{}' event", id, event.name());
            return false;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| subscriber.handle(event))) {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                log::warn!("Subscriber {:?} failed on '{}': {}", id, event.name(), e);
                false
            }
            Err(_) => {
                log::error!("Subscriber {:?} panicked on '{}'", id, event.name());
                false
            }
        }
    }
}
