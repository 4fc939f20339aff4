//! Event Bus - in-process publish/subscribe between screens
//!
//! Screens that change backend state publish a named event; screens that
//! show that state subscribe to the name and reload. Neither side holds a
//! reference to the other.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 EventBus (name → ordered listeners)          │
//! │                                                              │
//! │  Publishers:                      Listeners:                 │
//! │  ├─ AppointmentAppService         ├─ calendar screen         │
//! │  ├─ CompetitionAppService         ├─ competition list        │
//! │  └─ WorkoutAppService             └─ leaderboard screen      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Delivery rules
//!
//! - Listeners run synchronously, in subscription order. The registry lock
//!   is never held while a listener runs.
//! - A listener that returns an error or panics is logged and skipped; the
//!   rest still run and the publisher never sees the failure.
//! - A publish issued while a delivery is in progress (from a listener or
//!   from another thread) is queued and delivered, in order, by the call
//!   that is already delivering.
//! - A listener unsubscribed mid-delivery is not invoked again.
//!
//! # Usage
//!
//! ```ignore
//! let bus = EventBus::new();
//!
//! // Screen mount: keep the guard for as long as the screen lives
//! let _guard = bus.subscribe(event_names::COMPETITION_CREATED, |_| {
//!     reload_competitions();
//!     Ok(())
//! })?;
//!
//! // Services get an emit-only handle
//! let sender = bus.sender();
//! sender.emit(&DomainEvent::CompetitionCreated { competition_id: None, name });
//! ```

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

use crate::domain::DomainEvent;
use crate::error::EventBusError;

/// Opaque data carried by an event
pub type EventData = serde_json::Value;

/// Outcome of one listener invocation
pub type ListenerResult = anyhow::Result<()>;

type Callback = Arc<dyn Fn(Option<&EventData>) -> ListenerResult + Send + Sync>;

#[derive(Clone)]
struct Listener {
    id: u64,
    active: Arc<AtomicBool>,
    callback: Callback,
}

struct PendingEvent {
    name: String,
    data: Option<EventData>,
}

#[derive(Default)]
struct Registry {
    listeners: HashMap<String, Vec<Listener>>,
    next_id: u64,
    pending: VecDeque<PendingEvent>,
    dispatching: bool,
}

impl Registry {
    fn remove(&mut self, event: &str, id: u64) {
        if let Some(list) = self.listeners.get_mut(event) {
            list.retain(|l| l.id != id);
            if list.is_empty() {
                self.listeners.remove(event);
            }
        }
    }

    fn snapshot(&self, event: &str) -> Vec<Listener> {
        self.listeners.get(event).cloned().unwrap_or_default()
    }
}

/// Event Bus - registry of named listeners
///
/// Cheap to clone; clones share the same registry. Construct one per
/// application and hand it (or an [`EventSender`]) to whoever needs it.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` under `event`
    ///
    /// The registration lives as long as the returned [`Subscription`].
    pub fn subscribe<F>(&self, event: &str, callback: F) -> Result<Subscription, EventBusError>
    where
        F: Fn(Option<&EventData>) -> ListenerResult + Send + Sync + 'static,
    {
        if event.is_empty() {
            return Err(EventBusError::EmptyEventName);
        }

        let active = Arc::new(AtomicBool::new(true));
        let id = {
            let mut registry = self.registry.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry
                .listeners
                .entry(event.to_string())
                .or_default()
                .push(Listener {
                    id,
                    active: active.clone(),
                    callback: Arc::new(callback),
                });
            id
        };

        debug!(event, listener = id, "[EventBus] Subscribed");

        Ok(Subscription {
            registry: Arc::downgrade(&self.registry),
            event: event.to_string(),
            id,
            active,
            detached: false,
        })
    }

    /// Invoke every listener of `event`, in subscription order
    ///
    /// Publishing a name nobody listens to is a no-op.
    pub fn publish(&self, event: &str, data: Option<EventData>) {
        {
            let mut registry = self.registry.lock();
            registry.pending.push_back(PendingEvent {
                name: event.to_string(),
                data,
            });
            if registry.dispatching {
                debug!(event, "[EventBus] Deferred publish until current delivery ends");
                return;
            }
            registry.dispatching = true;
        }

        loop {
            let (pending, listeners) = {
                let mut registry = self.registry.lock();
                let Some(pending) = registry.pending.pop_front() else {
                    registry.dispatching = false;
                    break;
                };
                let listeners = registry.snapshot(&pending.name);
                (pending, listeners)
            };
            deliver(&pending.name, pending.data.as_ref(), &listeners);
        }
    }

    /// Publish a domain event under its event name
    pub fn emit(&self, event: &DomainEvent) {
        let name = event.event_name();
        match serde_json::to_value(event) {
            Ok(data) => self.publish(name, Some(data)),
            Err(e) => {
                warn!(event = name, error = %e, "[EventBus] Failed to serialize event, publishing without data");
                self.publish(name, None);
            }
        }
    }

    /// Get an emit-only handle for services
    pub fn sender(&self) -> EventSender {
        EventSender { bus: self.clone() }
    }

    /// Number of listeners currently registered under `event`
    pub fn listener_count(&self, event: &str) -> usize {
        self.registry
            .lock()
            .listeners
            .get(event)
            .map_or(0, Vec::len)
    }
}

fn deliver(event: &str, data: Option<&EventData>, listeners: &[Listener]) {
    let mut invoked = 0usize;
    for listener in listeners {
        if !listener.active.load(Ordering::Acquire) {
            continue;
        }
        invoked += 1;
        match panic::catch_unwind(AssertUnwindSafe(|| (listener.callback)(data))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(event, listener = listener.id, error = %e, "[EventBus] Listener failed");
            }
            Err(_) => {
                warn!(event, listener = listener.id, "[EventBus] Listener panicked");
            }
        }
    }

    if invoked == 0 {
        debug!(event, "[EventBus] No listeners for event");
    } else {
        debug!(event, listeners = invoked, "[EventBus] Delivered event");
    }
}

/// Handle to one registration
///
/// Dropping the handle unsubscribes, so a screen that keeps it in its state
/// is released however it goes away. Call [`Subscription::detach`] for
/// registrations that should live as long as the bus.
#[must_use = "dropping a Subscription unsubscribes the listener immediately"]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    event: String,
    id: u64,
    active: Arc<AtomicBool>,
    detached: bool,
}

impl Subscription {
    /// Remove this registration
    ///
    /// Safe to call repeatedly and after the bus is gone.
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().remove(&self.event, self.id);
            debug!(event = %self.event, listener = self.id, "[EventBus] Unsubscribed");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    /// Keep the registration after this handle is dropped
    pub fn detach(mut self) {
        self.detached = true;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.detached {
            self.unsubscribe();
        }
    }
}

/// Event Sender - emit-only view of the bus given to application services
#[derive(Clone)]
pub struct EventSender {
    bus: EventBus,
}

impl EventSender {
    pub fn emit(&self, event: DomainEvent) {
        self.bus.emit(&event);
    }

    /// Check if anyone listens for `event`
    pub fn has_listeners(&self, event: &str) -> bool {
        self.bus.listener_count(event) > 0
    }
}

// ============================================================================
// TESTS
// ============================================================================
