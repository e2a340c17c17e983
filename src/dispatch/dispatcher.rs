//! The event dispatcher.
//!
//! The dispatcher owns the listener table and the rule catalogs. `process`
//! scans a text buffer and notifies listeners synchronously, in registration
//! order, before returning. There is no global instance: the host constructs
//! one dispatcher and shares it (typically as `Arc<Dispatcher>`).

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crossbeam_channel::{bounded, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::catalog::RuleCatalogs;
use crate::error::{DispatchError, EventResult};
use crate::event::{Event, EventKind};

use super::listener::{Listener, ListenerId, ListenerResult};
use super::scanner::Scanner;
use super::stream::EventStream;

/// What the dispatcher does when a listener returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerFailurePolicy {
    /// Stop notifying and return the failure to the caller.
    #[default]
    Propagate,
    /// Log the failure and continue with the next listener.
    Isolate,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Listener failure handling.
    pub failure_policy: ListenerFailurePolicy,
    /// Per-subscription stream buffer capacity.
    pub stream_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            failure_policy: ListenerFailurePolicy::Propagate,
            stream_capacity: 1024,
        }
    }
}

/// Counters for one `dispatch` or `process` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DispatchSummary {
    /// Events dispatched.
    pub events: usize,
    /// Listener invocations, including failed ones.
    pub listener_calls: usize,
    /// Listener failures absorbed under [`ListenerFailurePolicy::Isolate`].
    pub listener_failures: usize,
}

impl DispatchSummary {
    fn absorb(&mut self, other: Self) {
        self.events += other.events;
        self.listener_calls += other.listener_calls;
        self.listener_failures += other.listener_failures;
    }
}

#[derive(Clone)]
pub(crate) struct Registration {
    id: ListenerId,
    listener: Arc<dyn Listener>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration").field("id", &self.id).finish_non_exhaustive()
    }
}

pub(crate) type ListenerTable = HashMap<EventKind, Vec<Registration>>;

/// Removes one registration from a shared table.
///
/// The removed listener is dropped after the lock is released, since its
/// destructor may itself touch the table.
pub(crate) fn remove_registration(table: &RwLock<ListenerTable>, kind: EventKind, id: ListenerId) -> bool {
    let removed = {
        let mut guard = table.write().unwrap_or_else(PoisonError::into_inner);
        guard
            .get_mut(&kind)
            .and_then(|list| list.iter().position(|r| r.id == id).map(|at| list.remove(at)))
    };
    if removed.is_some() {
        trace!(%kind, %id, "listener removed");
    }
    removed.is_some()
}

/// Classifies text against rule catalogs and notifies listeners.
pub struct Dispatcher {
    config: DispatcherConfig,
    scanner: Scanner,
    listeners: Arc<RwLock<ListenerTable>>,
    dropped_events: Arc<AtomicU64>,
}

impl Dispatcher {
    /// Creates a dispatcher over fixed catalogs.
    #[must_use]
    pub fn new(catalogs: RuleCatalogs, config: DispatcherConfig) -> Self {
        debug!(
            dungeon_rules = catalogs.dungeon.len(),
            status_rules = catalogs.status.len(),
            fingerprint = %catalogs.fingerprint(),
            policy = ?config.failure_policy,
            "dispatcher created"
        );
        Self {
            config,
            scanner: Scanner::new(Arc::new(catalogs)),
            listeners: Arc::new(RwLock::new(HashMap::new())),
            dropped_events: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Creates a dispatcher with the default configuration.
    #[must_use]
    pub fn with_catalogs(catalogs: RuleCatalogs) -> Self {
        Self::new(catalogs, DispatcherConfig::default())
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// The catalogs scanned by `process`.
    #[must_use]
    pub fn catalogs(&self) -> &RuleCatalogs {
        self.scanner.catalogs()
    }

    /// Appends `listener` to the list for `kind`.
    ///
    /// Duplicates are accepted; each registration is invoked once per
    /// dispatch and has its own id.
    pub fn add_event_listener<L>(&self, kind: EventKind, listener: L) -> ListenerId
    where
        L: Listener + 'static,
    {
        self.register(kind, Arc::new(listener))
    }

    /// String-keyed form of [`add_event_listener`](Self::add_event_listener).
    pub fn add_event_listener_named<L>(&self, kind: &str, listener: L) -> EventResult<ListenerId>
    where
        L: Listener + 'static,
    {
        let kind: EventKind = kind.parse()?;
        Ok(self.add_event_listener(kind, listener))
    }

    fn register(&self, kind: EventKind, listener: Arc<dyn Listener>) -> ListenerId {
        let id = ListenerId::new();
        let mut guard = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        guard.entry(kind).or_default().push(Registration { id, listener });
        trace!(%kind, %id, "listener added");
        id
    }

    /// Removes the registration `id` from `kind`'s list.
    ///
    /// Returns false if no such registration exists. A dispatch already in
    /// progress still notifies the removed listener.
    pub fn remove_event_listener(&self, kind: EventKind, id: ListenerId) -> bool {
        remove_registration(&self.listeners, kind, id)
    }

    /// Removes every listener for `kind`, returning how many were removed.
    pub fn clear_listeners(&self, kind: EventKind) -> usize {
        let removed = {
            let mut guard = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
            guard.remove(&kind)
        };
        removed.map_or(0, |list| list.len())
    }

    /// Number of registrations for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        let guard = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        guard.get(&kind).map_or(0, Vec::len)
    }

    /// Registers a channel-backed listener and returns its stream.
    ///
    /// Events are queued without blocking; when the stream's buffer is full
    /// the event is dropped and counted in [`dropped_events`](Self::dropped_events).
    #[must_use]
    pub fn subscribe(&self, kind: EventKind) -> EventStream {
        let (tx, rx) = bounded::<Event>(self.config.stream_capacity.max(1));
        let forwarder = Forwarder {
            tx,
            dropped: Arc::clone(&self.dropped_events),
        };
        let id = self.register(kind, Arc::new(forwarder));
        EventStream::new(kind, id, rx, Arc::downgrade(&self.listeners))
    }

    /// Events dropped because a subscriber stream was full or gone.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events.load(Ordering::Relaxed)
    }

    /// Invokes every listener registered for the event's kind.
    pub fn dispatch(&self, event: &Event) -> EventResult<DispatchSummary> {
        let listeners = self.snapshot(event.kind());
        let mut summary = self.notify(&listeners, event)?;
        summary.events = 1;
        Ok(summary)
    }

    /// Events `text` would raise, without notifying anyone.
    #[must_use]
    pub fn scan(&self, text: &str) -> Vec<Event> {
        self.scanner.scan(text)
    }

    /// Scans `text` against both catalogs and dispatches every match.
    ///
    /// The listener lists are captured when the call starts; listeners
    /// added while it runs are not invoked for this text.
    pub fn process(&self, text: &str) -> EventResult<DispatchSummary> {
        let dungeon = self.snapshot(EventKind::Dungeon);
        let status = self.snapshot(EventKind::Status);

        let mut summary = DispatchSummary::default();
        for m in self.scanner.matches(text) {
            debug!(event = %m.event, pattern = m.pattern.as_str(), matched = m.matched, "rule matched");
            let listeners = match m.event.kind() {
                EventKind::Dungeon => &dungeon,
                EventKind::Status => &status,
            };
            summary.absorb(self.notify(listeners, &m.event)?);
            summary.events += 1;
        }
        Ok(summary)
    }

    fn snapshot(&self, kind: EventKind) -> Vec<Registration> {
        let guard = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        guard.get(&kind).cloned().unwrap_or_default()
    }

    fn notify(&self, listeners: &[Registration], event: &Event) -> EventResult<DispatchSummary> {
        let mut summary = DispatchSummary::default();
        for (position, reg) in listeners.iter().enumerate() {
            summary.listener_calls += 1;
            let Err(e) = reg.listener.on_event(event) else {
                continue;
            };
            match self.config.failure_policy {
                ListenerFailurePolicy::Propagate => {
                    return Err(DispatchError::ListenerFailed {
                        kind: event.kind(),
                        event: event.name().to_string(),
                        position,
                        message: e.to_string(),
                    }
                    .into());
                }
                ListenerFailurePolicy::Isolate => {
                    warn!(
                        kind = %event.kind(),
                        event = event.name(),
                        position,
                        listener = %reg.id,
                        error = %e,
                        "listener failed; continuing"
                    );
                    summary.listener_failures += 1;
                }
            }
        }
        Ok(summary)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("catalogs", self.scanner.catalogs())
            .field("dungeon_listeners", &self.listener_count(EventKind::Dungeon))
            .field("status_listeners", &self.listener_count(EventKind::Status))
            .finish_non_exhaustive()
    }
}

/// Listener that forwards events into a subscriber stream.
struct Forwarder {
    tx: Sender<Event>,
    dropped: Arc<AtomicU64>,
}

impl Listener for Forwarder {
    fn on_event(&self, event: &Event) -> ListenerResult {
        // Never block the dispatching thread: drop if the subscriber is slow.
        match self.tx.try_send(event.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(event = %event, "subscriber stream unavailable; event dropped");
            }
        }
        Ok(())
    }
}
