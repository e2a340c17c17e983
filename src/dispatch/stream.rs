use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, Weak};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::error::{DispatchError, EventResult};
use crate::event::{Event, EventKind};

use super::dispatcher::{remove_registration, ListenerTable};
use super::listener::ListenerId;

/// A subscription stream for one event kind.
///
/// Dropping this stream removes its listener from the dispatcher.
#[derive(Debug)]
pub struct EventStream {
    kind: EventKind,
    id: ListenerId,
    rx: Receiver<Event>,
    table: Weak<RwLock<ListenerTable>>,
    unregistered: AtomicBool,
}

impl EventStream {
    pub(crate) fn new(
        kind: EventKind,
        id: ListenerId,
        rx: Receiver<Event>,
        table: Weak<RwLock<ListenerTable>>,
    ) -> Self {
        Self {
            kind,
            id,
            rx,
            table,
            unregistered: AtomicBool::new(false),
        }
    }

    /// The kind this stream receives.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// The listener registration backing this stream.
    #[must_use]
    pub const fn listener_id(&self) -> ListenerId {
        self.id
    }

    /// Explicit unregistration. Idempotent.
    ///
    /// Events already queued can still be received afterwards.
    pub fn unsubscribe(&self) {
        if self.unregistered.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(table) = self.table.upgrade() {
            remove_registration(&table, self.kind, self.id);
        }
    }

    /// Receive the next event (blocking).
    pub fn recv(&self) -> EventResult<Event> {
        self.rx
            .recv()
            .map_err(|_| DispatchError::StreamDisconnected { kind: self.kind }.into())
    }

    /// Receive the next event with a timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> EventResult<Event> {
        self.rx.recv_timeout(timeout).map_err(|err| {
            let err = match err {
                RecvTimeoutError::Timeout => DispatchError::StreamTimeout {
                    kind: self.kind,
                    duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                },
                RecvTimeoutError::Disconnected => DispatchError::StreamDisconnected { kind: self.kind },
            };
            err.into()
        })
    }

    /// Next queued event, if any, without blocking.
    #[must_use]
    pub fn try_recv(&self) -> Option<Event> {
        self.rx.try_recv().ok()
    }

    /// Drains every queued event.
    #[must_use]
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{DungeonCatalog, RuleCatalogs, StatusCatalog};
    use crate::dispatch::{Dispatcher, DispatcherConfig};

    fn dispatcher(stream_capacity: usize) -> Dispatcher {
        Dispatcher::new(
            RuleCatalogs::new(
                DungeonCatalog::builder()
                    .pattern("engulfed", "you are engulfed")
                    .build()
                    .unwrap(),
                StatusCatalog::builder()
                    .rule("hunger", "you are hungry", "Hungry")
                    .build()
                    .unwrap(),
            ),
            DispatcherConfig {
                stream_capacity,
                ..DispatcherConfig::default()
            },
        )
    }

    #[test]
    fn stream_receives_events_of_its_kind() {
        let d = dispatcher(8);
        let stream = d.subscribe(EventKind::Status);
        assert_eq!(stream.kind(), EventKind::Status);

        d.process("You are engulfed. You are hungry.").unwrap();
        let ev = stream.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(ev, Event::status("hunger", "Hungry"));
        assert!(stream.try_recv().is_none());
    }

    #[test]
    fn full_stream_drops_without_failing_process() {
        let d = dispatcher(1);
        let stream = d.subscribe(EventKind::Dungeon);

        d.process("You are engulfed.").unwrap();
        d.process("You are engulfed.").unwrap();

        assert_eq!(d.dropped_events(), 1);
        assert_eq!(stream.drain().len(), 1);
    }

    #[test]
    fn dropping_stream_unregisters() {
        let d = dispatcher(8);
        let stream = d.subscribe(EventKind::Dungeon);
        assert_eq!(d.listener_count(EventKind::Dungeon), 1);
        drop(stream);
        assert_eq!(d.listener_count(EventKind::Dungeon), 0);
    }

    #[test]
    fn unsubscribe_is_idempotent_and_keeps_queued_events() {
        let d = dispatcher(8);
        let stream = d.subscribe(EventKind::Dungeon);
        d.process("You are engulfed.").unwrap();

        stream.unsubscribe();
        stream.unsubscribe();
        assert_eq!(d.listener_count(EventKind::Dungeon), 0);

        assert_eq!(stream.try_recv(), Some(Event::dungeon("engulfed")));
        let err = stream.recv().unwrap_err();
        assert!(matches!(
            err,
            crate::EventError::Dispatch(DispatchError::StreamDisconnected { kind: EventKind::Dungeon })
        ));
    }

    #[test]
    fn recv_timeout_reports_timeout() {
        let d = dispatcher(8);
        let stream = d.subscribe(EventKind::Dungeon);
        let err = stream.recv_timeout(Duration::from_millis(10)).unwrap_err();
        assert!(matches!(
            err,
            crate::EventError::Dispatch(DispatchError::StreamTimeout { duration_ms: 10, .. })
        ));
    }

    #[test]
    fn stream_outliving_dispatcher_disconnects() {
        let d = Arc::new(dispatcher(8));
        let stream = d.subscribe(EventKind::Dungeon);
        drop(d);
        assert!(stream.recv().is_err());
    }
}
