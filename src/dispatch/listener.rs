//! Listener callbacks and their registration handles.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::event::Event;

/// Handle for one listener registration.
///
/// Every call to `add_event_listener` yields a fresh id, so registering the
/// same callback twice produces two independently removable registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListenerId(Uuid);

impl ListenerId {
    /// Create a new random listener id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Failure reported by a listener.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ListenerError {
    message: String,
}

impl ListenerError {
    /// Creates a listener error with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result returned by a listener.
pub type ListenerResult = Result<(), ListenerError>;

/// A callback notified of dispatched events.
///
/// The event carries its own kind (`Event::kind`) alongside the payload.
/// Listeners run synchronously on the thread that called `process` or
/// `dispatch`.
pub trait Listener: Send + Sync {
    /// Handles one event.
    fn on_event(&self, event: &Event) -> ListenerResult;
}

impl<F> Listener for F
where
    F: Fn(&Event) -> ListenerResult + Send + Sync,
{
    fn on_event(&self, event: &Event) -> ListenerResult {
        self(event)
    }
}

/// Adapter for callbacks that cannot fail.
pub struct Infallible<F>(F);

impl<F> Listener for Infallible<F>
where
    F: Fn(&Event) + Send + Sync,
{
    fn on_event(&self, event: &Event) -> ListenerResult {
        (self.0)(event);
        Ok(())
    }
}

/// Wraps a callback that never fails.
///
/// ```
/// use noobhack_events::dispatch::infallible;
/// use noobhack_events::Event;
///
/// let listener = infallible(|event: &Event| println!("{event}"));
/// # let _ = listener;
/// ```
pub fn infallible<F>(f: F) -> Infallible<F>
where
    F: Fn(&Event) + Send + Sync,
{
    Infallible(f)
}
