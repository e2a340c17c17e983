//! Error types for noobhack-events.
//!
//! All errors are strongly typed using thiserror. Catalog problems are
//! reported when a catalog is built or loaded; dispatch problems are
//! reported by the dispatcher while notifying listeners.

use thiserror::Error;

use crate::event::EventKind;

/// Errors raised while building or loading a rule catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid {kind} pattern for event '{event}': '{pattern}': {reason}")]
    InvalidPattern {
        kind: EventKind,
        event: String,
        pattern: String,
        reason: String,
    },

    #[error("Event name cannot be empty in the {kind} catalog")]
    EmptyEventName {
        kind: EventKind,
    },

    #[error("Malformed catalog document: {reason}")]
    Shape {
        reason: String,
    },

    #[error("Failed to parse catalog document: {message}")]
    Parse {
        message: String,
    },

    #[error("Failed to read catalog file '{path}': {message}")]
    Io {
        path: String,
        message: String,
    },
}

/// Errors raised while registering or notifying listeners.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unsupported event kind: '{kind}'")]
    UnsupportedEventKind {
        kind: String,
    },

    #[error("Listener #{position} for {kind} event '{event}' failed: {message}")]
    ListenerFailed {
        kind: EventKind,
        event: String,
        position: usize,
        message: String,
    },

    #[error("Event stream for {kind} events is disconnected")]
    StreamDisconnected {
        kind: EventKind,
    },

    #[error("Timed out after {duration_ms}ms waiting for a {kind} event")]
    StreamTimeout {
        kind: EventKind,
        duration_ms: u64,
    },
}

/// Top-level error type for noobhack-events.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

impl EventError {
    /// Returns true if this is a catalog error.
    #[must_use]
    pub const fn is_catalog(&self) -> bool {
        matches!(self, Self::Catalog(_))
    }

    /// Returns true if this is a dispatch error.
    #[must_use]
    pub const fn is_dispatch(&self) -> bool {
        matches!(self, Self::Dispatch(_))
    }

    /// Returns true if this error reports a failing listener.
    #[must_use]
    pub const fn is_listener_failure(&self) -> bool {
        matches!(self, Self::Dispatch(DispatchError::ListenerFailed { .. }))
    }
}

/// Result type alias for noobhack-events operations.
pub type EventResult<T> = Result<T, EventError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pattern_names_event_and_pattern() {
        let err = CatalogError::InvalidPattern {
            kind: EventKind::Dungeon,
            event: "engulfed".to_string(),
            pattern: "you are (engulfed".to_string(),
            reason: "unclosed group".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("dungeon"));
        assert!(msg.contains("engulfed"));
        assert!(msg.contains("you are (engulfed"));
    }

    #[test]
    fn test_unsupported_event_kind() {
        let err = DispatchError::UnsupportedEventKind {
            kind: "inventory".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("Unsupported event kind"));
        assert!(msg.contains("inventory"));
    }

    #[test]
    fn test_listener_failed() {
        let err = DispatchError::ListenerFailed {
            kind: EventKind::Status,
            event: "hunger".to_string(),
            position: 2,
            message: "boom".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("#2"));
        assert!(msg.contains("hunger"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_event_error_from_catalog() {
        let err: EventError = CatalogError::Parse {
            message: "eof".to_string(),
        }
        .into();
        assert!(err.is_catalog());
        assert!(!err.is_dispatch());
    }

    #[test]
    fn test_event_error_from_dispatch() {
        let err: EventError = DispatchError::UnsupportedEventKind {
            kind: "x".to_string(),
        }
        .into();
        assert!(err.is_dispatch());
        assert!(!err.is_listener_failure());
    }

    #[test]
    fn test_stream_timeout() {
        let err = DispatchError::StreamTimeout {
            kind: EventKind::Dungeon,
            duration_ms: 250,
        };
        let msg = format!("{err}");
        assert!(msg.contains("250ms"));
        assert!(msg.contains("dungeon"));
    }
}
