//! Event kinds and the typed events handed to listeners.
//!
//! Dungeon events carry only the rule's event name; status events carry the
//! event name together with the value the matching status rule declares.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::value::Value;

/// The two top-level categories of observable occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Raised by the dungeon catalog (`{name}` payload).
    Dungeon,
    /// Raised by the status catalog (`{name, value}` payload).
    Status,
}

impl EventKind {
    /// Every kind, in catalog scan order.
    pub const ALL: [Self; 2] = [Self::Dungeon, Self::Status];

    /// Wire name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dungeon => "dungeon",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dungeon" => Ok(Self::Dungeon),
            "status" => Ok(Self::Status),
            _ => Err(DispatchError::UnsupportedEventKind { kind: s.to_string() }),
        }
    }
}

/// Payload of a dungeon event.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonEvent {
    pub name: String,
}

/// Payload of a status event.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub name: String,
    pub value: Value,
}

/// An event synthesized from a rule match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// A dungeon rule matched.
    Dungeon(DungeonEvent),
    /// A status rule matched.
    Status(StatusEvent),
}

impl Event {
    /// Creates a dungeon event.
    #[must_use]
    pub fn dungeon(name: impl Into<String>) -> Self {
        Self::Dungeon(DungeonEvent { name: name.into() })
    }

    /// Creates a status event.
    #[must_use]
    pub fn status(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Status(StatusEvent {
            name: name.into(),
            value: value.into(),
        })
    }

    /// The kind this event is dispatched under.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Dungeon(_) => EventKind::Dungeon,
            Self::Status(_) => EventKind::Status,
        }
    }

    /// The event name declared by the matching rule.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Dungeon(e) => &e.name,
            Self::Status(e) => &e.name,
        }
    }

    /// The status value, if this is a status event.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Dungeon(_) => None,
            Self::Status(e) => Some(&e.value),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dungeon(e) => write!(f, "dungeon:{}", e.name),
            Self::Status(e) => write!(f, "status:{}={}", e.name, e.value),
        }
    }
}
