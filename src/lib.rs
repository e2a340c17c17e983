//! # noobhack-events - pattern-driven events for terminal game output
//!
//! noobhack-events classifies text produced by a running terminal game
//! against fixed catalogs of regular-expression rules and notifies listeners
//! when a rule matches.
//!
//! ## Core Concepts
//!
//! - **Catalog**: the ordered rules for one event kind. Dungeon rules map an
//!   event name to patterns; status rules map an event name to
//!   pattern/value pairs.
//! - **Event**: a typed occurrence, either `Dungeon { name }` or
//!   `Status { name, value }`.
//! - **Dispatcher**: owns the listener table; `process(text)` scans the text
//!   and calls every listener for each matching event, in registration order.
//!
//! Patterns are case-insensitive and multiline (`^`/`$` match per line).
//! Each pattern matches at most once per `process` call, and every matching
//! rule raises its own event.
//!
//! ## Usage
//!
//! ```
//! use std::sync::{Arc, Mutex};
//!
//! use noobhack_events::dispatch::infallible;
//! use noobhack_events::{
//!     Dispatcher, DungeonCatalog, Event, EventKind, RuleCatalogs, StatusCatalog,
//! };
//!
//! let catalogs = RuleCatalogs::new(
//!     DungeonCatalog::builder()
//!         .pattern("engulfed", "you are engulfed")
//!         .build()?,
//!     StatusCatalog::builder()
//!         .rule("hunger", "you are hungry", "Hungry")
//!         .rule("hunger", "you are satiated", "Satiated")
//!         .build()?,
//! );
//!
//! let dispatcher = Dispatcher::with_catalogs(catalogs);
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! dispatcher.add_event_listener(
//!     EventKind::Status,
//!     infallible(move |event: &Event| sink.lock().unwrap().push(event.clone())),
//! );
//!
//! dispatcher.process("You are hungry.")?;
//! assert_eq!(*seen.lock().unwrap(), vec![Event::status("hunger", "Hungry")]);
//! # Ok::<(), noobhack_events::EventError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod value;

// Re-export primary types at crate root for convenience
pub use catalog::{
    CatalogConfig, DungeonCatalog, DungeonRule, Pattern, RuleCatalogs, StatusCatalog, StatusRule,
};
pub use dispatch::{
    DispatchSummary, Dispatcher, DispatcherConfig, EventStream, Listener, ListenerError,
    ListenerFailurePolicy, ListenerId, ListenerResult,
};
pub use error::{CatalogError, DispatchError, EventError, EventResult};
pub use event::{DungeonEvent, Event, EventKind, StatusEvent};
pub use value::Value;
