//! Event dispatch.
//!
//! The dispatcher scans text against the rule catalogs and notifies the
//! listeners registered for each matching event's kind. Hosts that prefer
//! pulling events over callbacks can subscribe a channel-backed
//! [`EventStream`] instead.

/// The dispatcher and its configuration.
pub mod dispatcher;
/// Listener callbacks and registration handles.
pub mod listener;
/// Catalog-against-text scanning.
pub mod scanner;
/// Subscriber stream handle.
pub mod stream;

pub use dispatcher::{DispatchSummary, Dispatcher, DispatcherConfig, ListenerFailurePolicy};
pub use listener::{infallible, Infallible, Listener, ListenerError, ListenerId, ListenerResult};
pub use scanner::{RuleMatch, Scanner};
pub use stream::EventStream;
