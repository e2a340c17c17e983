//! Rule catalogs.
//!
//! A catalog is the complete, ordered set of rules for one event kind. The
//! dungeon catalog maps an event name to a list of patterns; the status
//! catalog maps an event name to patterns that each carry a value. Catalogs
//! are immutable once built, and their rule order is the order in which the
//! dispatcher scans them.
//!
//! Rules for the same event name stay grouped: adding patterns to an event
//! that already exists appends them to that event's group, which keeps the
//! position where the event was first declared.

/// JSON catalog documents.
pub mod loader;
/// Compiled text patterns.
pub mod pattern;

use crate::error::CatalogError;
use crate::event::EventKind;
use crate::value::Value;

pub use pattern::{CatalogConfig, Pattern};

/// A single dungeon rule: when `pattern` matches, raise `event`.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct DungeonRule {
    pub event: String,
    pub pattern: Pattern,
}

/// A single status rule: when `pattern` matches, raise `event` with `value`.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct StatusRule {
    pub event: String,
    pub pattern: Pattern,
    pub value: Value,
}

fn check_event_name(kind: EventKind, event: &str) -> Result<(), CatalogError> {
    if event.trim().is_empty() {
        return Err(CatalogError::EmptyEventName { kind });
    }
    Ok(())
}

fn compile(kind: EventKind, event: &str, source: String, config: &CatalogConfig) -> Result<Pattern, CatalogError> {
    Pattern::with_config(source.as_str(), config).map_err(|e| CatalogError::InvalidPattern {
        kind,
        event: event.to_string(),
        pattern: source,
        reason: e.to_string(),
    })
}

/// Ordered dungeon catalog: event name to patterns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DungeonCatalog {
    rules: Vec<DungeonRule>,
}

impl DungeonCatalog {
    /// Catalog with no rules.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starts a builder.
    #[must_use]
    pub fn builder() -> DungeonCatalogBuilder {
        DungeonCatalogBuilder::default()
    }

    /// Rules in scan order.
    pub fn rules(&self) -> impl Iterator<Item = &DungeonRule> {
        self.rules.iter()
    }

    /// Patterns declared for `event`, in order.
    pub fn patterns_for<'a>(&'a self, event: &'a str) -> impl Iterator<Item = &'a Pattern> + 'a {
        self.rules.iter().filter(move |r| r.event == event).map(|r| &r.pattern)
    }

    /// Distinct event names, in first-declared order.
    #[must_use]
    pub fn event_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for r in &self.rules {
            if names.last() != Some(&r.event.as_str()) {
                names.push(&r.event);
            }
        }
        names
    }

    /// Number of rules (patterns).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the catalog has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Builder for [`DungeonCatalog`]. Patterns are compiled by [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct DungeonCatalogBuilder {
    entries: Vec<(String, String)>,
    config: CatalogConfig,
}

impl DungeonCatalogBuilder {
    /// Sets the compilation settings.
    #[must_use]
    pub fn config(mut self, config: CatalogConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds one pattern for `event`.
    #[must_use]
    pub fn pattern(mut self, event: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.entries.push((event.into(), pattern.into()));
        self
    }

    /// Adds several patterns for `event`.
    #[must_use]
    pub fn patterns<I, S>(mut self, event: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let event = event.into();
        for p in patterns {
            self.entries.push((event.clone(), p.into()));
        }
        self
    }

    /// Compiles every pattern, failing on the first invalid one.
    pub fn build(self) -> Result<DungeonCatalog, CatalogError> {
        let mut rules: Vec<DungeonRule> = Vec::with_capacity(self.entries.len());
        for (event, source) in self.entries {
            check_event_name(EventKind::Dungeon, &event)?;
            let pattern = compile(EventKind::Dungeon, &event, source, &self.config)?;
            // Slot right after the event's existing group, or the end.
            let at = rules.iter().rposition(|r| r.event == event).map_or(rules.len(), |i| i + 1);
            rules.insert(at, DungeonRule { event, pattern });
        }
        Ok(DungeonCatalog { rules })
    }
}

/// Ordered status catalog: event name to (pattern, value) pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusCatalog {
    rules: Vec<StatusRule>,
}

impl StatusCatalog {
    /// Catalog with no rules.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starts a builder.
    #[must_use]
    pub fn builder() -> StatusCatalogBuilder {
        StatusCatalogBuilder::default()
    }

    /// Rules in scan order.
    pub fn rules(&self) -> impl Iterator<Item = &StatusRule> {
        self.rules.iter()
    }

    /// Value declared for `pattern` under `event`.
    #[must_use]
    pub fn value_for(&self, event: &str, pattern: &str) -> Option<&Value> {
        self.rules
            .iter()
            .find(|r| r.event == event && r.pattern.as_str() == pattern)
            .map(|r| &r.value)
    }

    /// Distinct event names, in first-declared order.
    #[must_use]
    pub fn event_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for r in &self.rules {
            if names.last() != Some(&r.event.as_str()) {
                names.push(&r.event);
            }
        }
        names
    }

    /// Number of rules (patterns).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the catalog has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Builder for [`StatusCatalog`].
///
/// Within one event, patterns behave like map keys: declaring the same
/// pattern twice keeps its original position and takes the later value.
#[derive(Debug, Clone, Default)]
pub struct StatusCatalogBuilder {
    entries: Vec<(String, String, Value)>,
    config: CatalogConfig,
}

impl StatusCatalogBuilder {
    /// Sets the compilation settings.
    #[must_use]
    pub fn config(mut self, config: CatalogConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds one (pattern, value) pair for `event`.
    #[must_use]
    pub fn rule(mut self, event: impl Into<String>, pattern: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push((event.into(), pattern.into(), value.into()));
        self
    }

    /// Compiles every pattern, failing on the first invalid one.
    pub fn build(self) -> Result<StatusCatalog, CatalogError> {
        let mut rules: Vec<StatusRule> = Vec::with_capacity(self.entries.len());
        for (event, source, value) in self.entries {
            check_event_name(EventKind::Status, &event)?;
            if let Some(existing) = rules
                .iter_mut()
                .find(|r| r.event == event && r.pattern.as_str() == source)
            {
                existing.value = value;
                continue;
            }
            let pattern = compile(EventKind::Status, &event, source, &self.config)?;
            let at = rules.iter().rposition(|r| r.event == event).map_or(rules.len(), |i| i + 1);
            rules.insert(at, StatusRule { event, pattern, value });
        }
        Ok(StatusCatalog { rules })
    }
}

/// The pair of catalogs a dispatcher scans: dungeon rules first, then status.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleCatalogs {
    pub dungeon: DungeonCatalog,
    pub status: StatusCatalog,
}

impl RuleCatalogs {
    /// Bundles two built catalogs.
    #[must_use]
    pub fn new(dungeon: DungeonCatalog, status: StatusCatalog) -> Self {
        Self { dungeon, status }
    }

    /// Both catalogs empty.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Total number of rules across both catalogs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dungeon.len() + self.status.len()
    }

    /// Returns true if neither catalog has rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dungeon.is_empty() && self.status.is_empty()
    }

    /// Stable digest of every rule in scan order.
    ///
    /// Two catalogs with the same rules in the same order share a
    /// fingerprint regardless of how they were built or loaded.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        let mut field = |bytes: &[u8]| {
            hasher.update(&(bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        };

        for r in self.dungeon.rules() {
            field(EventKind::Dungeon.as_str().as_bytes());
            field(r.event.as_bytes());
            field(r.pattern.as_str().as_bytes());
        }
        for r in self.status.rules() {
            field(EventKind::Status.as_str().as_bytes());
            field(r.event.as_bytes());
            field(r.pattern.as_str().as_bytes());
            field(r.value.type_name().as_bytes());
            field(r.value.to_string().as_bytes());
        }

        hasher.finalize().to_hex().to_string()
    }
}
