//! Catalog scanning.
//!
//! The scanner tests every rule against one text buffer. Dungeon rules are
//! evaluated before status rules, each group in catalog order, and every
//! matching rule yields one event. Each pattern is searched for its first
//! match only.

use std::sync::Arc;

use crate::catalog::{Pattern, RuleCatalogs};
use crate::event::Event;

/// A rule that matched, with the slice of text it matched.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch<'c, 't> {
    pub event: Event,
    pub pattern: &'c Pattern,
    pub matched: &'t str,
}

/// Evaluates both catalogs against text.
#[derive(Debug, Clone)]
pub struct Scanner {
    catalogs: Arc<RuleCatalogs>,
}

impl Scanner {
    #[allow(missing_docs)]
    #[must_use]
    pub fn new(catalogs: Arc<RuleCatalogs>) -> Self {
        Self { catalogs }
    }

    /// The catalogs this scanner evaluates.
    #[must_use]
    pub fn catalogs(&self) -> &RuleCatalogs {
        &self.catalogs
    }

    /// Every matching rule, in scan order.
    #[must_use]
    pub fn matches<'c, 't>(&'c self, text: &'t str) -> Vec<RuleMatch<'c, 't>> {
        let mut out = Vec::new();

        for rule in self.catalogs.dungeon.rules() {
            if let Some(matched) = rule.pattern.find(text) {
                out.push(RuleMatch {
                    event: Event::dungeon(rule.event.as_str()),
                    pattern: &rule.pattern,
                    matched,
                });
            }
        }

        for rule in self.catalogs.status.rules() {
            if let Some(matched) = rule.pattern.find(text) {
                out.push(RuleMatch {
                    event: Event::status(rule.event.as_str(), rule.value.clone()),
                    pattern: &rule.pattern,
                    matched,
                });
            }
        }

        out
    }

    /// Events raised by `text`, in scan order.
    #[must_use]
    pub fn scan(&self, text: &str) -> Vec<Event> {
        self.matches(text).into_iter().map(|m| m.event).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DungeonCatalog, StatusCatalog};
    use crate::value::Value;

    fn scanner() -> Scanner {
        let dungeon = DungeonCatalog::builder()
            .pattern("engulfed", "you are engulfed")
            .pattern("fountain", "^there is a fountain here")
            .build()
            .unwrap();
        let status = StatusCatalog::builder()
            .rule("hunger", "you are hungry", "Hungry")
            .rule("hunger", "you are satiated", "Satiated")
            .build()
            .unwrap();
        Scanner::new(Arc::new(RuleCatalogs::new(dungeon, status)))
    }

    #[test]
    fn dungeon_events_precede_status_events() {
        let events = scanner().scan("You are hungry.\nYou are engulfed by the slime!");
        assert_eq!(events, vec![Event::dungeon("engulfed"), Event::status("hunger", "Hungry")]);
    }

    #[test]
    fn match_records_pattern_and_slice() {
        let s = scanner();
        let text = "It's dark.\nThere is a fountain here.";
        let m = s.matches(text);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].pattern.as_str(), "^there is a fountain here");
        assert_eq!(m[0].matched, "There is a fountain here");
    }

    #[test]
    fn first_match_only_per_pattern() {
        let events = scanner().scan("You are engulfed!\nYou are engulfed again!");
        assert_eq!(events, vec![Event::dungeon("engulfed")]);
    }

    #[test]
    fn status_value_comes_from_matching_rule() {
        let events = scanner().scan("You are satiated.");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].value(), Some(&Value::from("Satiated")));
    }

    #[test]
    fn no_match_yields_nothing() {
        assert!(scanner().scan("The door opens.").is_empty());
        assert!(Scanner::new(Arc::new(RuleCatalogs::empty())).scan("anything").is_empty());
    }
}
