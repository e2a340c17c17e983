//! Compiled text patterns.
//!
//! Every pattern is compiled case-insensitive with multiline anchors, so
//! `^`/`$` match at line boundaries inside a screen buffer.

use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Compilation settings shared by every pattern in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Upper bound, in bytes, on the compiled program of a single pattern.
    pub regex_size_limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            regex_size_limit: 2 * (1 << 20),
        }
    }
}

/// A compiled, case-insensitive, multiline regular expression.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `source` with the default [`CatalogConfig`].
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        Self::with_config(source, &CatalogConfig::default())
    }

    /// Compiles `source` with explicit settings.
    pub fn with_config(source: impl Into<String>, config: &CatalogConfig) -> Result<Self, regex::Error> {
        let source = source.into();
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .multi_line(true)
            .size_limit(config.regex_size_limit)
            .build()?;
        Ok(Self { source, regex })
    }

    /// The pattern text as written in the catalog.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if the pattern matches anywhere in `text`.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Returns the first matching slice of `text`, if any.
    #[must_use]
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.find(text).map(|m| m.as_str())
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/im", self.source)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_is_case_insensitive() {
        let p = Pattern::new("you are engulfed").unwrap();
        assert!(p.is_match("You Are ENGULFED by the slime!"));
    }

    #[test]
    fn test_pattern_anchors_are_per_line() {
        let p = Pattern::new("^welcome to .*'s general store").unwrap();
        let screen = "Things that are here:\nWelcome to Asidonhopo's general store!\n";
        assert!(p.is_match(screen));
        assert_eq!(p.find(screen), Some("Welcome to Asidonhopo's general store"));
    }

    #[test]
    fn test_pattern_no_match() {
        let p = Pattern::new("there is an altar").unwrap();
        assert!(!p.is_match("There is a fountain here."));
        assert!(p.find("There is a fountain here.").is_none());
    }

    #[test]
    fn test_pattern_rejects_invalid_regex() {
        assert!(Pattern::new("you are (engulfed").is_err());
    }

    #[test]
    fn test_pattern_respects_size_limit() {
        let tiny = CatalogConfig { regex_size_limit: 16 };
        assert!(Pattern::with_config(r"\w{50}", &tiny).is_err());
    }

    #[test]
    fn test_pattern_equality_is_by_source() {
        assert_eq!(Pattern::new("abc").unwrap(), Pattern::new("abc").unwrap());
        assert_ne!(Pattern::new("abc").unwrap(), Pattern::new("abd").unwrap());
    }

    #[test]
    fn test_pattern_display() {
        let p = Pattern::new("you feel hungry").unwrap();
        assert_eq!(p.to_string(), "/you feel hungry/im");
        assert_eq!(p.as_str(), "you feel hungry");
    }

    #[test]
    fn test_catalog_config_deserializes_with_defaults() {
        let cfg: CatalogConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, CatalogConfig::default());
    }
}
