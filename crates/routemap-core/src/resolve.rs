//! Placeholder resolution and path prefixes.
//!
//! Pattern strings and configured prefixes may carry `${name}` placeholder
//! tokens. Resolution is delegated to an externally supplied resolver
//! function; the core passes each raw string through it and uses whatever
//! comes back, so unresolvable tokens degrade to pass-through rather than
//! erroring. Without a resolver, strings are used verbatim.
//!
//! Prefix rules pair a (placeholder-bearing) prefix string with a
//! predicate over the controller. Rules apply in registration order and
//! the first match wins; at most one prefix applies per controller.

use std::fmt;
use std::sync::Arc;

use crate::metadata::Controller;

/// Externally supplied placeholder resolver. Called synchronously, never
/// fails.
pub type EmbeddedValueResolver = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Resolve placeholders in each pattern string, preserving count and
/// order. Identity when no resolver is configured.
#[must_use]
pub fn resolve_embedded_values(
    patterns: &[String],
    resolver: Option<&EmbeddedValueResolver>,
) -> Vec<String> {
    match resolver {
        Some(resolve) => patterns.iter().map(|pattern| resolve(pattern)).collect(),
        None => patterns.to_vec(),
    }
}

/// One configured prefix rule.
pub struct PrefixRule {
    prefix: String,
    predicate: Box<dyn Fn(&Controller) -> bool + Send + Sync>,
}

impl PrefixRule {
    /// Create a rule from a raw prefix string and a controller predicate.
    #[must_use]
    pub fn new(
        prefix: impl Into<String>,
        predicate: impl Fn(&Controller) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            predicate: Box::new(predicate),
        }
    }

    /// The raw prefix string, placeholders unresolved.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether this rule applies to the controller.
    #[must_use]
    pub fn matches(&self, controller: &Controller) -> bool {
        (self.predicate)(controller)
    }
}

impl fmt::Debug for PrefixRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixRule")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of prefix rules; first match wins.
#[derive(Debug, Default)]
pub struct PathPrefixes {
    rules: Vec<PrefixRule>,
}

impl PathPrefixes {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule, in registration order.
    pub fn add(&mut self, rule: PrefixRule) {
        self.rules.push(rule);
    }

    /// Whether no rule is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The raw prefix of the first rule matching the controller, if any.
    #[must_use]
    pub fn prefix_for(&self, controller: &Controller) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(controller))
            .map(PrefixRule::prefix)
    }
}
