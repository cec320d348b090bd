//! Request conditions: the six building blocks of a route descriptor.
//!
//! Each condition is an immutable value type over an ordered, deduplicated
//! set of expressions. An empty condition matches any request (wildcard),
//! never no request. Conditions combine with AND semantics at dispatch
//! time; here each type only carries its class-level/method-level combine
//! rule:
//!
//! - patterns: cartesian concatenation (class prefix, method suffix)
//! - methods: method-level replaces class-level when non-empty
//! - params/headers: union of both levels
//! - consumes/produces: method-level replaces class-level when non-empty

use std::fmt;

use crate::media::MediaTypeExpression;
use crate::method::Method;
use crate::pattern::PathPattern;

/// A `name[=value]` expression over request params or headers, optionally
/// negated: `name`, `!name`, `name=value`, `name!=value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameValueExpression {
    name: String,
    value: Option<String>,
    negated: bool,
}

impl NameValueExpression {
    /// Parse an expression string.
    #[must_use]
    pub fn parse(expression: &str) -> Self {
        let expression = expression.trim();
        if let Some((name, value)) = expression.split_once("!=") {
            return Self {
                name: name.to_owned(),
                value: Some(value.to_owned()),
                negated: true,
            };
        }
        if let Some((name, value)) = expression.split_once('=') {
            return Self {
                name: name.to_owned(),
                value: Some(value.to_owned()),
                negated: false,
            };
        }
        match expression.strip_prefix('!') {
            Some(name) => Self {
                name: name.to_owned(),
                value: None,
                negated: true,
            },
            None => Self {
                name: expression.to_owned(),
                value: None,
                negated: false,
            },
        }
    }

    /// The param or header name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The expected value, if the expression constrains one.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether the expression is negated.
    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

impl fmt::Display for NameValueExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, self.negated) {
            (Some(value), true) => write!(f, "{}!={}", self.name, value),
            (Some(value), false) => write!(f, "{}={}", self.name, value),
            (None, true) => write!(f, "!{}", self.name),
            (None, false) => f.write_str(&self.name),
        }
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// The path patterns a route matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PatternsCondition {
    patterns: Vec<PathPattern>,
}

impl PatternsCondition {
    /// Build a condition from compiled patterns, deduplicating while
    /// preserving order.
    #[must_use]
    pub fn new(patterns: impl IntoIterator<Item = PathPattern>) -> Self {
        let mut unique = Vec::new();
        for pattern in patterns {
            push_unique(&mut unique, pattern);
        }
        Self { patterns: unique }
    }

    /// The compiled patterns, in declaration order.
    #[must_use]
    pub fn patterns(&self) -> &[PathPattern] {
        &self.patterns
    }

    /// Whether no pattern is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Combine class-level (`self`) with method-level patterns.
    ///
    /// Cartesian concatenation when both are non-empty, inherit the
    /// non-empty side otherwise, and the empty/root pattern when both are
    /// empty.
    #[must_use]
    pub fn combine(&self, method_level: &PatternsCondition) -> PatternsCondition {
        if self.is_empty() && method_level.is_empty() {
            return PatternsCondition::new([PathPattern::parse("")]);
        }
        if method_level.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return method_level.clone();
        }
        PatternsCondition::new(self.patterns.iter().flat_map(|prefix| {
            method_level
                .patterns
                .iter()
                .map(move |suffix| prefix.combine(suffix))
        }))
    }
}

/// The HTTP methods a route matches. Empty matches any verb.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MethodsCondition {
    methods: Vec<Method>,
}

impl MethodsCondition {
    /// Build a condition from methods, deduplicating while preserving
    /// order.
    #[must_use]
    pub fn new(methods: impl IntoIterator<Item = Method>) -> Self {
        let mut unique = Vec::new();
        for method in methods {
            push_unique(&mut unique, method);
        }
        Self { methods: unique }
    }

    /// The declared methods.
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Whether any verb matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Method-level verbs replace class-level verbs entirely when present.
    #[must_use]
    pub fn combine(&self, method_level: &MethodsCondition) -> MethodsCondition {
        if method_level.is_empty() {
            self.clone()
        } else {
            method_level.clone()
        }
    }
}

/// Query parameter constraints. Both levels must hold, so combining takes
/// the union of the expression sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ParamsCondition {
    expressions: Vec<NameValueExpression>,
}

impl ParamsCondition {
    /// Build a condition from expressions, deduplicating while preserving
    /// order.
    #[must_use]
    pub fn new(expressions: impl IntoIterator<Item = NameValueExpression>) -> Self {
        let mut unique = Vec::new();
        for expression in expressions {
            push_unique(&mut unique, expression);
        }
        Self { expressions: unique }
    }

    /// The declared expressions.
    #[must_use]
    pub fn expressions(&self) -> &[NameValueExpression] {
        &self.expressions
    }

    /// Whether no constraint is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// Union of class-level and method-level expressions.
    #[must_use]
    pub fn combine(&self, method_level: &ParamsCondition) -> ParamsCondition {
        ParamsCondition::new(
            self.expressions
                .iter()
                .chain(method_level.expressions.iter())
                .cloned(),
        )
    }
}

/// Header constraints. Same union semantics as [`ParamsCondition`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HeadersCondition {
    expressions: Vec<NameValueExpression>,
}

impl HeadersCondition {
    /// Build a condition from expressions, deduplicating while preserving
    /// order.
    #[must_use]
    pub fn new(expressions: impl IntoIterator<Item = NameValueExpression>) -> Self {
        let mut unique = Vec::new();
        for expression in expressions {
            push_unique(&mut unique, expression);
        }
        Self { expressions: unique }
    }

    /// The declared expressions.
    #[must_use]
    pub fn expressions(&self) -> &[NameValueExpression] {
        &self.expressions
    }

    /// Whether no constraint is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// Union of class-level and method-level expressions.
    #[must_use]
    pub fn combine(&self, method_level: &HeadersCondition) -> HeadersCondition {
        HeadersCondition::new(
            self.expressions
                .iter()
                .chain(method_level.expressions.iter())
                .cloned(),
        )
    }
}

/// The request body content types a route accepts, plus whether a body is
/// required at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConsumesCondition {
    expressions: Vec<MediaTypeExpression>,
    body_required: bool,
}

impl Default for ConsumesCondition {
    fn default() -> Self {
        Self {
            expressions: Vec::new(),
            body_required: true,
        }
    }
}

impl ConsumesCondition {
    /// Build a condition from expressions, deduplicating while preserving
    /// order. The body is required by default.
    #[must_use]
    pub fn new(expressions: impl IntoIterator<Item = MediaTypeExpression>) -> Self {
        let mut unique = Vec::new();
        for expression in expressions {
            push_unique(&mut unique, expression);
        }
        Self {
            expressions: unique,
            body_required: true,
        }
    }

    /// Set whether a request body is required.
    #[must_use]
    pub fn body_required(mut self, required: bool) -> Self {
        self.body_required = required;
        self
    }

    /// The declared expressions.
    #[must_use]
    pub fn expressions(&self) -> &[MediaTypeExpression] {
        &self.expressions
    }

    /// The consumable media types, excluding negated expressions.
    #[must_use]
    pub fn consumable_media_types(&self) -> Vec<&crate::media::MediaType> {
        self.expressions
            .iter()
            .filter(|expr| !expr.is_negated())
            .map(MediaTypeExpression::media_type)
            .collect()
    }

    /// Whether no content type constraint is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// Whether a request body is required.
    #[must_use]
    pub fn is_body_required(&self) -> bool {
        self.body_required
    }

    /// Method-level expressions fully replace class-level ones when
    /// present. The body-required flag always comes from the method level.
    #[must_use]
    pub fn combine(&self, method_level: &ConsumesCondition) -> ConsumesCondition {
        let expressions = if method_level.is_empty() {
            self.expressions.clone()
        } else {
            method_level.expressions.clone()
        };
        ConsumesCondition {
            expressions,
            body_required: method_level.body_required,
        }
    }
}

/// The response content types a route can produce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProducesCondition {
    expressions: Vec<MediaTypeExpression>,
}

impl ProducesCondition {
    /// Build a condition from expressions, deduplicating while preserving
    /// order.
    #[must_use]
    pub fn new(expressions: impl IntoIterator<Item = MediaTypeExpression>) -> Self {
        let mut unique = Vec::new();
        for expression in expressions {
            push_unique(&mut unique, expression);
        }
        Self { expressions: unique }
    }

    /// The declared expressions.
    #[must_use]
    pub fn expressions(&self) -> &[MediaTypeExpression] {
        &self.expressions
    }

    /// The producible media types, excluding negated expressions.
    #[must_use]
    pub fn producible_media_types(&self) -> Vec<&crate::media::MediaType> {
        self.expressions
            .iter()
            .filter(|expr| !expr.is_negated())
            .map(MediaTypeExpression::media_type)
            .collect()
    }

    /// Whether no content type constraint is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// Method-level expressions fully replace class-level ones when
    /// present.
    #[must_use]
    pub fn combine(&self, method_level: &ProducesCondition) -> ProducesCondition {
        if method_level.is_empty() {
            self.clone()
        } else {
            method_level.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_parse_forms() {
        let plain = NameValueExpression::parse("debug");
        assert_eq!(plain.name(), "debug");
        assert_eq!(plain.value(), None);
        assert!(!plain.is_negated());

        let negated = NameValueExpression::parse("!debug");
        assert!(negated.is_negated());
        assert_eq!(negated.name(), "debug");

        let value = NameValueExpression::parse("version=2");
        assert_eq!(value.value(), Some("2"));
        assert!(!value.is_negated());

        let negated_value = NameValueExpression::parse("version!=2");
        assert_eq!(negated_value.value(), Some("2"));
        assert!(negated_value.is_negated());
    }

    #[test]
    fn expression_display_round_trips() {
        for raw in ["debug", "!debug", "version=2", "version!=2"] {
            assert_eq!(NameValueExpression::parse(raw).to_string(), raw);
        }
    }

    #[test]
    fn patterns_combine_cartesian() {
        let class = PatternsCondition::new([PathPattern::parse("/a"), PathPattern::parse("/b")]);
        let method = PatternsCondition::new([PathPattern::parse("/x"), PathPattern::parse("/y")]);
        let combined = class.combine(&method);
        let patterns: Vec<_> = combined.patterns().iter().map(PathPattern::as_str).collect();
        assert_eq!(patterns, ["/a/x", "/a/y", "/b/x", "/b/y"]);
    }

    #[test]
    fn patterns_combine_empty_method_inherits_class() {
        let class = PatternsCondition::new([PathPattern::parse("/a")]);
        assert_eq!(class.combine(&PatternsCondition::default()), class);
    }

    #[test]
    fn patterns_combine_both_empty_yields_root() {
        let combined = PatternsCondition::default().combine(&PatternsCondition::default());
        assert_eq!(combined.patterns(), [PathPattern::parse("")]);
    }

    #[test]
    fn methods_replace_not_union() {
        let class = MethodsCondition::new([Method::Get, Method::Post]);
        let method = MethodsCondition::new([Method::Put]);
        assert_eq!(class.combine(&method).methods(), [Method::Put]);
        assert_eq!(
            class.combine(&MethodsCondition::default()).methods(),
            [Method::Get, Method::Post]
        );
    }

    #[test]
    fn params_union() {
        let class = ParamsCondition::new([NameValueExpression::parse("a=1")]);
        let method = ParamsCondition::new([
            NameValueExpression::parse("b=2"),
            NameValueExpression::parse("a=1"),
        ]);
        let combined = class.combine(&method);
        assert_eq!(combined.expressions().len(), 2);
    }

    #[test]
    fn consumes_method_level_overrides() {
        let json = MediaTypeExpression::parse("application/json").unwrap();
        let xml = MediaTypeExpression::parse("application/xml").unwrap();
        let class = ConsumesCondition::new([json]);
        let method = ConsumesCondition::new([xml.clone()]);
        assert_eq!(class.combine(&method).expressions(), [xml]);
    }

    #[test]
    fn consumes_body_required_from_method_level() {
        let json = MediaTypeExpression::parse("application/json").unwrap();
        let class = ConsumesCondition::new([json]);
        let method = ConsumesCondition::default().body_required(false);
        let combined = class.combine(&method);
        // expressions inherited, flag not
        assert_eq!(combined.expressions().len(), 1);
        assert!(!combined.is_body_required());
    }

    #[test]
    fn dedup_preserves_order() {
        let condition = MethodsCondition::new([Method::Post, Method::Get, Method::Post]);
        assert_eq!(condition.methods(), [Method::Post, Method::Get]);
    }
}
