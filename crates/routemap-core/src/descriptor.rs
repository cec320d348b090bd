//! The route descriptor: one immutable, comparable unit per route.
//!
//! A descriptor aggregates the six request conditions. Equality and
//! hashing cover all six, so two descriptors with identical condition sets
//! are indistinguishable; deduplicating descriptors across handler methods
//! is the dispatcher's concern, not this core's.

use std::fmt;

use serde_json::json;

use crate::condition::{
    ConsumesCondition, HeadersCondition, MethodsCondition, NameValueExpression, ParamsCondition,
    PatternsCondition, ProducesCondition,
};
use crate::declaration::RouteDeclaration;
use crate::media::MediaTypeExpression;
use crate::method::Method;
use crate::pattern::PathPattern;

/// Immutable aggregate of the conditions identifying which requests
/// dispatch to a handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteDescriptor {
    patterns: PatternsCondition,
    methods: MethodsCondition,
    params: ParamsCondition,
    headers: HeadersCondition,
    consumes: ConsumesCondition,
    produces: ProducesCondition,
}

impl RouteDescriptor {
    /// Start building a descriptor directly, without going through
    /// declarations.
    #[must_use]
    pub fn builder() -> RouteDescriptorBuilder {
        RouteDescriptorBuilder::new()
    }

    /// Compile a single declaration into a descriptor.
    ///
    /// Raw expression strings are parsed into their typed forms; media
    /// type expressions that fail to parse are dropped with a warning.
    #[must_use]
    pub fn from_declaration(declaration: &RouteDeclaration) -> Self {
        Self {
            patterns: PatternsCondition::new(
                declaration.patterns.iter().map(|p| PathPattern::parse(p)),
            ),
            methods: MethodsCondition::new(declaration.methods.iter().copied()),
            params: ParamsCondition::new(
                declaration.params.iter().map(|e| NameValueExpression::parse(e)),
            ),
            headers: HeadersCondition::new(
                declaration.headers.iter().map(|e| NameValueExpression::parse(e)),
            ),
            consumes: ConsumesCondition::new(parse_media_expressions(&declaration.consumes))
                .body_required(declaration.body_required),
            produces: ProducesCondition::new(parse_media_expressions(&declaration.produces)),
        }
    }

    /// Build the final descriptor from a class-level declaration (if any)
    /// and the method-level declaration, applying the per-condition
    /// combine rules.
    ///
    /// Merging an absent class level is neutral: the result is identical
    /// to compiling the method-level declaration alone.
    #[must_use]
    pub fn merge(class_level: Option<&RouteDeclaration>, method_level: &RouteDeclaration) -> Self {
        let method_descriptor = Self::from_declaration(method_level);
        let merged = match class_level {
            Some(class) => Self::from_declaration(class).combine(&method_descriptor),
            None => method_descriptor,
        };
        merged.with_root_pattern()
    }

    /// Combine class-level (`self`) conditions with method-level ones.
    #[must_use]
    pub fn combine(&self, method_level: &RouteDescriptor) -> Self {
        Self {
            patterns: self.patterns.combine(&method_level.patterns),
            methods: self.methods.combine(&method_level.methods),
            params: self.params.combine(&method_level.params),
            headers: self.headers.combine(&method_level.headers),
            consumes: self.consumes.combine(&method_level.consumes),
            produces: self.produces.combine(&method_level.produces),
        }
    }

    /// Prepend a resolved path prefix to every pattern.
    #[must_use]
    pub fn with_prefix(&self, prefix: &str) -> Self {
        let prefix = PathPattern::parse(prefix);
        let mut prefixed = self.clone();
        prefixed.patterns = PatternsCondition::new(
            self.patterns
                .patterns()
                .iter()
                .map(|pattern| prefix.combine(pattern)),
        );
        prefixed
    }

    fn with_root_pattern(mut self) -> Self {
        if self.patterns.is_empty() {
            self.patterns = PatternsCondition::new([PathPattern::parse("")]);
        }
        self
    }

    /// The patterns condition.
    #[must_use]
    pub fn patterns(&self) -> &PatternsCondition {
        &self.patterns
    }

    /// The methods condition.
    #[must_use]
    pub fn methods(&self) -> &MethodsCondition {
        &self.methods
    }

    /// The params condition.
    #[must_use]
    pub fn params(&self) -> &ParamsCondition {
        &self.params
    }

    /// The headers condition.
    #[must_use]
    pub fn headers(&self) -> &HeadersCondition {
        &self.headers
    }

    /// The consumes condition.
    #[must_use]
    pub fn consumes(&self) -> &ConsumesCondition {
        &self.consumes
    }

    /// The produces condition.
    #[must_use]
    pub fn produces(&self) -> &ProducesCondition {
        &self.produces
    }

    /// A JSON rendering of the descriptor for diagnostics.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "patterns": self.patterns.patterns().iter().map(PathPattern::as_str).collect::<Vec<_>>(),
            "methods": self.methods.methods(),
            "params": self.params.expressions().iter().map(ToString::to_string).collect::<Vec<_>>(),
            "headers": self.headers.expressions().iter().map(ToString::to_string).collect::<Vec<_>>(),
            "consumes": self.consumes.expressions().iter().map(ToString::to_string).collect::<Vec<_>>(),
            "produces": self.produces.expressions().iter().map(ToString::to_string).collect::<Vec<_>>(),
            "body_required": self.consumes.is_body_required(),
        })
    }
}

fn parse_media_expressions(raw: &[String]) -> Vec<MediaTypeExpression> {
    raw.iter()
        .filter_map(|value| {
            let parsed = MediaTypeExpression::parse(value);
            if parsed.is_none() {
                tracing::warn!(expression = %value, "dropping unparseable media type expression");
            }
            parsed
        })
        .collect()
}

impl fmt::Display for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{[")?;
        for (i, pattern) in self.patterns.patterns().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", pattern)?;
        }
        f.write_str("]")?;
        if !self.methods.is_empty() {
            f.write_str(", methods [")?;
            for (i, method) in self.methods.methods().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", method)?;
            }
            f.write_str("]")?;
        }
        if !self.consumes.is_empty() {
            f.write_str(", consumes [")?;
            for (i, expr) in self.consumes.expressions().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", expr)?;
            }
            f.write_str("]")?;
        }
        if !self.produces.is_empty() {
            f.write_str(", produces [")?;
            for (i, expr) in self.produces.expressions().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", expr)?;
            }
            f.write_str("]")?;
        }
        f.write_str("}")
    }
}

/// Builder for [`RouteDescriptor`], mirroring the declaration fields.
#[derive(Debug, Clone, Default)]
pub struct RouteDescriptorBuilder {
    declaration: RouteDeclaration,
}

impl RouteDescriptorBuilder {
    fn new() -> Self {
        Self {
            declaration: RouteDeclaration::new(),
        }
    }

    /// Set the path patterns.
    #[must_use]
    pub fn paths(mut self, paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.declaration.patterns = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Set the HTTP methods.
    #[must_use]
    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.declaration.methods = methods.into_iter().collect();
        self
    }

    /// Set the query param expressions.
    #[must_use]
    pub fn params(mut self, params: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.declaration.params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Set the header expressions.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.declaration.headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Set the consumes expressions.
    #[must_use]
    pub fn consumes(mut self, consumes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.declaration.consumes = consumes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the produces expressions.
    #[must_use]
    pub fn produces(mut self, produces: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.declaration.produces = produces.into_iter().map(Into::into).collect();
        self
    }

    /// Set whether a request body is required.
    #[must_use]
    pub fn body_required(mut self, required: bool) -> Self {
        self.declaration.body_required = required;
        self
    }

    /// Compile the descriptor. Empty paths normalize to the empty/root
    /// pattern, as in merging.
    #[must_use]
    pub fn build(self) -> RouteDescriptor {
        RouteDescriptor::from_declaration(&self.declaration).with_root_pattern()
    }
}
