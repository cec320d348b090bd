//! Media type value type with wildcard and parameter-aware equality.
//!
//! Routes declare acceptable request body types (consumes) and producible
//! response types (produces) as media types. Comparison rules:
//!
//! - type and subtype are case-insensitive (`Text/HTML` == `text/html`)
//! - parameter names are case-insensitive, `charset` values too
//! - `*/*` includes everything, `type/*` includes every subtype of `type`,
//!   and `type/*+suffix` includes subtypes sharing the suffix
//!   (vendor types like `application/vnd.api+json` match `application/*+json`)

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A parsed media type: `type/subtype` plus optional parameters.
#[derive(Debug, Clone, Eq)]
pub struct MediaType {
    type_: String,
    subtype: String,
    parameters: BTreeMap<String, String>,
}

impl MediaType {
    /// Create a media type with no parameters.
    ///
    /// Type and subtype are normalized to lowercase.
    #[must_use]
    pub fn new(type_: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            type_: type_.into().to_ascii_lowercase(),
            subtype: subtype.into().to_ascii_lowercase(),
            parameters: BTreeMap::new(),
        }
    }

    /// The `*/*` wildcard.
    #[must_use]
    pub fn all() -> Self {
        Self::new("*", "*")
    }

    /// Add a parameter, returning the updated media type.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Parse a media type string such as `application/json` or
    /// `text/plain;charset=UTF-8`.
    ///
    /// Returns `None` for strings without a `type/subtype` shape.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.trim().split(';');
        let essence = parts.next()?.trim();
        let (type_, subtype) = essence.split_once('/')?;
        if type_.is_empty() || subtype.is_empty() {
            return None;
        }
        // "*/json" is not a valid wildcard shape
        if type_ == "*" && subtype != "*" {
            return None;
        }
        let mut media_type = Self::new(type_, subtype);
        for param in parts {
            let param = param.trim();
            if param.is_empty() {
                continue;
            }
            let (name, value) = param.split_once('=')?;
            media_type = media_type.with_parameter(name.trim(), value.trim());
        }
        Some(media_type)
    }

    /// The primary type, lowercase.
    #[must_use]
    pub fn type_(&self) -> &str {
        &self.type_
    }

    /// The subtype, lowercase.
    #[must_use]
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Look up a parameter value by (case-insensitive) name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Whether the primary type is the `*` wildcard.
    #[must_use]
    pub fn is_wildcard_type(&self) -> bool {
        self.type_ == "*"
    }

    /// Whether the subtype is `*` or a `*+suffix` wildcard.
    #[must_use]
    pub fn is_wildcard_subtype(&self) -> bool {
        self.subtype == "*" || self.subtype.starts_with("*+")
    }

    /// Whether this media type includes `other`.
    ///
    /// `*/*` includes everything; `application/*` includes
    /// `application/json`; `application/*+json` includes
    /// `application/vnd.api+json`. Parameters are ignored.
    #[must_use]
    pub fn includes(&self, other: &MediaType) -> bool {
        if self.is_wildcard_type() {
            return true;
        }
        if self.type_ != other.type_ {
            return false;
        }
        if self.subtype == other.subtype || self.subtype == "*" {
            return true;
        }
        if let Some(suffix) = self.subtype.strip_prefix("*+") {
            return other
                .subtype
                .rsplit_once('+')
                .is_some_and(|(_, other_suffix)| other_suffix == suffix);
        }
        false
    }

    /// Whether this media type and `other` are compatible, i.e. either
    /// includes the other.
    #[must_use]
    pub fn is_compatible_with(&self, other: &MediaType) -> bool {
        self.includes(other) || other.includes(self)
    }

    fn parameter_key(name: &str, value: &str) -> String {
        if name == "charset" {
            value.to_ascii_lowercase()
        } else {
            value.to_owned()
        }
    }
}

impl PartialEq for MediaType {
    fn eq(&self, other: &Self) -> bool {
        self.type_ == other.type_
            && self.subtype == other.subtype
            && self.parameters.len() == other.parameters.len()
            && self.parameters.iter().all(|(name, value)| {
                other.parameters.get(name).is_some_and(|other_value| {
                    Self::parameter_key(name, value) == Self::parameter_key(name, other_value)
                })
            })
    }
}

impl Hash for MediaType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_.hash(state);
        self.subtype.hash(state);
        for (name, value) in &self.parameters {
            name.hash(state);
            Self::parameter_key(name, value).hash(state);
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (name, value) in &self.parameters {
            write!(f, ";{}={}", name, value)?;
        }
        Ok(())
    }
}

/// A media type expression as declared in a consumes/produces attribute,
/// optionally negated: `application/json` or `!application/json`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaTypeExpression {
    media_type: MediaType,
    negated: bool,
}

impl MediaTypeExpression {
    /// Wrap a media type in a non-negated expression.
    #[must_use]
    pub fn new(media_type: MediaType) -> Self {
        Self {
            media_type,
            negated: false,
        }
    }

    /// Parse an expression string, honoring a leading `!`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let (raw, negated) = match value.trim().strip_prefix('!') {
            Some(rest) => (rest, true),
            None => (value.trim(), false),
        };
        Some(Self {
            media_type: MediaType::parse(raw)?,
            negated,
        })
    }

    /// The media type of this expression.
    #[must_use]
    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    /// Whether this expression is negated.
    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

impl fmt::Display for MediaTypeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("!")?;
        }
        write!(f, "{}", self.media_type)
    }
}
