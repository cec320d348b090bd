//! Compiled path pattern value type.
//!
//! The runtime matching engine is an external collaborator; this core only
//! compiles pattern strings into a normalized, comparable form and
//! concatenates class-level prefixes with method-level suffixes.
//!
//! Normalization follows the router conventions: a non-empty pattern gains a
//! leading `/` if missing, and a trailing `/` is dropped (except for the
//! bare root `/`). The empty pattern `""` is kept as-is and matches the
//! empty/root path.

use std::fmt;

/// A compiled path pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathPattern {
    pattern: String,
}

impl PathPattern {
    /// Compile a raw pattern string into its normalized form.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut pattern = if !raw.is_empty() && !raw.starts_with('/') {
            format!("/{}", raw)
        } else {
            raw.to_owned()
        };
        if pattern.ends_with('/') && pattern.len() > 1 {
            pattern.pop();
        }
        Self { pattern }
    }

    /// The normalized pattern string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Whether this is the empty pattern.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Concatenate this pattern (as prefix) with `suffix`.
    ///
    /// Either side being empty yields the other side verbatim; the bare
    /// root `/` contributes nothing as a prefix.
    #[must_use]
    pub fn combine(&self, suffix: &PathPattern) -> PathPattern {
        if self.pattern.is_empty() || self.pattern == "/" {
            return suffix.clone();
        }
        if suffix.pattern.is_empty() {
            return self.clone();
        }
        PathPattern {
            pattern: format!("{}{}", self.pattern, suffix.pattern),
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_adds_leading_slash() {
        assert_eq!(PathPattern::parse("users").as_str(), "/users");
        assert_eq!(PathPattern::parse("/users").as_str(), "/users");
    }

    #[test]
    fn parse_drops_trailing_slash() {
        assert_eq!(PathPattern::parse("/users/").as_str(), "/users");
        assert_eq!(PathPattern::parse("/").as_str(), "/");
    }

    #[test]
    fn empty_pattern_is_preserved() {
        let empty = PathPattern::parse("");
        assert!(empty.is_empty());
        assert_eq!(empty.as_str(), "");
    }

    #[test]
    fn combine_concatenates() {
        let class = PathPattern::parse("/user");
        let method = PathPattern::parse("/{id}");
        assert_eq!(class.combine(&method).as_str(), "/user/{id}");
    }

    #[test]
    fn combine_with_empty_sides() {
        let pattern = PathPattern::parse("/post");
        assert_eq!(PathPattern::parse("").combine(&pattern).as_str(), "/post");
        assert_eq!(pattern.combine(&PathPattern::parse("")).as_str(), "/post");
        assert_eq!(PathPattern::parse("/").combine(&pattern).as_str(), "/post");
    }
}
