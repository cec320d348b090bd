//! Controller metadata: the statically-typed stand-in for reflective
//! marker discovery.
//!
//! An external collaborator discovers controllers and supplies, per
//! controller type, the declared markers at class and method granularity.
//! This module is that surface: plain records built once and handed to the
//! registry, so the resolution logic never performs any introspection of
//! its own.

use crate::marker::Marker;

/// Hint carried by a handler method's request-body parameter marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestBodyHint {
    /// Whether a request body must be present.
    pub required: bool,
}

/// A handler method and its declared markers.
#[derive(Debug, Clone)]
pub struct HandlerMethod {
    name: String,
    markers: Vec<Marker>,
    body: Option<RequestBodyHint>,
}

impl HandlerMethod {
    /// Create a method record with no markers.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            markers: Vec::new(),
            body: None,
        }
    }

    /// Attach a declared marker, in discovery order.
    #[must_use]
    pub fn marker(mut self, marker: impl Into<Marker>) -> Self {
        self.markers.push(marker.into());
        self
    }

    /// Attach a request-body hint.
    #[must_use]
    pub fn request_body(mut self, required: bool) -> Self {
        self.body = Some(RequestBodyHint { required });
        self
    }

    /// The method name (stable string form).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared markers, in discovery order.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// The request-body hint, if declared.
    #[must_use]
    pub fn body_hint(&self) -> Option<RequestBodyHint> {
        self.body
    }
}

/// A discovered controller type: class-level markers, handler methods,
/// and free-form tags for prefix predicates.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    name: String,
    tags: Vec<String>,
    markers: Vec<Marker>,
    methods: Vec<HandlerMethod>,
}

impl Controller {
    /// Create a controller record with no markers or methods.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Attach a tag, e.g. a stereotype name a prefix predicate selects on.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Attach a class-level marker, in discovery order.
    #[must_use]
    pub fn marker(mut self, marker: impl Into<Marker>) -> Self {
        self.markers.push(marker.into());
        self
    }

    /// Attach a handler method.
    #[must_use]
    pub fn method(mut self, method: HandlerMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// The controller type name (stable string form).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the controller carries the given tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// The class-level markers, in discovery order.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// The handler methods, in discovery order.
    #[must_use]
    pub fn methods(&self) -> &[HandlerMethod] {
        &self.methods
    }

    /// Look up a handler method by name.
    #[must_use]
    pub fn handler(&self, name: &str) -> Option<&HandlerMethod> {
        self.methods.iter().find(|m| m.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MappingMarker;

    #[test]
    fn controller_lookup_by_method_name() {
        let controller = Controller::new("UserController")
            .tag("rest")
            .marker(MappingMarker::request_mapping().path("/user"))
            .method(HandlerMethod::new("get_user").marker(MappingMarker::get("/{id}")));

        assert!(controller.has_tag("rest"));
        assert!(!controller.has_tag("service"));
        assert_eq!(controller.markers().len(), 1);
        assert!(controller.handler("get_user").is_some());
        assert!(controller.handler("missing").is_none());
    }

    #[test]
    fn body_hint_defaults_to_none() {
        let method = HandlerMethod::new("post");
        assert_eq!(method.body_hint(), None);
        let method = method.request_body(false);
        assert_eq!(method.body_hint(), Some(RequestBodyHint { required: false }));
    }
}
