//! Declarative route markers.
//!
//! Controllers declare routes in one of two mutually exclusive styles:
//!
//! - **Mapping style** ([`MappingMarker`], the `@RequestMapping` family):
//!   one multi-attribute marker whose attributes default to
//!   unset/match-any. Markers compose: a shorthand like `@GetMapping` is a
//!   marker that carries its own explicit attributes on top of a primary
//!   `@RequestMapping` it inherits from. Explicit local values win over the
//!   composed primary's values, most specific first.
//! - **Exchange style** ([`ExchangeMarker`], the `@HttpExchange` family):
//!   verb-specific shorthands plus a generic form, each with a simple
//!   url/content-type/accept attribute set. At most one per declaration
//!   site.
//!
//! Mixing the two styles on one site, or declaring more than one exchange
//! marker on one site, is a structural conflict detected at extraction
//! time; see [`crate::declaration`].

use crate::method::Method;

/// Attribute values explicitly set on a mapping-style marker.
///
/// `None` means unset; an unset attribute falls through to the composed
/// primary marker, or to match-any if nothing in the chain sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingAttrs {
    /// Path patterns, raw (placeholders unresolved).
    pub paths: Option<Vec<String>>,
    /// HTTP methods.
    pub methods: Option<Vec<Method>>,
    /// Query param expressions.
    pub params: Option<Vec<String>>,
    /// Header expressions.
    pub headers: Option<Vec<String>>,
    /// Consumable media type expressions.
    pub consumes: Option<Vec<String>>,
    /// Producible media type expressions.
    pub produces: Option<Vec<String>>,
}

impl MappingAttrs {
    fn merged_over(&self, base: &MappingAttrs) -> MappingAttrs {
        MappingAttrs {
            paths: self.paths.clone().or_else(|| base.paths.clone()),
            methods: self.methods.clone().or_else(|| base.methods.clone()),
            params: self.params.clone().or_else(|| base.params.clone()),
            headers: self.headers.clone().or_else(|| base.headers.clone()),
            consumes: self.consumes.clone().or_else(|| base.consumes.clone()),
            produces: self.produces.clone().or_else(|| base.produces.clone()),
        }
    }
}

/// A mapping-style ("flexible") route marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingMarker {
    name: String,
    attrs: MappingAttrs,
    meta: Option<Box<MappingMarker>>,
}

impl MappingMarker {
    /// The primary marker with every attribute unset.
    #[must_use]
    pub fn request_mapping() -> Self {
        Self {
            name: "RequestMapping".to_owned(),
            attrs: MappingAttrs::default(),
            meta: None,
        }
    }

    /// A marker composed over a primary, inheriting its attributes.
    ///
    /// `name` is the concrete marker type name used in conflict messages.
    #[must_use]
    pub fn composed(name: impl Into<String>, meta: MappingMarker) -> Self {
        Self {
            name: name.into(),
            attrs: MappingAttrs::default(),
            meta: Some(Box::new(meta)),
        }
    }

    fn shorthand(name: &str, method: Method, path: &str) -> Self {
        Self::composed(name, Self::request_mapping().methods([method])).path(path)
    }

    /// The `GetMapping` shorthand: composed over the primary with GET set.
    #[must_use]
    pub fn get(path: impl AsRef<str>) -> Self {
        Self::shorthand("GetMapping", Method::Get, path.as_ref())
    }

    /// The `PostMapping` shorthand.
    #[must_use]
    pub fn post(path: impl AsRef<str>) -> Self {
        Self::shorthand("PostMapping", Method::Post, path.as_ref())
    }

    /// The `PutMapping` shorthand.
    #[must_use]
    pub fn put(path: impl AsRef<str>) -> Self {
        Self::shorthand("PutMapping", Method::Put, path.as_ref())
    }

    /// The `DeleteMapping` shorthand.
    #[must_use]
    pub fn delete(path: impl AsRef<str>) -> Self {
        Self::shorthand("DeleteMapping", Method::Delete, path.as_ref())
    }

    /// The `PatchMapping` shorthand.
    #[must_use]
    pub fn patch(path: impl AsRef<str>) -> Self {
        Self::shorthand("PatchMapping", Method::Patch, path.as_ref())
    }

    /// Set a single path, replacing any previously set paths.
    #[must_use]
    pub fn path(self, path: impl Into<String>) -> Self {
        self.paths([path.into()])
    }

    /// Set the path patterns explicitly.
    #[must_use]
    pub fn paths(mut self, paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.attrs.paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    /// Set the HTTP methods explicitly.
    #[must_use]
    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.attrs.methods = Some(methods.into_iter().collect());
        self
    }

    /// Set the query param expressions explicitly.
    #[must_use]
    pub fn params(mut self, params: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.attrs.params = Some(params.into_iter().map(Into::into).collect());
        self
    }

    /// Set the header expressions explicitly.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.attrs.headers = Some(headers.into_iter().map(Into::into).collect());
        self
    }

    /// Set the consumes expressions explicitly.
    #[must_use]
    pub fn consumes(mut self, consumes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.attrs.consumes = Some(consumes.into_iter().map(Into::into).collect());
        self
    }

    /// Set the produces expressions explicitly.
    #[must_use]
    pub fn produces(mut self, produces: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.attrs.produces = Some(produces.into_iter().map(Into::into).collect());
        self
    }

    /// The concrete marker type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is a directly declared primary marker rather than a
    /// composed shorthand.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.meta.is_none()
    }

    /// Resolve the attribute alias chain: explicit local values win over
    /// the composed primary's, walking the chain most specific first.
    #[must_use]
    pub fn resolved_attrs(&self) -> MappingAttrs {
        match &self.meta {
            Some(meta) => self.attrs.merged_over(&meta.resolved_attrs()),
            None => self.attrs.clone(),
        }
    }
}

/// An exchange-style route marker: a verb-specific shorthand or the
/// generic form.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeMarker {
    name: String,
    method: Option<Method>,
    url: Option<String>,
    content_type: Option<String>,
    accept: Option<String>,
}

impl ExchangeMarker {
    /// The generic form, implying no verb restriction.
    #[must_use]
    pub fn generic() -> Self {
        Self {
            name: "HttpExchange".to_owned(),
            method: None,
            url: None,
            content_type: None,
            accept: None,
        }
    }

    /// A marker composed over the generic form under a different concrete
    /// type name. Counts as its own exchange marker for the one-per-site
    /// rule.
    #[must_use]
    pub fn composed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::generic()
        }
    }

    fn shorthand(name: &str, method: Method, url: &str) -> Self {
        Self {
            name: name.to_owned(),
            method: Some(method),
            url: Some(url.to_owned()),
            content_type: None,
            accept: None,
        }
    }

    /// The `GetExchange` shorthand, implying GET.
    #[must_use]
    pub fn get(url: impl AsRef<str>) -> Self {
        Self::shorthand("GetExchange", Method::Get, url.as_ref())
    }

    /// The `PostExchange` shorthand, implying POST.
    #[must_use]
    pub fn post(url: impl AsRef<str>) -> Self {
        Self::shorthand("PostExchange", Method::Post, url.as_ref())
    }

    /// The `PutExchange` shorthand, implying PUT.
    #[must_use]
    pub fn put(url: impl AsRef<str>) -> Self {
        Self::shorthand("PutExchange", Method::Put, url.as_ref())
    }

    /// The `DeleteExchange` shorthand, implying DELETE.
    #[must_use]
    pub fn delete(url: impl AsRef<str>) -> Self {
        Self::shorthand("DeleteExchange", Method::Delete, url.as_ref())
    }

    /// The `PatchExchange` shorthand, implying PATCH.
    #[must_use]
    pub fn patch(url: impl AsRef<str>) -> Self {
        Self::shorthand("PatchExchange", Method::Patch, url.as_ref())
    }

    /// Set the url attribute.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the accepted request body content type.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the producible response content type.
    #[must_use]
    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// The concrete marker type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The verb implied by the shorthand kind, if any.
    #[must_use]
    pub fn method(&self) -> Option<Method> {
        self.method
    }

    /// The url attribute.
    #[must_use]
    pub fn url_attr(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The content-type attribute.
    #[must_use]
    pub fn content_type_attr(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The accept attribute.
    #[must_use]
    pub fn accept_attr(&self) -> Option<&str> {
        self.accept.as_deref()
    }
}

/// A route marker of either style, as found at a declaration site.
#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    /// Mapping style.
    Mapping(MappingMarker),
    /// Exchange style.
    Exchange(ExchangeMarker),
}

impl Marker {
    /// The concrete marker type name, used in conflict messages.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Mapping(marker) => marker.name(),
            Self::Exchange(marker) => marker.name(),
        }
    }
}

impl From<MappingMarker> for Marker {
    fn from(marker: MappingMarker) -> Self {
        Self::Mapping(marker)
    }
}

impl From<ExchangeMarker> for Marker {
    fn from(marker: ExchangeMarker) -> Self {
        Self::Exchange(marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_implies_method_via_meta() {
        let marker = MappingMarker::get("/get");
        assert!(!marker.is_primary());
        let attrs = marker.resolved_attrs();
        assert_eq!(attrs.paths, Some(vec!["/get".to_owned()]));
        assert_eq!(attrs.methods, Some(vec![Method::Get]));
    }

    #[test]
    fn local_values_override_composed_primary() {
        // a composed marker whose primary sets method, consumes and
        // produces, with a local path alias
        let primary = MappingMarker::request_mapping()
            .methods([Method::Post])
            .consumes(["application/json"])
            .produces(["application/json"]);
        let marker = MappingMarker::composed("PostJson", primary).path("/postJson");
        let attrs = marker.resolved_attrs();
        assert_eq!(attrs.paths, Some(vec!["/postJson".to_owned()]));
        assert_eq!(attrs.methods, Some(vec![Method::Post]));
        assert_eq!(attrs.consumes, Some(vec!["application/json".to_owned()]));
    }

    #[test]
    fn local_consumes_overrides_meta_consumes() {
        let primary = MappingMarker::request_mapping().consumes(["application/json"]);
        let marker =
            MappingMarker::composed("XmlMapping", primary).consumes(["application/xml"]);
        assert_eq!(
            marker.resolved_attrs().consumes,
            Some(vec!["application/xml".to_owned()])
        );
    }

    #[test]
    fn primary_marker_has_no_meta() {
        assert!(MappingMarker::request_mapping().is_primary());
        assert!(!MappingMarker::post("/p").is_primary());
    }

    #[test]
    fn exchange_shorthand_implies_verb() {
        let marker = ExchangeMarker::post("/custom")
            .content_type("application/json")
            .accept("text/plain;charset=UTF-8");
        assert_eq!(marker.method(), Some(Method::Post));
        assert_eq!(marker.url_attr(), Some("/custom"));
        assert_eq!(marker.content_type_attr(), Some("application/json"));
        assert_eq!(marker.name(), "PostExchange");
    }

    #[test]
    fn generic_exchange_has_no_verb() {
        let marker = ExchangeMarker::generic();
        assert_eq!(marker.method(), None);
        assert_eq!(marker.url_attr(), None);
    }

    #[test]
    fn marker_type_names() {
        assert_eq!(
            Marker::from(MappingMarker::request_mapping()).type_name(),
            "RequestMapping"
        );
        assert_eq!(
            Marker::from(ExchangeMarker::composed("ExtraHttpExchange")).type_name(),
            "ExtraHttpExchange"
        );
    }
}
