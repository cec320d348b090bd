//! Declaration extraction: from raw markers at a site to the style-neutral
//! intermediate form.
//!
//! Extraction validates first and normalizes second, so merging never sees
//! contradictory input. The conflict rules, in order:
//!
//! 1. markers of both styles on one site are a structural error
//! 2. more than one exchange-style marker on one site is a structural error
//! 3. multiple mapping-style markers on one site are permitted: a directly
//!    declared primary marker wins over composed shorthands, otherwise the
//!    first marker in discovery order is used
//!
//! The asymmetry between rules 2 and 3 is deliberate upstream behavior and
//! is preserved as such.

use crate::error::{Site, StructuralConflictError};
use crate::marker::{ExchangeMarker, MappingMarker, Marker};
use crate::metadata::RequestBodyHint;
use crate::method::Method;

/// Style-neutral route declaration, as read from one declaration site.
///
/// All condition values are still raw strings here; compilation into typed
/// conditions happens when the descriptor is built. Empty `methods` means
/// "matches any verb".
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDeclaration {
    /// Raw path patterns, placeholders unresolved.
    pub patterns: Vec<String>,
    /// Declared verbs.
    pub methods: Vec<Method>,
    /// Raw query param expressions.
    pub params: Vec<String>,
    /// Raw header expressions.
    pub headers: Vec<String>,
    /// Raw consumes expressions.
    pub consumes: Vec<String>,
    /// Raw produces expressions.
    pub produces: Vec<String>,
    /// Whether a request body must be present.
    pub body_required: bool,
}

impl RouteDeclaration {
    /// An empty declaration: every condition matches anything, body
    /// required.
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
            methods: Vec::new(),
            params: Vec::new(),
            headers: Vec::new(),
            consumes: Vec::new(),
            produces: Vec::new(),
            body_required: true,
        }
    }
}

impl Default for RouteDeclaration {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the declaration at a site, validating the style rules first.
///
/// Returns `Ok(None)` when the site carries no route markers; such a site
/// is simply not a route candidate.
///
/// # Errors
///
/// [`StructuralConflictError`] when the site mixes styles or carries more
/// than one exchange-style marker.
pub fn extract_declaration(
    site: &Site,
    markers: &[Marker],
    body: Option<RequestBodyHint>,
) -> Result<Option<RouteDeclaration>, StructuralConflictError> {
    if markers.is_empty() {
        return Ok(None);
    }

    let mappings: Vec<&MappingMarker> = markers
        .iter()
        .filter_map(|m| match m {
            Marker::Mapping(marker) => Some(marker),
            Marker::Exchange(_) => None,
        })
        .collect();
    let exchanges: Vec<&ExchangeMarker> = markers
        .iter()
        .filter_map(|m| match m {
            Marker::Exchange(marker) => Some(marker),
            Marker::Mapping(_) => None,
        })
        .collect();

    if !mappings.is_empty() && !exchanges.is_empty() {
        return Err(StructuralConflictError::MixedStyles {
            site: site.clone(),
            markers: markers.iter().map(|m| m.type_name().to_owned()).collect(),
        });
    }
    if exchanges.len() > 1 {
        return Err(StructuralConflictError::MultipleExchange {
            site: site.clone(),
            markers: exchanges.iter().map(|m| m.name().to_owned()).collect(),
        });
    }

    if let Some(exchange) = exchanges.first() {
        return Ok(Some(from_exchange(exchange, body)));
    }

    // A directly declared primary marker overrides composed shorthands at
    // the same site; otherwise the first marker found is effective.
    let effective = mappings
        .iter()
        .copied()
        .find(|m| m.is_primary())
        .unwrap_or(mappings[0]);
    Ok(Some(from_mapping(effective, body)))
}

fn from_mapping(marker: &MappingMarker, body: Option<RequestBodyHint>) -> RouteDeclaration {
    let attrs = marker.resolved_attrs();
    RouteDeclaration {
        patterns: attrs.paths.unwrap_or_default(),
        methods: attrs.methods.unwrap_or_default(),
        params: attrs.params.unwrap_or_default(),
        headers: attrs.headers.unwrap_or_default(),
        consumes: attrs.consumes.unwrap_or_default(),
        produces: attrs.produces.unwrap_or_default(),
        body_required: body.map_or(true, |hint| hint.required),
    }
}

fn from_exchange(marker: &ExchangeMarker, body: Option<RequestBodyHint>) -> RouteDeclaration {
    RouteDeclaration {
        patterns: marker
            .url_attr()
            .filter(|url| !url.is_empty())
            .map(|url| vec![url.to_owned()])
            .unwrap_or_default(),
        methods: marker.method().into_iter().collect(),
        params: Vec::new(),
        headers: Vec::new(),
        consumes: marker
            .content_type_attr()
            .map(|ct| vec![ct.to_owned()])
            .unwrap_or_default(),
        produces: marker
            .accept_attr()
            .map(|accept| vec![accept.to_owned()])
            .unwrap_or_default(),
        body_required: body.map_or(true, |hint| hint.required),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method_site() -> Site {
        Site::method("TestController", "handle")
    }

    #[test]
    fn no_markers_is_not_a_route() {
        let result = extract_declaration(&method_site(), &[], None).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn single_mapping_marker_normalizes() {
        let markers = vec![Marker::from(MappingMarker::post("/post"))];
        let decl = extract_declaration(&method_site(), &markers, None)
            .unwrap()
            .unwrap();
        assert_eq!(decl.patterns, ["/post"]);
        assert_eq!(decl.methods, [Method::Post]);
        assert!(decl.body_required);
    }

    #[test]
    fn generic_exchange_implies_no_verb() {
        let markers = vec![Marker::from(ExchangeMarker::generic())];
        let decl = extract_declaration(&method_site(), &markers, None)
            .unwrap()
            .unwrap();
        assert!(decl.patterns.is_empty());
        assert!(decl.methods.is_empty());
        assert!(decl.consumes.is_empty());
        assert!(decl.produces.is_empty());
    }

    #[test]
    fn exchange_shorthand_maps_content_type_and_accept() {
        let markers = vec![Marker::from(
            ExchangeMarker::post("/custom")
                .content_type("application/json")
                .accept("text/plain;charset=UTF-8"),
        )];
        let decl = extract_declaration(&method_site(), &markers, None)
            .unwrap()
            .unwrap();
        assert_eq!(decl.patterns, ["/custom"]);
        assert_eq!(decl.methods, [Method::Post]);
        assert_eq!(decl.consumes, ["application/json"]);
        assert_eq!(decl.produces, ["text/plain;charset=UTF-8"]);
    }

    #[test]
    fn mixed_styles_error_lists_markers_in_order() {
        let markers = vec![
            Marker::from(MappingMarker::post("/post")),
            Marker::from(ExchangeMarker::post("/post")),
        ];
        let err = extract_declaration(&method_site(), &markers, None).unwrap_err();
        match &err {
            StructuralConflictError::MixedStyles { site, markers } => {
                assert_eq!(site, &method_site());
                assert_eq!(markers, &["PostMapping", "PostExchange"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn two_exchange_markers_error() {
        let markers = vec![
            Marker::from(ExchangeMarker::post("/post")),
            Marker::from(ExchangeMarker::put("/post")),
        ];
        let err = extract_declaration(&method_site(), &markers, None).unwrap_err();
        match &err {
            StructuralConflictError::MultipleExchange { markers, .. } => {
                assert_eq!(markers, &["PostExchange", "PutExchange"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn two_mapping_markers_are_permitted() {
        // primary declared locally wins over both composed shorthands
        let markers = vec![
            Marker::from(MappingMarker::patch("/put")),
            Marker::from(
                MappingMarker::request_mapping()
                    .path("/put")
                    .methods([Method::Put]),
            ),
            Marker::from(MappingMarker::post("/put")),
        ];
        let decl = extract_declaration(&method_site(), &markers, None)
            .unwrap()
            .unwrap();
        assert_eq!(decl.methods, [Method::Put]);
        assert_eq!(decl.patterns, ["/put"]);
    }

    #[test]
    fn first_composed_marker_wins_without_primary() {
        let markers = vec![
            Marker::from(MappingMarker::patch("/a")),
            Marker::from(MappingMarker::post("/b")),
        ];
        let decl = extract_declaration(&method_site(), &markers, None)
            .unwrap()
            .unwrap();
        assert_eq!(decl.methods, [Method::Patch]);
        assert_eq!(decl.patterns, ["/a"]);
    }

    #[test]
    fn body_hint_controls_body_required() {
        let markers = vec![Marker::from(MappingMarker::post("/post"))];
        let decl = extract_declaration(
            &method_site(),
            &markers,
            Some(RequestBodyHint { required: false }),
        )
        .unwrap()
        .unwrap();
        assert!(!decl.body_required);
    }
}
