//! The mapping registry: per-method descriptor resolution and the final
//! method-to-descriptor table.
//!
//! Building is a single-threaded, one-shot pass over the discovered
//! controllers, triggered once by the hosting lifecycle. Per handler
//! method the registry extracts the class-level and method-level
//! declarations, validates them, resolves placeholders, merges the two
//! levels and applies the configured path prefix. The finished table is
//! immutable and safe for unsynchronized concurrent reads.
//!
//! A structural conflict on any method drops the whole controller from
//! the table (no partial registration) and is recorded; other controllers
//! are unaffected.

use std::collections::HashMap;

use serde_json::json;

use crate::declaration::extract_declaration;
use crate::descriptor::RouteDescriptor;
use crate::error::{Site, StructuralConflictError};
use crate::metadata::{Controller, HandlerMethod};
use crate::resolve::{resolve_embedded_values, EmbeddedValueResolver, PathPrefixes, PrefixRule};

/// Key of one registry entry: (controller type, handler method).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    /// The controller type name.
    pub controller: String,
    /// The handler method name.
    pub method: String,
}

/// Builder for [`MappingRegistry`] configuration.
#[derive(Default)]
pub struct MappingRegistryBuilder {
    resolver: Option<EmbeddedValueResolver>,
    prefixes: PathPrefixes,
}

impl MappingRegistryBuilder {
    /// Set the placeholder resolver applied to pattern and prefix
    /// strings.
    #[must_use]
    pub fn embedded_value_resolver(
        mut self,
        resolver: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.resolver = Some(std::sync::Arc::new(resolver));
        self
    }

    /// Add a prefix rule; rules apply in the order added, first match
    /// wins.
    #[must_use]
    pub fn path_prefix(
        mut self,
        prefix: impl Into<String>,
        predicate: impl Fn(&Controller) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.prefixes.add(PrefixRule::new(prefix, predicate));
        self
    }

    /// Finish configuration, yielding an empty registry.
    #[must_use]
    pub fn finish(self) -> MappingRegistry {
        MappingRegistry {
            resolver: self.resolver,
            prefixes: self.prefixes,
            order: Vec::new(),
            table: HashMap::new(),
            failures: Vec::new(),
        }
    }

    /// Finish configuration and register every controller.
    #[must_use]
    pub fn build(self, controllers: &[Controller]) -> MappingRegistry {
        let mut registry = self.finish();
        registry.register_all(controllers);
        registry
    }
}

/// The method-to-descriptor table plus the configuration used to resolve
/// it.
pub struct MappingRegistry {
    resolver: Option<EmbeddedValueResolver>,
    prefixes: PathPrefixes,
    order: Vec<RouteKey>,
    table: HashMap<RouteKey, RouteDescriptor>,
    failures: Vec<StructuralConflictError>,
}

impl MappingRegistry {
    /// Start configuring a registry.
    #[must_use]
    pub fn builder() -> MappingRegistryBuilder {
        MappingRegistryBuilder::default()
    }

    /// Resolve the descriptor for one handler method, without touching
    /// the table.
    ///
    /// Returns `Ok(None)` when the method carries no route declaration.
    /// Resolution is pure and deterministic: re-resolving the same pair
    /// yields an identical descriptor.
    ///
    /// # Errors
    ///
    /// [`StructuralConflictError`] when the method or its controller
    /// carries conflicting markers.
    pub fn mapping_for_method(
        &self,
        controller: &Controller,
        method: &HandlerMethod,
    ) -> Result<Option<RouteDescriptor>, StructuralConflictError> {
        let method_site = Site::method(controller.name(), method.name());
        let Some(mut method_declaration) =
            extract_declaration(&method_site, method.markers(), method.body_hint())?
        else {
            return Ok(None);
        };

        let class_site = Site::class(controller.name());
        let class_declaration = extract_declaration(&class_site, controller.markers(), None)?;

        method_declaration.patterns =
            resolve_embedded_values(&method_declaration.patterns, self.resolver.as_ref());
        let class_declaration = class_declaration.map(|mut declaration| {
            declaration.patterns =
                resolve_embedded_values(&declaration.patterns, self.resolver.as_ref());
            declaration
        });

        let mut descriptor =
            RouteDescriptor::merge(class_declaration.as_ref(), &method_declaration);

        if let Some(prefix) = self.prefixes.prefix_for(controller) {
            let resolved = match &self.resolver {
                Some(resolve) => resolve(prefix),
                None => prefix.to_owned(),
            };
            descriptor = descriptor.with_prefix(&resolved);
        }
        Ok(Some(descriptor))
    }

    /// Register every route of one controller.
    ///
    /// All methods are resolved before anything is inserted; a conflict
    /// on any method records the failure and registers none of them.
    pub fn register(&mut self, controller: &Controller) {
        let mut resolved = Vec::new();
        for method in controller.methods() {
            match self.mapping_for_method(controller, method) {
                Ok(Some(descriptor)) => resolved.push((method.name().to_owned(), descriptor)),
                Ok(None) => {}
                Err(error) => {
                    tracing::error!(
                        controller = controller.name(),
                        %error,
                        "skipping controller with conflicting route declarations"
                    );
                    self.failures.push(error);
                    return;
                }
            }
        }
        for (method, descriptor) in resolved {
            tracing::debug!(
                controller = controller.name(),
                method = %method,
                descriptor = %descriptor,
                "registered route"
            );
            let key = RouteKey {
                controller: controller.name().to_owned(),
                method,
            };
            if self.table.insert(key.clone(), descriptor).is_none() {
                self.order.push(key);
            }
        }
    }

    /// Register every controller, in order.
    pub fn register_all(&mut self, controllers: &[Controller]) {
        for controller in controllers {
            self.register(controller);
        }
    }

    /// Point lookup by controller and method name.
    #[must_use]
    pub fn lookup(&self, controller: &str, method: &str) -> Option<&RouteDescriptor> {
        self.table.get(&RouteKey {
            controller: controller.to_owned(),
            method: method.to_owned(),
        })
    }

    /// All registered entries, in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = (&RouteKey, &RouteDescriptor)> {
        self.order.iter().map(|key| (key, &self.table[key]))
    }

    /// Number of registered routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.table.len()
    }

    /// Conflicts recorded during registration, in discovery order.
    #[must_use]
    pub fn failures(&self) -> &[StructuralConflictError] {
        &self.failures
    }

    /// A JSON rendering of the whole route table for diagnostics.
    #[must_use]
    pub fn routes_json(&self) -> serde_json::Value {
        json!(self
            .descriptors()
            .map(|(key, descriptor)| {
                let mut entry = descriptor.to_json();
                entry["controller"] = json!(key.controller);
                entry["method"] = json!(key.method);
                entry
            })
            .collect::<Vec<_>>())
    }
}

impl std::fmt::Debug for MappingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingRegistry")
            .field("routes", &self.order)
            .field("failures", &self.failures)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::{ExchangeMarker, MappingMarker};
    use crate::method::Method;
    use crate::pattern::PathPattern;

    fn user_controller() -> Controller {
        Controller::new("UserController")
            .tag("rest")
            .marker(MappingMarker::request_mapping().path("/user"))
            .method(HandlerMethod::new("get_user").marker(MappingMarker::get("/{id}")))
    }

    #[test]
    fn registers_merged_routes() {
        let registry = MappingRegistry::builder().build(&[user_controller()]);
        let descriptor = registry.lookup("UserController", "get_user").unwrap();
        assert_eq!(
            descriptor.patterns().patterns(),
            [PathPattern::parse("/user/{id}")]
        );
        assert_eq!(descriptor.methods().methods(), [Method::Get]);
        assert_eq!(registry.route_count(), 1);
    }

    #[test]
    fn unannotated_methods_are_not_routes() {
        let controller = Controller::new("PlainController").method(HandlerMethod::new("helper"));
        let registry = MappingRegistry::builder().build(&[controller]);
        assert_eq!(registry.route_count(), 0);
        assert!(registry.failures().is_empty());
    }

    #[test]
    fn conflicting_controller_registers_nothing() {
        let conflicting = Controller::new("MixedController")
            .marker(MappingMarker::request_mapping().path("/api"))
            .marker(ExchangeMarker::generic().url("/api"))
            .method(HandlerMethod::new("ok").marker(MappingMarker::get("/ok")))
            .method(HandlerMethod::new("post").marker(ExchangeMarker::post("/post")));
        let registry = MappingRegistry::builder().build(&[conflicting, user_controller()]);

        // the healthy controller still registers
        assert_eq!(registry.route_count(), 1);
        assert!(registry.lookup("UserController", "get_user").is_some());
        assert!(registry.lookup("MixedController", "ok").is_none());
        assert_eq!(registry.failures().len(), 1);
    }

    #[test]
    fn re_registration_is_idempotent() {
        let controller = user_controller();
        let mut registry = MappingRegistry::builder().finish();
        registry.register(&controller);
        let first = registry.lookup("UserController", "get_user").unwrap().clone();
        registry.register(&controller);
        assert_eq!(registry.route_count(), 1);
        assert_eq!(registry.lookup("UserController", "get_user"), Some(&first));
    }

    #[test]
    fn prefix_applies_to_matching_controllers_only() {
        let other = Controller::new("PlainController")
            .method(HandlerMethod::new("ping").marker(MappingMarker::get("/ping")));
        let registry = MappingRegistry::builder()
            .path_prefix("/api", |c: &Controller| c.has_tag("rest"))
            .build(&[user_controller(), other]);

        assert_eq!(
            registry
                .lookup("UserController", "get_user")
                .unwrap()
                .patterns()
                .patterns(),
            [PathPattern::parse("/api/user/{id}")]
        );
        assert_eq!(
            registry
                .lookup("PlainController", "ping")
                .unwrap()
                .patterns()
                .patterns(),
            [PathPattern::parse("/ping")]
        );
    }

    #[test]
    fn routes_json_lists_entries() {
        let registry = MappingRegistry::builder().build(&[user_controller()]);
        let dump = registry.routes_json();
        let entries = dump.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["controller"], "UserController");
        assert_eq!(entries[0]["patterns"][0], "/user/{id}");
        assert_eq!(entries[0]["methods"][0], "GET");
    }
}
