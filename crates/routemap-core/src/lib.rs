//! Declarative route descriptor resolution.
//!
//! This crate resolves, for each handler method of a controller, the
//! canonical route descriptor: path patterns, HTTP methods, query/header
//! constraints and content-type conditions that determine which requests
//! dispatch to that method. It reconciles the two mutually exclusive
//! declarative marker styles, merges class-level and method-level
//! declarations, resolves placeholders and path prefixes, and rejects
//! semantically conflicting declarations at build time.
//!
//! Out of scope by design: the server/dispatch loop, runtime pattern
//! matching, placeholder parsing (a resolver function is supplied) and
//! controller discovery (markers arrive as plain metadata records).
//!
//! # Example
//!
//! ```
//! use routemap_core::{
//!     Controller, HandlerMethod, MappingMarker, MappingRegistry, Method,
//! };
//!
//! let controller = Controller::new("UserController")
//!     .marker(MappingMarker::request_mapping().path("/user"))
//!     .method(HandlerMethod::new("get_user").marker(MappingMarker::get("/{id}")));
//!
//! let registry = MappingRegistry::builder().build(&[controller]);
//! let descriptor = registry.lookup("UserController", "get_user").unwrap();
//! assert_eq!(descriptor.patterns().patterns()[0].as_str(), "/user/{id}");
//! assert_eq!(descriptor.methods().methods(), [Method::Get]);
//! ```

#![forbid(unsafe_code)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod condition;
pub mod declaration;
pub mod descriptor;
pub mod error;
pub mod marker;
pub mod media;
pub mod metadata;
pub mod method;
pub mod pattern;
pub mod registry;
pub mod resolve;

pub use condition::{
    ConsumesCondition, HeadersCondition, MethodsCondition, NameValueExpression, ParamsCondition,
    PatternsCondition, ProducesCondition,
};
pub use declaration::{extract_declaration, RouteDeclaration};
pub use descriptor::{RouteDescriptor, RouteDescriptorBuilder};
pub use error::{Site, StructuralConflictError};
pub use marker::{ExchangeMarker, MappingAttrs, MappingMarker, Marker};
pub use media::{MediaType, MediaTypeExpression};
pub use metadata::{Controller, HandlerMethod, RequestBodyHint};
pub use method::Method;
pub use pattern::PathPattern;
pub use registry::{MappingRegistry, MappingRegistryBuilder, RouteKey};
pub use resolve::{resolve_embedded_values, EmbeddedValueResolver, PathPrefixes, PrefixRule};
