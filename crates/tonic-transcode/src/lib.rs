//! Resolve `google.api.http` annotations into HTTP/JSON to gRPC transcoding
//! bindings.
//!
//! Given the descriptors of a protobuf package and the `HttpRule` attached to
//! an RPC method, a [`Resolver`] computes everything a transcoding proxy needs
//! to turn an HTTP request into the RPC's request message:
//!
//! - the route parameters of the path template, bound to request fields,
//! - where the body is decoded (nothing, the whole message, or one field),
//! - which remaining fields may be set through the query string, flattened
//!   into dotted keys such as `address.city`.
//!
//! All validation happens here, once, at route registration time. A binding
//! that resolves never fails later for schema reasons.
//!
//! ```
//! use tonic_transcode::{Resolver, ResolverConfig, Schema};
//!
//! # fn run(descriptor_bytes: &[u8]) -> tonic_transcode::Result<()> {
//! let schema = Schema::decode(descriptor_bytes)?;
//! let resolver = Resolver::new(&schema, ResolverConfig::new());
//!
//! for service in resolver.resolve_services()? {
//!     for binding in &service.bindings {
//!         println!("{} {} -> {}", binding.verb, binding.pattern.template(), binding.method.full_name());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod binding;
mod body;
mod config;
mod error;
mod path;
mod query;
mod route;
mod schema;
mod template;

#[cfg(test)]
mod fixtures;

/// Protobuf descriptor types re-exported from [`tonic_transcode_core`].
pub use tonic_transcode_core::descriptor;

pub use binding::{Resolver, ServiceBindings, TranscodingBinding};
pub use body::{BodyBinding, BodySpec};
pub use config::{ResolverConfig, DEFAULT_MAX_DEPTH, WELL_KNOWN_LEAF_MESSAGES};
pub use error::{BindingError, Result};
pub use path::FieldPath;
pub use query::{resolve_query, QueryParam};
pub use route::{resolve_route_params, RouteParam};
pub use schema::{
    FieldDescriptor, FieldId, FieldKind, MessageDescriptor, MessageId, MethodDescriptor,
    ScalarType, Schema, ServiceDescriptor,
};
pub use template::{RoutePattern, RouteVariable};

/// Resolve a single rule for `method` with the default configuration.
///
/// Shorthand for [`Resolver::resolve_rule`]. Returns `Ok(None)` when the rule
/// has no pattern.
///
/// # Errors
///
/// See [`Resolver::resolve_rule`].
pub fn resolve_transcoding<'s>(
    schema: &'s Schema,
    method: MethodDescriptor<'s>,
    rule: &descriptor::HttpRule,
) -> Result<Option<TranscodingBinding<'s>>> {
    Resolver::new(schema, ResolverConfig::default()).resolve_rule(method, rule)
}
