//! Configuration for binding resolution.

use std::collections::HashSet;

/// Default bound on field-path length and query flattening depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Well-known types that transcode from a single query value.
///
/// These are messages on the wire but JSON-map to a string or scalar, so
/// query flattening treats them as leaves instead of descending into them.
pub const WELL_KNOWN_LEAF_MESSAGES: &[&str] = &[
    "google.protobuf.Timestamp",
    "google.protobuf.Duration",
    "google.protobuf.FieldMask",
    "google.protobuf.Struct",
    "google.protobuf.Value",
    "google.protobuf.ListValue",
    "google.protobuf.Any",
    "google.protobuf.DoubleValue",
    "google.protobuf.FloatValue",
    "google.protobuf.Int64Value",
    "google.protobuf.UInt64Value",
    "google.protobuf.Int32Value",
    "google.protobuf.UInt32Value",
    "google.protobuf.BoolValue",
    "google.protobuf.StringValue",
    "google.protobuf.BytesValue",
];

/// Configuration for [`Resolver`](crate::Resolver).
///
/// # Examples
///
/// ```ignore
/// let config = ResolverConfig::new()
///     .package("users.v1")
///     .leaf_message("core.v1.Uuid")
///     .max_depth(8);
///
/// let resolver = Resolver::new(&schema, config);
/// ```
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Maximum number of segments in a field path and maximum nesting depth
    /// during query flattening.
    pub(crate) max_depth: usize,

    /// Fully-qualified message names (no leading dot) emitted as a single
    /// query parameter rather than flattened.
    pub(crate) leaf_messages: HashSet<String>,

    /// Proto packages to resolve. When empty, every package is resolved.
    pub(crate) packages: HashSet<String>,

    /// Whether `additional_bindings` produce extra bindings (default: true).
    pub(crate) additional_bindings: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            leaf_messages: WELL_KNOWN_LEAF_MESSAGES
                .iter()
                .map(ToString::to_string)
                .collect(),
            packages: HashSet::new(),
            additional_bindings: true,
        }
    }
}

impl ResolverConfig {
    /// Create a new config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum field-path length and flattening depth.
    ///
    /// Values less than 1 are clamped to 1.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    /// Treat a message type as a single query value.
    ///
    /// Accepts the name with or without a leading dot (`.core.v1.Uuid` or
    /// `core.v1.Uuid`).
    #[must_use]
    pub fn leaf_message(mut self, full_name: &str) -> Self {
        self.leaf_messages
            .insert(full_name.trim_start_matches('.').to_string());
        self
    }

    /// Drop the built-in well-known leaf types, keeping only explicit ones.
    #[must_use]
    pub fn without_well_known_leaves(mut self) -> Self {
        for name in WELL_KNOWN_LEAF_MESSAGES {
            self.leaf_messages.remove(*name);
        }
        self
    }

    /// Restrict resolution to a proto package.
    ///
    /// When at least one package is registered, services in other packages
    /// are ignored.
    #[must_use]
    pub fn package(mut self, proto_package: &str) -> Self {
        self.packages.insert(proto_package.to_string());
        self
    }

    /// Enable or disable resolution of `additional_bindings`.
    #[must_use]
    pub fn additional_bindings(mut self, enabled: bool) -> Self {
        self.additional_bindings = enabled;
        self
    }

    /// The configured depth bound.
    #[must_use]
    pub fn depth_limit(&self) -> usize {
        self.max_depth
    }

    pub(crate) fn is_leaf_message(&self, full_name: &str) -> bool {
        self.leaf_messages.contains(full_name)
    }

    pub(crate) fn includes_package(&self, package: &str) -> bool {
        self.packages.is_empty() || self.packages.contains(package)
    }
}
