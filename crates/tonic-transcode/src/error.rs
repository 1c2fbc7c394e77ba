//! Typed error enum for binding resolution.
//!
//! Every failure is raised while bindings are resolved (route registration
//! time). A failure means the `google.api.http` annotation and the message
//! schema disagree, so callers are expected to abort registration of the
//! affected method rather than fall back to a partial binding.

/// Errors produced while loading a schema or resolving transcoding bindings.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BindingError {
    /// Proto `FileDescriptorSet` decoding failure.
    #[error("failed to decode FileDescriptorSet: {0}")]
    ProtoDecode(#[from] prost::DecodeError),

    /// A field or method references a message type missing from the set.
    ///
    /// Build the descriptor set with `--include_imports` so dependencies
    /// (e.g., `google/protobuf/timestamp.proto`) are present.
    #[error("message type '{type_name}' referenced by '{referrer}' is not in the descriptor set")]
    UnknownMessageType {
        /// The unresolved fully-qualified type name.
        type_name: String,
        /// The field or method that referenced it.
        referrer: String,
    },

    /// A dotted field path does not resolve against a message.
    ///
    /// Either `segment` is not a field of `message`, or it names a scalar
    /// field that the path tries to descend into.
    #[error(
        "field path '{path}' does not resolve: '{segment}' is not a traversable field of '{message}'"
    )]
    UnresolvedFieldPath {
        /// The full dotted path that was requested.
        path: String,
        /// The segment where resolution stopped (empty for an empty segment).
        segment: String,
        /// Fully-qualified name of the message searched for `segment`.
        message: String,
    },

    /// Traversal of a recursive or overly deep message graph was cut off.
    #[error(
        "field path '{path}' in '{message}' exceeds the recursion limit of {limit} \
         (recursive message types cannot be flattened into query parameters)"
    )]
    RecursionLimitExceeded {
        /// The dotted path at which traversal stopped.
        path: String,
        /// Fully-qualified name of the root message being traversed.
        message: String,
        /// The configured maximum depth.
        limit: usize,
    },

    /// A `google.api.http` path template is malformed.
    #[error("invalid path template '{template}': {reason}")]
    InvalidTemplate {
        /// The offending template.
        template: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An entry of `additional_bindings` carries its own `additional_bindings`.
    #[error("additional binding '{template}' must not contain nested additional_bindings")]
    NestedAdditionalBindings {
        /// Path template of the offending additional binding.
        template: String,
    },

    /// Resolution failed for a specific RPC method.
    #[error("invalid HTTP binding for method '{method}': {source}")]
    Method {
        /// Fully-qualified method name (e.g., `users.v1.UserService.GetUser`).
        method: String,
        /// The underlying failure.
        #[source]
        source: Box<BindingError>,
    },
}

impl BindingError {
    /// Attach the failing method name to an error.
    pub(crate) fn in_method(self, method: &str) -> Self {
        Self::Method {
            method: method.to_string(),
            source: Box::new(self),
        }
    }
}

/// Convenience alias used throughout the library's public API.
pub type Result<T> = std::result::Result<T, BindingError>;
