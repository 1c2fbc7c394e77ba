//! Dotted field-path resolution.
//!
//! A [`FieldPath`] is the chain of fields named by a dotted string such as
//! `parent.address.city`, resolved against a root message. Field `i` of the
//! chain is always declared by the message type of field `i - 1` (or by the
//! root for `i == 0`).

use std::fmt;

use crate::error::{BindingError, Result};
use crate::schema::{FieldDescriptor, MessageDescriptor};

/// A resolved, non-empty chain of fields.
#[derive(Clone, PartialEq, Eq)]
pub struct FieldPath<'s> {
    name: String,
    fields: Box<[FieldDescriptor<'s>]>,
}

impl<'s> FieldPath<'s> {
    /// Resolve `dotted` against `root`.
    ///
    /// Segments are matched by exact name. Every segment except the last must
    /// name a message or group field.
    ///
    /// # Errors
    ///
    /// - [`BindingError::UnresolvedFieldPath`] if a segment is empty, is not a
    ///   field of the current message, or descends through a scalar field.
    /// - [`BindingError::RecursionLimitExceeded`] if the path has more than
    ///   `max_depth` segments.
    pub fn resolve(root: MessageDescriptor<'s>, dotted: &str, max_depth: usize) -> Result<Self> {
        let unresolved = |segment: &str, message: MessageDescriptor<'_>| {
            BindingError::UnresolvedFieldPath {
                path: dotted.to_string(),
                segment: segment.to_string(),
                message: message.full_name().to_string(),
            }
        };

        if dotted.split('.').count() > max_depth {
            return Err(BindingError::RecursionLimitExceeded {
                path: dotted.to_string(),
                message: root.full_name().to_string(),
                limit: max_depth,
            });
        }

        let mut fields = Vec::new();
        let mut message = root;
        let mut segments = dotted.split('.').peekable();

        while let Some(segment) = segments.next() {
            if segment.is_empty() {
                return Err(unresolved(segment, message));
            }
            let field = message
                .field_by_name(segment)
                .ok_or_else(|| unresolved(segment, message))?;
            fields.push(field);

            if segments.peek().is_some() {
                // A scalar or enum segment cannot be descended into.
                message = field
                    .message_type()
                    .ok_or_else(|| unresolved(segment, message))?;
            }
        }

        Ok(Self {
            name: dotted.to_string(),
            fields: fields.into_boxed_slice(),
        })
    }

    /// The dotted name this path was resolved from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in traversal order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor<'s>] {
        &self.fields
    }

    /// The first (top-level) field.
    #[must_use]
    pub fn first(&self) -> FieldDescriptor<'s> {
        self.fields[0]
    }

    /// The last (leaf) field.
    #[must_use]
    pub fn leaf(&self) -> FieldDescriptor<'s> {
        self.fields[self.fields.len() - 1]
    }

    /// Number of segments; never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always `false`: a resolved path has at least one segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for FieldPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for FieldPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPath")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tonic_transcode_core::descriptor::field_type;

    use super::*;
    use crate::config::DEFAULT_MAX_DEPTH;
    use crate::fixtures::{file, message, message_field, repeated, scalar, user_schema_set};
    use crate::schema::Schema;

    fn resolve<'s>(root: MessageDescriptor<'s>, dotted: &str) -> Result<FieldPath<'s>> {
        FieldPath::resolve(root, dotted, DEFAULT_MAX_DEPTH)
    }

    #[test]
    fn resolves_single_segment() {
        let schema = Schema::from_file_descriptor_set(&user_schema_set()).unwrap();
        let user = schema.message("users.v1.User").unwrap();

        let path = resolve(user, "id").unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.name(), "id");
        assert_eq!(path.leaf().containing_type(), user);
        assert_eq!(path.first(), path.leaf());
    }

    #[test]
    fn resolves_nested_chain() {
        let schema = Schema::from_file_descriptor_set(&user_schema_set()).unwrap();
        let user = schema.message("users.v1.User").unwrap();
        let address = schema.message("users.v1.Address").unwrap();

        let path = resolve(user, "address.zip").unwrap();
        let names: Vec<_> = path.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names.join("."), "address.zip");

        // Each link is declared by the previous link's message type.
        assert_eq!(path.fields()[0].containing_type(), user);
        assert_eq!(path.fields()[0].message_type(), Some(address));
        assert_eq!(path.leaf().containing_type(), address);
        assert_eq!(path.to_string(), "address.zip");
    }

    #[test]
    fn empty_path_fails() {
        let schema = Schema::from_file_descriptor_set(&user_schema_set()).unwrap();
        let user = schema.message("users.v1.User").unwrap();

        for dotted in ["", ".", "address.", ".id", "address..zip"] {
            let err = resolve(user, dotted).unwrap_err();
            assert!(
                matches!(err, BindingError::UnresolvedFieldPath { ref segment, .. } if segment.is_empty()),
                "{dotted:?} should fail on an empty segment, got {err}"
            );
        }
    }

    #[test]
    fn missing_field_fails_without_partial_result() {
        let schema = Schema::from_file_descriptor_set(&user_schema_set()).unwrap();
        let user = schema.message("users.v1.User").unwrap();

        let err = resolve(user, "missing.field").unwrap_err();
        assert_eq!(
            err.to_string(),
            "field path 'missing.field' does not resolve: 'missing' is not a traversable \
             field of 'users.v1.User'"
        );

        let err = resolve(user, "address.country").unwrap_err();
        assert!(matches!(
            err,
            BindingError::UnresolvedFieldPath { ref segment, ref message, .. }
                if segment == "country" && message == "users.v1.Address"
        ));
    }

    #[test]
    fn scalar_cannot_be_traversed() {
        let schema = Schema::from_file_descriptor_set(&user_schema_set()).unwrap();
        let user = schema.message("users.v1.User").unwrap();

        let err = resolve(user, "id.value").unwrap_err();
        assert_eq!(
            err.to_string(),
            "field path 'id.value' does not resolve: 'id' is not a traversable \
             field of 'users.v1.User'"
        );

        let err = resolve(user, "address.city.name").unwrap_err();
        assert!(matches!(
            err,
            BindingError::UnresolvedFieldPath { ref segment, ref message, .. }
                if segment == "city" && message == "users.v1.Address"
        ));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let schema = Schema::from_file_descriptor_set(&user_schema_set()).unwrap();
        let user = schema.message("users.v1.User").unwrap();
        assert!(resolve(user, "Address.city").is_err());
    }

    #[test]
    fn recursive_schema_respects_depth_limit() {
        let node = message(
            "Node",
            vec![
                scalar("name", 1, field_type::STRING),
                message_field("parent", 2, ".tree.v1.Node"),
                repeated(message_field("children", 3, ".tree.v1.Node")),
            ],
        );
        let schema = Schema::from_file_descriptor_set(&file("tree.v1", vec![node], vec![])).unwrap();
        let node = schema.message("tree.v1.Node").unwrap();

        let path = FieldPath::resolve(node, "parent.parent.name", 3).unwrap();
        assert_eq!(path.len(), 3);
        assert!(path.leaf().containing_type() == node);

        // Repeated message fields are traversable too.
        assert!(resolve(node, "children.name").is_ok());

        let err = FieldPath::resolve(node, "parent.parent.parent.name", 3).unwrap_err();
        assert!(matches!(
            err,
            BindingError::RecursionLimitExceeded { limit: 3, .. }
        ));
    }
}
