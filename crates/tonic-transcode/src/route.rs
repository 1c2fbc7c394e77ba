//! Path-parameter binding.

use crate::error::Result;
use crate::path::FieldPath;
use crate::schema::MessageDescriptor;
use crate::template::RoutePattern;

/// A template variable bound to a request field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteParam<'s> {
    path: FieldPath<'s>,
}

impl<'s> RouteParam<'s> {
    /// Parameter name as written in the template (e.g., `book.id`).
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.name()
    }

    /// The resolved request field chain.
    #[must_use]
    pub fn path(&self) -> &FieldPath<'s> {
        &self.path
    }

    /// Whether the parameter names a nested field.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.path.len() > 1
    }
}

/// Bind every template variable to a request field, in template order.
///
/// # Errors
///
/// Returns [`BindingError::UnresolvedFieldPath`](crate::BindingError::UnresolvedFieldPath)
/// naming the first parameter that is not a field path of `request`. There
/// are no optional path parameters.
pub fn resolve_route_params<'s>(
    pattern: &RoutePattern,
    request: MessageDescriptor<'s>,
    max_depth: usize,
) -> Result<Vec<RouteParam<'s>>> {
    pattern
        .parameters()
        .map(|name| FieldPath::resolve(request, name, max_depth).map(|path| RouteParam { path }))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tonic_transcode_core::descriptor::field_type;

    use super::*;
    use crate::config::DEFAULT_MAX_DEPTH;
    use crate::error::BindingError;
    use crate::fixtures::{file, message, message_field, scalar, user_schema_set};
    use crate::schema::Schema;

    #[test]
    fn binds_in_template_order() {
        let request = message(
            "UpdateBookRequest",
            vec![
                message_field("book", 1, ".library.v1.Book"),
                scalar("shelf", 2, field_type::STRING),
            ],
        );
        let book = message("Book", vec![scalar("id", 1, field_type::INT64)]);
        let schema =
            Schema::from_file_descriptor_set(&file("library.v1", vec![request, book], vec![]))
                .unwrap();
        let request = schema.message("library.v1.UpdateBookRequest").unwrap();

        let pattern = RoutePattern::parse("/v1/shelves/{shelf}/books/{book.id}").unwrap();
        let params = resolve_route_params(&pattern, request, DEFAULT_MAX_DEPTH).unwrap();

        let names: Vec<_> = params.iter().map(RouteParam::name).collect();
        assert_eq!(names, vec!["shelf", "book.id"]);
        assert!(!params[0].is_nested());
        assert!(params[1].is_nested());
        assert_eq!(params[1].path().leaf().name(), "id");
    }

    #[test]
    fn no_variables_binds_nothing() {
        let schema = Schema::from_file_descriptor_set(&user_schema_set()).unwrap();
        let user = schema.message("users.v1.User").unwrap();
        let pattern = RoutePattern::parse("/users").unwrap();
        assert!(resolve_route_params(&pattern, user, DEFAULT_MAX_DEPTH)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn unknown_parameter_names_parameter_and_message() {
        let schema = Schema::from_file_descriptor_set(&user_schema_set()).unwrap();
        let user = schema.message("users.v1.User").unwrap();
        let pattern = RoutePattern::parse("/users/{id}/{user_id}").unwrap();

        let err = resolve_route_params(&pattern, user, DEFAULT_MAX_DEPTH).unwrap_err();
        assert!(matches!(
            err,
            BindingError::UnresolvedFieldPath { ref path, ref message, .. }
                if path == "user_id" && message == "users.v1.User"
        ));
    }
}
