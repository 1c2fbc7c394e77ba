//! Query-parameter resolution.
//!
//! Every request field not bound by the path or the body may be set from the
//! query string. Message fields are flattened into dotted keys
//! (`address.city`), depth-first in declaration order.

use std::collections::HashSet;

use crate::body::BodyBinding;
use crate::config::ResolverConfig;
use crate::error::{BindingError, Result};
use crate::route::RouteParam;
use crate::schema::{FieldDescriptor, MessageDescriptor, MessageId};

/// A request field settable through the query string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryParam<'s> {
    key: String,
    field: FieldDescriptor<'s>,
}

impl<'s> QueryParam<'s> {
    /// Dotted query key (e.g., `address.city`).
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The leaf field the key sets.
    #[must_use]
    pub fn field(&self) -> FieldDescriptor<'s> {
        self.field
    }

    /// Whether the key may appear more than once.
    #[must_use]
    pub fn is_repeated(&self) -> bool {
        self.field.is_repeated()
    }
}

/// Resolve the query parameters left over after path and body binding.
///
/// Returns an empty list for a wildcard body. Otherwise the top-level fields
/// of `request`, minus undotted route parameters and minus every segment name
/// of a body selector, are flattened. Keys equal to a dotted route
/// parameter are skipped along with everything beneath them.
///
/// # Errors
///
/// Returns [`BindingError::RecursionLimitExceeded`] when flattening reaches a
/// message type that is already being flattened (a recursive schema) or
/// exceeds the configured depth.
pub fn resolve_query<'s>(
    request: MessageDescriptor<'s>,
    route_params: &[RouteParam<'s>],
    body: &BodyBinding<'s>,
    config: &ResolverConfig,
) -> Result<Vec<QueryParam<'s>>> {
    if matches!(body, BodyBinding::Wildcard { .. }) {
        return Ok(Vec::new());
    }

    let (nested, top_level): (Vec<&RouteParam<'s>>, Vec<&RouteParam<'s>>) =
        route_params.iter().partition(|param| param.is_nested());

    // Template variables are unique, so this bounds the unconsumed fields.
    if request.field_count() <= top_level.len() {
        return Ok(Vec::new());
    }

    let mut consumed: HashSet<&str> = top_level.iter().map(|param| param.name()).collect();
    if let Some(path) = body.field_path() {
        consumed.extend(path.fields().iter().map(|field| field.name()));
    }

    let mut flattener = Flattener {
        root: request,
        config,
        excluded: nested.iter().map(|param| param.name()).collect(),
        ancestors: vec![request.id()],
        out: Vec::new(),
    };

    for field in request.fields().filter(|f| !consumed.contains(f.name())) {
        flattener.visit(field, field.name().to_string(), 1)?;
    }

    Ok(flattener.out)
}

struct Flattener<'a, 's> {
    root: MessageDescriptor<'s>,
    config: &'a ResolverConfig,
    excluded: HashSet<&'a str>,
    /// Message types on the path from the root to the current field.
    ancestors: Vec<MessageId>,
    out: Vec<QueryParam<'s>>,
}

impl<'s> Flattener<'_, 's> {
    fn visit(&mut self, field: FieldDescriptor<'s>, key: String, depth: usize) -> Result<()> {
        if self.excluded.contains(key.as_str()) {
            return Ok(());
        }

        let nested = field
            .message_type()
            .filter(|m| !self.config.is_leaf_message(m.full_name()));
        let Some(nested) = nested else {
            self.out.push(QueryParam { key, field });
            return Ok(());
        };

        if depth >= self.config.max_depth || self.ancestors.contains(&nested.id()) {
            return Err(BindingError::RecursionLimitExceeded {
                path: key,
                message: self.root.full_name().to_string(),
                limit: self.config.max_depth,
            });
        }

        self.ancestors.push(nested.id());
        for child in nested.fields() {
            let child_key = format!("{key}.{}", child.name());
            self.visit(child, child_key, depth + 1)?;
        }
        self.ancestors.pop();
        Ok(())
    }
}
