//! `google.api.http` path template parsing.
//!
//! ```text
//! Template = "/" Segments [ Verb ] ;
//! Segments = Segment { "/" Segment } ;
//! Segment  = "*" | "**" | LITERAL | Variable ;
//! Variable = "{" FieldPath [ "=" Segments ] "}" ;
//! FieldPath = IDENT { "." IDENT } ;
//! Verb     = ":" LITERAL ;
//! ```
//!
//! Only what binding resolution needs is extracted: the ordered variable
//! names (which become route parameters), their optional sub-patterns and the
//! trailing custom verb.

use crate::error::{BindingError, Result};

/// A `{field.path}` or `{field.path=segments}` variable in a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteVariable {
    name: String,
    pattern: Option<String>,
}

impl RouteVariable {
    /// Dotted field path bound by this variable (e.g., `book.id`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Segment pattern after `=`, if any (e.g., `shelves/*`).
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }
}

/// A parsed path template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutePattern {
    template: String,
    variables: Vec<RouteVariable>,
    verb: Option<String>,
}

impl RoutePattern {
    /// Parse a path template such as `/v1/{parent=shelves/*}/books/{book.id}:publish`.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::InvalidTemplate`] if the template does not start
    /// with `/`, has unbalanced or nested braces, an invalid or duplicate
    /// variable name, an empty sub-pattern, or an empty trailing verb.
    pub fn parse(template: &str) -> Result<Self> {
        let invalid = |reason: String| BindingError::InvalidTemplate {
            template: template.to_string(),
            reason,
        };

        if !template.starts_with('/') {
            return Err(invalid("must start with '/'".to_string()));
        }

        let mut variables: Vec<RouteVariable> = Vec::new();
        let mut rest = template;

        while let Some(start) = rest.find(['{', '}']) {
            if rest[start..].starts_with('}') {
                return Err(invalid("unmatched '}'".to_string()));
            }
            let Some(len) = rest[start..].find('}') else {
                return Err(invalid("unclosed '{'".to_string()));
            };
            let inner = &rest[start + 1..start + len];
            if inner.contains('{') {
                return Err(invalid("nested '{' inside a variable".to_string()));
            }

            let variable = parse_variable(inner).map_err(invalid)?;
            if variables.iter().any(|v| v.name == variable.name) {
                return Err(invalid(format!("duplicate variable '{}'", variable.name)));
            }
            variables.push(variable);
            rest = &rest[start + len + 1..];
        }

        // The verb lives in the final segment, outside any variable.
        let last_segment = rest.rsplit('/').next().unwrap_or(rest);
        let verb = match last_segment.split_once(':') {
            Some((_, "")) => return Err(invalid("empty verb after ':'".to_string())),
            Some((_, verb)) => Some(verb.to_string()),
            None => None,
        };

        Ok(Self {
            template: template.to_string(),
            variables,
            verb,
        })
    }

    /// The original template string.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Variables in declaration order.
    #[must_use]
    pub fn variables(&self) -> &[RouteVariable] {
        &self.variables
    }

    /// Variable names in declaration order.
    pub fn parameters(&self) -> impl ExactSizeIterator<Item = &str> {
        self.variables.iter().map(RouteVariable::name)
    }

    /// Custom verb suffix (e.g., `publish` for `…:publish`).
    #[must_use]
    pub fn verb(&self) -> Option<&str> {
        self.verb.as_deref()
    }
}

fn parse_variable(inner: &str) -> std::result::Result<RouteVariable, String> {
    let (name, pattern) = match inner.split_once('=') {
        Some((_, "")) => return Err(format!("variable '{inner}' has an empty pattern")),
        Some((name, pattern)) => (name, Some(pattern.to_string())),
        None => (inner, None),
    };

    if name.is_empty() {
        return Err("empty variable name".to_string());
    }
    if let Some(segment) = name.split('.').find(|s| !is_ident(s)) {
        return Err(format!(
            "variable '{name}' has invalid field path segment '{segment}'"
        ));
    }

    Ok(RouteVariable {
        name: name.to_string(),
        pattern,
    })
}

fn is_ident(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
