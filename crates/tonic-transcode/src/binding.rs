//! Whole-method and whole-service binding resolution.

use tonic_transcode_core::descriptor::HttpRule;

use crate::body::{BodyBinding, BodySpec};
use crate::config::ResolverConfig;
use crate::error::{BindingError, Result};
use crate::path::FieldPath;
use crate::query::{resolve_query, QueryParam};
use crate::route::{resolve_route_params, RouteParam};
use crate::schema::{MethodDescriptor, Schema, ServiceDescriptor};
use crate::template::RoutePattern;

/// Everything a dispatcher needs to transcode one HTTP route into a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscodingBinding<'s> {
    /// The RPC method this route calls.
    pub method: MethodDescriptor<'s>,
    /// HTTP verb (`GET`, `POST`, … or a custom verb).
    pub verb: String,
    /// Parsed path template.
    pub pattern: RoutePattern,
    /// Path parameters in template order.
    pub route_params: Vec<RouteParam<'s>>,
    /// Request body binding.
    pub body: BodyBinding<'s>,
    /// Query parameters in declaration order.
    pub query: Vec<QueryParam<'s>>,
    /// Response field returned as the HTTP body, when `response_body` is set.
    pub response_body: Option<FieldPath<'s>>,
    /// Whether this binding came from `additional_bindings`.
    pub additional: bool,
}

/// Resolved bindings for one service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceBindings<'s> {
    /// The service.
    pub service: ServiceDescriptor<'s>,
    /// Bindings of every annotated method, primary binding first.
    pub bindings: Vec<TranscodingBinding<'s>>,
}

/// Resolves `google.api.http` rules against a [`Schema`].
#[derive(Clone, Debug)]
pub struct Resolver<'s> {
    schema: &'s Schema,
    config: ResolverConfig,
}

impl<'s> Resolver<'s> {
    /// Create a resolver over `schema`.
    #[must_use]
    pub fn new(schema: &'s Schema, config: ResolverConfig) -> Self {
        Self { schema, config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a single rule for `method`.
    ///
    /// Returns `Ok(None)` when the rule has no pattern: the method has no HTTP
    /// binding and is left out of routing. Nested `additional_bindings` of
    /// `rule` are ignored here; see [`Resolver::resolve_method`].
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] when the template is malformed or any path
    /// parameter, body selector or response selector does not resolve, or when
    /// query flattening hits a recursive message.
    pub fn resolve_rule(
        &self,
        method: MethodDescriptor<'s>,
        rule: &HttpRule,
    ) -> Result<Option<TranscodingBinding<'s>>> {
        let Some((verb, template)) = rule.verb_and_path() else {
            return Ok(None);
        };
        let max_depth = self.config.max_depth;
        let request = method.input();

        let pattern = RoutePattern::parse(template)?;
        let route_params = resolve_route_params(&pattern, request, max_depth)?;
        let body = BodyBinding::resolve(&BodySpec::parse(&rule.body), request, max_depth)?;
        let query = resolve_query(request, &route_params, &body, &self.config)?;
        let response_body = match rule.response_body.as_str() {
            "" => None,
            dotted => Some(FieldPath::resolve(method.output(), dotted, max_depth)?),
        };

        tracing::debug!(
            method = method.full_name(),
            verb,
            template,
            path_params = route_params.len(),
            query_params = query.len(),
            "resolved HTTP binding"
        );

        Ok(Some(TranscodingBinding {
            method,
            verb: verb.to_string(),
            pattern,
            route_params,
            body,
            query,
            response_body,
            additional: false,
        }))
    }

    /// Resolve the primary rule of `method` followed by its
    /// `additional_bindings` (unless disabled in the config).
    ///
    /// Returns an empty list for methods without an HTTP annotation.
    ///
    /// # Errors
    ///
    /// Any failure is wrapped in [`BindingError::Method`] naming the method.
    /// An additional binding that itself carries `additional_bindings` fails
    /// with [`BindingError::NestedAdditionalBindings`].
    pub fn resolve_method(&self, method: MethodDescriptor<'s>) -> Result<Vec<TranscodingBinding<'s>>> {
        let Some(rule) = method.http_rule() else {
            tracing::trace!(method = method.full_name(), "no google.api.http annotation; skipping");
            return Ok(Vec::new());
        };

        self.resolve_method_rules(method, rule)
            .map_err(|err| err.in_method(method.full_name()))
    }

    fn resolve_method_rules(
        &self,
        method: MethodDescriptor<'s>,
        rule: &HttpRule,
    ) -> Result<Vec<TranscodingBinding<'s>>> {
        let mut bindings = Vec::new();
        bindings.extend(self.resolve_rule(method, rule)?);

        if !self.config.additional_bindings {
            return Ok(bindings);
        }

        for extra in &rule.additional_bindings {
            if !extra.additional_bindings.is_empty() {
                return Err(BindingError::NestedAdditionalBindings {
                    template: extra
                        .verb_and_path()
                        .map_or_else(String::new, |(_, path)| path.to_string()),
                });
            }
            if let Some(mut binding) = self.resolve_rule(method, extra)? {
                binding.additional = true;
                bindings.push(binding);
            }
        }

        Ok(bindings)
    }

    /// Services of the schema that belong to the configured packages.
    pub fn services(&self) -> impl Iterator<Item = ServiceDescriptor<'s>> + '_ {
        self.schema
            .services()
            .filter(|service| self.config.includes_package(service.package()))
    }

    /// Resolve every method of every service in the configured packages.
    ///
    /// Services without any HTTP binding are omitted.
    ///
    /// # Errors
    ///
    /// Stops at the first method whose binding fails to resolve; see
    /// [`Resolver::resolve_method`].
    pub fn resolve_services(&self) -> Result<Vec<ServiceBindings<'s>>> {
        let mut result = Vec::new();

        for service in self.services() {
            let mut bindings = Vec::new();
            for method in service.methods() {
                bindings.extend(self.resolve_method(method)?);
            }

            if !bindings.is_empty() {
                result.push(ServiceBindings { service, bindings });
            }
        }

        Ok(result)
    }
}
