//! Serializable view of resolved bindings.
//!
//! Descriptor views borrow the schema arena; the report flattens them into
//! owned strings so it can be written as YAML or JSON.

use serde::Serialize;
use tonic_transcode::{
    BodyBinding, FieldDescriptor, MethodDescriptor, ServiceBindings, TranscodingBinding,
};

use crate::error::Result;

/// Every resolved binding, grouped by service.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct Report {
    /// Services with at least one binding, in declaration order.
    pub services: Vec<ServiceReport>,
}

/// Bindings of one service.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ServiceReport {
    /// Fully-qualified service name.
    pub name: String,
    /// Bindings of the service's methods.
    pub bindings: Vec<BindingReport>,
}

/// One HTTP route and how it maps onto the request message.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct BindingReport {
    /// Short method name.
    pub method: String,
    /// HTTP verb.
    pub verb: String,
    /// Path template.
    pub path: String,
    /// Whether the route comes from `additional_bindings`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub additional: bool,
    /// Path parameters in template order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path_params: Vec<FieldReport>,
    /// Request body binding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyReport>,
    /// Query parameters in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub query_params: Vec<FieldReport>,
    /// Response field returned as the HTTP body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
}

/// A request field bound by name.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FieldReport {
    /// Dotted field path or query key.
    pub name: String,
    /// Scalar keyword, `enum`, or message name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Whether the field is repeated.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub repeated: bool,
}

/// Where the request body is decoded.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct BodyReport {
    /// Body field path, or `*` for the whole request.
    pub field: String,
    /// Message the body is parsed against; absent for a scalar body.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whether the body is a JSON array.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub repeated: bool,
}

impl Report {
    /// Build a report from whole-service resolution results.
    #[must_use]
    pub fn from_services(services: &[ServiceBindings<'_>]) -> Self {
        Self {
            services: services
                .iter()
                .map(|service| ServiceReport {
                    name: service.service.full_name().to_string(),
                    bindings: service.bindings.iter().map(BindingReport::from).collect(),
                })
                .collect(),
        }
    }

    /// Build a report for a single method.
    #[must_use]
    pub fn from_method(method: MethodDescriptor<'_>, bindings: &[TranscodingBinding<'_>]) -> Self {
        if bindings.is_empty() {
            return Self::default();
        }
        Self {
            services: vec![ServiceReport {
                name: method.service().full_name().to_string(),
                bindings: bindings.iter().map(BindingReport::from).collect(),
            }],
        }
    }

    /// Number of bindings across all services.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.services.iter().map(|s| s.bindings.len()).sum()
    }

    /// Render as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Render as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&TranscodingBinding<'_>> for BindingReport {
    fn from(binding: &TranscodingBinding<'_>) -> Self {
        let body = match &binding.body {
            BodyBinding::None => None,
            BodyBinding::Wildcard { message } => Some(BodyReport {
                field: "*".to_string(),
                message: Some(message.full_name().to_string()),
                repeated: false,
            }),
            BodyBinding::Field {
                message,
                path,
                repeated,
            } => Some(BodyReport {
                field: path.to_string(),
                message: message.map(|m| m.full_name().to_string()),
                repeated: *repeated,
            }),
        };

        Self {
            method: binding.method.name().to_string(),
            verb: binding.verb.clone(),
            path: binding.pattern.template().to_string(),
            additional: binding.additional,
            path_params: binding
                .route_params
                .iter()
                .map(|param| field_report(param.name(), param.path().leaf()))
                .collect(),
            body,
            query_params: binding
                .query
                .iter()
                .map(|param| field_report(param.key(), param.field()))
                .collect(),
            response_body: binding.response_body.as_ref().map(ToString::to_string),
        }
    }
}

fn field_report(name: &str, field: FieldDescriptor<'_>) -> FieldReport {
    FieldReport {
        name: name.to_string(),
        type_name: field.type_name().to_string(),
        repeated: field.is_repeated(),
    }
}
