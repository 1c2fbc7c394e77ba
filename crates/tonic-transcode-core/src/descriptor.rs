//! The slice of `descriptor.proto` and `google/api/http.proto` that binding
//! resolution reads.
//!
//! `prost_types::MethodOptions` has no field for the `google.api.http`
//! extension (72295728), so decoding through it silently loses every HTTP
//! annotation. [`MethodOptions`] here declares the extension as a regular
//! field, and [`HttpRule`] mirrors the complete rule: custom verbs,
//! `response_body` and `additional_bindings` included.

#[allow(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
mod types {
    use prost::Message;

    #[derive(Clone, PartialEq, Message)]
    pub struct FileDescriptorSet {
        #[prost(message, repeated, tag = "1")]
        pub file: Vec<FileDescriptorProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct FileDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(string, optional, tag = "2")]
        pub package: Option<String>,
        #[prost(message, repeated, tag = "4")]
        pub message_type: Vec<DescriptorProto>,
        #[prost(message, repeated, tag = "6")]
        pub service: Vec<ServiceDescriptorProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct DescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(message, repeated, tag = "2")]
        pub field: Vec<FieldDescriptorProto>,
        #[prost(message, repeated, tag = "3")]
        pub nested_type: Vec<DescriptorProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct FieldDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(int32, optional, tag = "3")]
        pub number: Option<i32>,
        /// Protobuf label enum: 1=optional, 2=required, 3=repeated.
        #[prost(int32, optional, tag = "4")]
        pub label: Option<i32>,
        /// Protobuf field type enum: 1=double, 5=int32, 9=string, 10=group, 11=message, 14=enum, …
        #[prost(int32, optional, tag = "5")]
        pub r#type: Option<i32>,
        /// Fully-qualified type name for message/group/enum fields (e.g., `.users.v1.Address`).
        #[prost(string, optional, tag = "6")]
        pub type_name: Option<String>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct ServiceDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(message, repeated, tag = "2")]
        pub method: Vec<MethodDescriptorProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct MethodDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(string, optional, tag = "2")]
        pub input_type: Option<String>,
        #[prost(string, optional, tag = "3")]
        pub output_type: Option<String>,
        #[prost(message, optional, tag = "4")]
        pub options: Option<MethodOptions>,
        #[prost(bool, optional, tag = "5")]
        pub client_streaming: Option<bool>,
        #[prost(bool, optional, tag = "6")]
        pub server_streaming: Option<bool>,
    }

    /// `google.protobuf.MethodOptions`, reduced to the `google.api.http` extension.
    #[derive(Clone, PartialEq, Message)]
    pub struct MethodOptions {
        #[prost(message, optional, tag = "72295728")]
        pub http: Option<HttpRule>,
    }

    /// `google.api.HttpRule`: defines the REST mapping for an RPC.
    #[derive(Clone, PartialEq, Message)]
    pub struct HttpRule {
        #[prost(string, tag = "1")]
        pub selector: String,
        #[prost(oneof = "HttpPattern", tags = "2, 3, 4, 5, 6, 8")]
        pub pattern: Option<HttpPattern>,
        #[prost(string, tag = "7")]
        pub body: String,
        #[prost(message, repeated, tag = "11")]
        pub additional_bindings: Vec<HttpRule>,
        #[prost(string, tag = "12")]
        pub response_body: String,
    }

    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum HttpPattern {
        #[prost(string, tag = "2")]
        Get(String),
        #[prost(string, tag = "3")]
        Put(String),
        #[prost(string, tag = "4")]
        Post(String),
        #[prost(string, tag = "5")]
        Delete(String),
        #[prost(string, tag = "6")]
        Patch(String),
        #[prost(message, tag = "8")]
        Custom(CustomHttpPattern),
    }

    /// `google.api.CustomHttpPattern`: a verb outside the five standard ones.
    #[derive(Clone, PartialEq, Message)]
    pub struct CustomHttpPattern {
        #[prost(string, tag = "1")]
        pub kind: String,
        #[prost(string, tag = "2")]
        pub path: String,
    }
}

pub use types::*;

/// Values of `FieldDescriptorProto.type`.
pub mod field_type {
    /// `TYPE_DOUBLE = 1`
    pub const DOUBLE: i32 = 1;
    /// `TYPE_FLOAT = 2`
    pub const FLOAT: i32 = 2;
    /// `TYPE_INT64 = 3`
    pub const INT64: i32 = 3;
    /// `TYPE_UINT64 = 4`
    pub const UINT64: i32 = 4;
    /// `TYPE_INT32 = 5`
    pub const INT32: i32 = 5;
    /// `TYPE_FIXED64 = 6`
    pub const FIXED64: i32 = 6;
    /// `TYPE_FIXED32 = 7`
    pub const FIXED32: i32 = 7;
    /// `TYPE_BOOL = 8`
    pub const BOOL: i32 = 8;
    /// `TYPE_STRING = 9`
    pub const STRING: i32 = 9;
    /// `TYPE_GROUP = 10`
    pub const GROUP: i32 = 10;
    /// `TYPE_MESSAGE = 11`
    pub const MESSAGE: i32 = 11;
    /// `TYPE_BYTES = 12`
    pub const BYTES: i32 = 12;
    /// `TYPE_UINT32 = 13`
    pub const UINT32: i32 = 13;
    /// `TYPE_ENUM = 14`
    pub const ENUM: i32 = 14;
    /// `TYPE_SFIXED32 = 15`
    pub const SFIXED32: i32 = 15;
    /// `TYPE_SFIXED64 = 16`
    pub const SFIXED64: i32 = 16;
    /// `TYPE_SINT32 = 17`
    pub const SINT32: i32 = 17;
    /// `TYPE_SINT64 = 18`
    pub const SINT64: i32 = 18;
}

/// Values of `FieldDescriptorProto.label`.
pub mod field_label {
    /// `LABEL_OPTIONAL = 1`
    pub const OPTIONAL: i32 = 1;
    /// `LABEL_REQUIRED = 2`
    pub const REQUIRED: i32 = 2;
    /// `LABEL_REPEATED = 3`
    pub const REPEATED: i32 = 3;
}

impl HttpRule {
    /// Extract `(verb, path template)` from the rule's pattern.
    ///
    /// The five standard patterns yield their upper-case HTTP method name;
    /// [`HttpPattern::Custom`] yields its own `kind`. Returns `None` when the
    /// rule carries no pattern, meaning the method has no HTTP binding.
    #[must_use]
    pub fn verb_and_path(&self) -> Option<(&str, &str)> {
        Some(match self.pattern.as_ref()? {
            HttpPattern::Get(p) => ("GET", p.as_str()),
            HttpPattern::Put(p) => ("PUT", p.as_str()),
            HttpPattern::Post(p) => ("POST", p.as_str()),
            HttpPattern::Delete(p) => ("DELETE", p.as_str()),
            HttpPattern::Patch(p) => ("PATCH", p.as_str()),
            HttpPattern::Custom(c) => (c.kind.as_str(), c.path.as_str()),
        })
    }
}

impl MethodDescriptorProto {
    /// The method's `google.api.http` rule, if annotated.
    #[must_use]
    pub fn http_rule(&self) -> Option<&HttpRule> {
        self.options.as_ref().and_then(|o| o.http.as_ref())
    }
}

/// Extract `(verb, path)` from a method's `google.api.http` annotation.
#[must_use]
pub fn extract_http_pattern(method: &MethodDescriptorProto) -> Option<(&str, &str)> {
    method.http_rule().and_then(HttpRule::verb_and_path)
}
