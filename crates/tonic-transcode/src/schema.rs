//! In-memory descriptor arena built from a `FileDescriptorSet`.
//!
//! Messages, fields and methods are interned once into flat vectors and
//! referenced by index. The public descriptor types ([`MessageDescriptor`],
//! [`FieldDescriptor`], [`MethodDescriptor`], …) are `Copy` views borrowing
//! the arena, so resolution never clones schema data.

use std::collections::HashMap;
use std::fmt;

use prost::Message as _;
use tonic_transcode_core::descriptor::{
    field_label, field_type, DescriptorProto, FieldDescriptorProto, FileDescriptorSet, HttpRule,
    ServiceDescriptorProto,
};

use crate::error::{BindingError, Result};

/// Index of a message in a [`Schema`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(usize);

/// Index of a field in a [`Schema`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldId(usize);

/// Protobuf scalar value types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ScalarType {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Bytes,
    Uint32,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

impl ScalarType {
    fn from_type_id(type_id: i32) -> Option<Self> {
        Some(match type_id {
            field_type::DOUBLE => Self::Double,
            field_type::FLOAT => Self::Float,
            field_type::INT64 => Self::Int64,
            field_type::UINT64 => Self::Uint64,
            field_type::INT32 => Self::Int32,
            field_type::FIXED64 => Self::Fixed64,
            field_type::FIXED32 => Self::Fixed32,
            field_type::BOOL => Self::Bool,
            field_type::STRING => Self::String,
            field_type::BYTES => Self::Bytes,
            field_type::UINT32 => Self::Uint32,
            field_type::SFIXED32 => Self::Sfixed32,
            field_type::SFIXED64 => Self::Sfixed64,
            field_type::SINT32 => Self::Sint32,
            field_type::SINT64 => Self::Sint64,
            _ => return None,
        })
    }

    /// The `.proto` keyword for this type (e.g., `int32`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Int32 => "int32",
            Self::Fixed64 => "fixed64",
            Self::Fixed32 => "fixed32",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Uint32 => "uint32",
            Self::Sfixed32 => "sfixed32",
            Self::Sfixed64 => "sfixed64",
            Self::Sint32 => "sint32",
            Self::Sint64 => "sint64",
        }
    }
}

/// What a field holds. Repetition is tracked separately
/// ([`FieldDescriptor::is_repeated`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// A scalar value.
    Scalar(ScalarType),
    /// An enum value.
    Enum,
    /// A nested message.
    Message(MessageId),
    /// A proto2 group (a nested message with group encoding).
    Group(MessageId),
}

#[derive(Debug)]
struct MessageEntry {
    name: String,
    full_name: String,
    fields: Vec<FieldId>,
    by_name: HashMap<String, FieldId>,
}

#[derive(Debug)]
struct FieldEntry {
    name: String,
    number: i32,
    kind: FieldKind,
    repeated: bool,
    containing: MessageId,
}

#[derive(Debug)]
struct ServiceEntry {
    name: String,
    full_name: String,
    package: String,
    methods: Vec<MethodEntry>,
}

#[derive(Debug)]
struct MethodEntry {
    name: String,
    full_name: String,
    input: MessageId,
    output: MessageId,
    client_streaming: bool,
    server_streaming: bool,
    http: Option<HttpRule>,
}

/// Immutable descriptor arena.
///
/// Built once per descriptor set via [`Schema::decode`] or
/// [`Schema::from_file_descriptor_set`]; every resolution borrows it.
#[derive(Debug, Default)]
pub struct Schema {
    messages: Vec<MessageEntry>,
    fields: Vec<FieldEntry>,
    services: Vec<ServiceEntry>,
    by_name: HashMap<String, MessageId>,
}

impl Schema {
    /// Decode a binary `FileDescriptorSet` and build the arena.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::ProtoDecode`] for malformed bytes and
    /// [`BindingError::UnknownMessageType`] when a message reference cannot be
    /// resolved within the set.
    pub fn decode(descriptor_bytes: &[u8]) -> Result<Self> {
        let fdset = FileDescriptorSet::decode(descriptor_bytes)?;
        Self::from_file_descriptor_set(&fdset)
    }

    /// Build the arena from an already-decoded descriptor set.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::UnknownMessageType`] when a field type or a
    /// method input/output type is not defined in the set.
    pub fn from_file_descriptor_set(fdset: &FileDescriptorSet) -> Result<Self> {
        let mut schema = Self::default();

        // Register every message first so fields can reference types declared
        // later in the set (or themselves).
        let mut pending = Vec::new();
        for file in &fdset.file {
            let package = file.package.as_deref().unwrap_or("");
            for msg in &file.message_type {
                schema.register_message(package, msg, &mut pending);
            }
        }

        for (id, msg) in pending {
            for field in &msg.field {
                schema.add_field(id, field)?;
            }
        }

        for file in &fdset.file {
            let package = file.package.as_deref().unwrap_or("");
            for service in &file.service {
                schema.add_service(package, service)?;
            }
        }

        tracing::debug!(
            files = fdset.file.len(),
            messages = schema.messages.len(),
            fields = schema.fields.len(),
            services = schema.services.len(),
            "loaded descriptor set"
        );

        Ok(schema)
    }

    fn register_message<'a>(
        &mut self,
        parent: &str,
        msg: &'a DescriptorProto,
        pending: &mut Vec<(MessageId, &'a DescriptorProto)>,
    ) {
        let name = msg.name.as_deref().unwrap_or("").to_string();
        let full_name = qualify(parent, &name);

        let id = MessageId(self.messages.len());
        self.by_name.entry(full_name.clone()).or_insert(id);
        self.messages.push(MessageEntry {
            name,
            full_name: full_name.clone(),
            fields: Vec::new(),
            by_name: HashMap::new(),
        });
        pending.push((id, msg));

        for nested in &msg.nested_type {
            self.register_message(&full_name, nested, pending);
        }
    }

    fn add_field(&mut self, containing: MessageId, field: &FieldDescriptorProto) -> Result<()> {
        let name = field.name.as_deref().unwrap_or("").to_string();
        let kind = self.field_kind(containing, &name, field)?;

        let id = FieldId(self.fields.len());
        self.fields.push(FieldEntry {
            name: name.clone(),
            number: field.number.unwrap_or(0),
            kind,
            repeated: field.label == Some(field_label::REPEATED),
            containing,
        });

        let entry = &mut self.messages[containing.0];
        entry.fields.push(id);
        entry.by_name.entry(name).or_insert(id);
        Ok(())
    }

    fn field_kind(
        &self,
        containing: MessageId,
        name: &str,
        field: &FieldDescriptorProto,
    ) -> Result<FieldKind> {
        let type_name = field.type_name.as_deref();
        let unknown = || BindingError::UnknownMessageType {
            type_name: type_name.unwrap_or("").to_string(),
            referrer: qualify(&self.messages[containing.0].full_name, name),
        };

        match field.r#type {
            Some(field_type::MESSAGE) => type_name
                .and_then(|t| self.message_id(t))
                .map(FieldKind::Message)
                .ok_or_else(unknown),
            Some(field_type::GROUP) => type_name
                .and_then(|t| self.message_id(t))
                .map(FieldKind::Group)
                .ok_or_else(unknown),
            Some(field_type::ENUM) => Ok(FieldKind::Enum),
            // Unset type with a type name: not yet resolved by the parser, so
            // it is a message if the set defines one under that name.
            None if type_name.is_some() => Ok(type_name
                .and_then(|t| self.message_id(t))
                .map_or(FieldKind::Enum, FieldKind::Message)),
            Some(type_id) => Ok(FieldKind::Scalar(
                ScalarType::from_type_id(type_id).unwrap_or_else(|| {
                    tracing::warn!(
                        field = %qualify(&self.messages[containing.0].full_name, name),
                        type_id,
                        "unrecognised field type, treating as string"
                    );
                    ScalarType::String
                }),
            )),
            None => Ok(FieldKind::Scalar(ScalarType::String)),
        }
    }

    fn add_service(&mut self, package: &str, service: &ServiceDescriptorProto) -> Result<()> {
        let name = service.name.as_deref().unwrap_or("").to_string();
        let full_name = qualify(package, &name);

        let mut methods = Vec::with_capacity(service.method.len());
        for method in &service.method {
            let method_name = method.name.as_deref().unwrap_or("").to_string();
            let method_full_name = qualify(&full_name, &method_name);
            let lookup = |type_name: Option<&str>| {
                let type_name = type_name.unwrap_or("");
                self.message_id(type_name)
                    .ok_or_else(|| BindingError::UnknownMessageType {
                        type_name: type_name.to_string(),
                        referrer: method_full_name.clone(),
                    })
            };

            methods.push(MethodEntry {
                input: lookup(method.input_type.as_deref())?,
                output: lookup(method.output_type.as_deref())?,
                name: method_name.clone(),
                full_name: method_full_name.clone(),
                client_streaming: method.client_streaming.unwrap_or(false),
                server_streaming: method.server_streaming.unwrap_or(false),
                http: method.http_rule().cloned(),
            });
        }

        self.services.push(ServiceEntry {
            name,
            full_name,
            package: package.to_string(),
            methods,
        });
        Ok(())
    }

    fn message_id(&self, type_name: &str) -> Option<MessageId> {
        self.by_name.get(type_name.trim_start_matches('.')).copied()
    }

    /// Look up a message by fully-qualified name (leading dot optional).
    #[must_use]
    pub fn message(&self, full_name: &str) -> Option<MessageDescriptor<'_>> {
        self.message_id(full_name)
            .map(|id| MessageDescriptor { schema: self, id })
    }

    /// All messages, in registration order (files, then declaration order,
    /// nested types after their parent).
    pub fn messages(&self) -> impl ExactSizeIterator<Item = MessageDescriptor<'_>> {
        (0..self.messages.len()).map(move |i| MessageDescriptor {
            schema: self,
            id: MessageId(i),
        })
    }

    /// All services, in declaration order.
    pub fn services(&self) -> impl ExactSizeIterator<Item = ServiceDescriptor<'_>> {
        (0..self.services.len()).map(move |index| ServiceDescriptor {
            schema: self,
            index,
        })
    }

    /// Look up a method by `Service.Method` or fully-qualified
    /// `package.Service.Method` name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<MethodDescriptor<'_>> {
        let name = name.trim_start_matches('.');
        self.services()
            .flat_map(|service| service.methods())
            .find(|method| {
                method.full_name() == name
                    || format!("{}.{}", method.service().name(), method.name()) == name
            })
    }
}

fn qualify(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

// *** MessageDescriptor ***

/// A message type in a [`Schema`].
#[derive(Clone, Copy)]
pub struct MessageDescriptor<'s> {
    schema: &'s Schema,
    id: MessageId,
}

impl<'s> MessageDescriptor<'s> {
    fn entry(self) -> &'s MessageEntry {
        &self.schema.messages[self.id.0]
    }

    /// Arena index of this message.
    #[must_use]
    pub fn id(self) -> MessageId {
        self.id
    }

    /// Short name (e.g., `Address`).
    #[must_use]
    pub fn name(self) -> &'s str {
        &self.entry().name
    }

    /// Fully-qualified name without a leading dot (e.g., `users.v1.User.Address`).
    #[must_use]
    pub fn full_name(self) -> &'s str {
        &self.entry().full_name
    }

    /// Fields in declaration order.
    pub fn fields(self) -> impl ExactSizeIterator<Item = FieldDescriptor<'s>> {
        let schema = self.schema;
        self.entry()
            .fields
            .iter()
            .map(move |&id| FieldDescriptor { schema, id })
    }

    /// Number of declared fields.
    #[must_use]
    pub fn field_count(self) -> usize {
        self.entry().fields.len()
    }

    /// Look up a field by exact (case-sensitive) name.
    #[must_use]
    pub fn field_by_name(self, name: &str) -> Option<FieldDescriptor<'s>> {
        self.entry().by_name.get(name).map(|&id| FieldDescriptor {
            schema: self.schema,
            id,
        })
    }
}

impl PartialEq for MessageDescriptor<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema) && self.id == other.id
    }
}

impl Eq for MessageDescriptor<'_> {}

impl fmt::Debug for MessageDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MessageDescriptor")
            .field(&self.full_name())
            .finish()
    }
}

// *** FieldDescriptor ***

/// A field of a message in a [`Schema`].
#[derive(Clone, Copy)]
pub struct FieldDescriptor<'s> {
    schema: &'s Schema,
    id: FieldId,
}

impl<'s> FieldDescriptor<'s> {
    fn entry(self) -> &'s FieldEntry {
        &self.schema.fields[self.id.0]
    }

    /// Arena index of this field.
    #[must_use]
    pub fn id(self) -> FieldId {
        self.id
    }

    /// Field name as declared (e.g., `display_name`).
    #[must_use]
    pub fn name(self) -> &'s str {
        &self.entry().name
    }

    /// Field number.
    #[must_use]
    pub fn number(self) -> i32 {
        self.entry().number
    }

    /// Value kind, independent of repetition.
    #[must_use]
    pub fn kind(self) -> FieldKind {
        self.entry().kind
    }

    /// Whether the field holds a sequence of its kind.
    #[must_use]
    pub fn is_repeated(self) -> bool {
        self.entry().repeated
    }

    /// The message declaring this field.
    #[must_use]
    pub fn containing_type(self) -> MessageDescriptor<'s> {
        MessageDescriptor {
            schema: self.schema,
            id: self.entry().containing,
        }
    }

    /// The nested message type for message and group fields.
    #[must_use]
    pub fn message_type(self) -> Option<MessageDescriptor<'s>> {
        match self.kind() {
            FieldKind::Message(id) | FieldKind::Group(id) => Some(MessageDescriptor {
                schema: self.schema,
                id,
            }),
            FieldKind::Scalar(_) | FieldKind::Enum => None,
        }
    }

    /// Human-readable type: the scalar keyword, `enum`, or the message name.
    #[must_use]
    pub fn type_name(self) -> &'s str {
        match self.kind() {
            FieldKind::Scalar(scalar) => scalar.as_str(),
            FieldKind::Enum => "enum",
            FieldKind::Message(_) | FieldKind::Group(_) => {
                self.message_type().map_or("message", MessageDescriptor::full_name)
            }
        }
    }
}

impl PartialEq for FieldDescriptor<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema) && self.id == other.id
    }
}

impl Eq for FieldDescriptor<'_> {}

impl fmt::Debug for FieldDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FieldDescriptor({}.{})",
            self.containing_type().full_name(),
            self.name()
        )
    }
}

// *** ServiceDescriptor ***

/// A service in a [`Schema`].
#[derive(Clone, Copy)]
pub struct ServiceDescriptor<'s> {
    schema: &'s Schema,
    index: usize,
}

impl<'s> ServiceDescriptor<'s> {
    fn entry(self) -> &'s ServiceEntry {
        &self.schema.services[self.index]
    }

    /// Short name (e.g., `UserService`).
    #[must_use]
    pub fn name(self) -> &'s str {
        &self.entry().name
    }

    /// Fully-qualified name (e.g., `users.v1.UserService`).
    #[must_use]
    pub fn full_name(self) -> &'s str {
        &self.entry().full_name
    }

    /// Proto package the service is declared in.
    #[must_use]
    pub fn package(self) -> &'s str {
        &self.entry().package
    }

    /// Methods in declaration order.
    pub fn methods(self) -> impl ExactSizeIterator<Item = MethodDescriptor<'s>> {
        let schema = self.schema;
        let service = self.index;
        (0..self.entry().methods.len()).map(move |index| MethodDescriptor {
            schema,
            service,
            index,
        })
    }
}

impl PartialEq for ServiceDescriptor<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema) && self.index == other.index
    }
}

impl Eq for ServiceDescriptor<'_> {}

impl fmt::Debug for ServiceDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceDescriptor")
            .field(&self.full_name())
            .finish()
    }
}

// *** MethodDescriptor ***

/// An RPC method in a [`Schema`].
#[derive(Clone, Copy)]
pub struct MethodDescriptor<'s> {
    schema: &'s Schema,
    service: usize,
    index: usize,
}

impl<'s> MethodDescriptor<'s> {
    fn entry(self) -> &'s MethodEntry {
        &self.schema.services[self.service].methods[self.index]
    }

    /// Short name (e.g., `GetUser`).
    #[must_use]
    pub fn name(self) -> &'s str {
        &self.entry().name
    }

    /// Fully-qualified name (e.g., `users.v1.UserService.GetUser`).
    #[must_use]
    pub fn full_name(self) -> &'s str {
        &self.entry().full_name
    }

    /// The service declaring this method.
    #[must_use]
    pub fn service(self) -> ServiceDescriptor<'s> {
        ServiceDescriptor {
            schema: self.schema,
            index: self.service,
        }
    }

    /// Request message type.
    #[must_use]
    pub fn input(self) -> MessageDescriptor<'s> {
        MessageDescriptor {
            schema: self.schema,
            id: self.entry().input,
        }
    }

    /// Response message type.
    #[must_use]
    pub fn output(self) -> MessageDescriptor<'s> {
        MessageDescriptor {
            schema: self.schema,
            id: self.entry().output,
        }
    }

    /// Whether the client streams requests.
    #[must_use]
    pub fn client_streaming(self) -> bool {
        self.entry().client_streaming
    }

    /// Whether the server streams responses.
    #[must_use]
    pub fn server_streaming(self) -> bool {
        self.entry().server_streaming
    }

    /// The `google.api.http` rule, if the method is annotated.
    #[must_use]
    pub fn http_rule(self) -> Option<&'s HttpRule> {
        self.entry().http.as_ref()
    }
}

impl PartialEq for MethodDescriptor<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema)
            && self.service == other.service
            && self.index == other.index
    }
}

impl Eq for MethodDescriptor<'_> {}

impl fmt::Debug for MethodDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MethodDescriptor")
            .field(&self.full_name())
            .finish()
    }
}
