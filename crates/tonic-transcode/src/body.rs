//! Request body binding.

use crate::error::Result;
use crate::path::FieldPath;
use crate::schema::MessageDescriptor;

/// The `body` selector of an `HttpRule`, parsed into an explicit mode.
///
/// Keeping "no body" and "whole message" apart matters for query resolution:
/// a wildcard body consumes every field, while no body leaves them all for the
/// query string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BodySpec {
    /// `body: ""`: the request has no body.
    None,
    /// `body: "*"`: the entire request message is the body.
    Wildcard,
    /// `body: "field.path"`: one field of the request message is the body.
    Field(String),
}

impl BodySpec {
    /// Parse the rule's `body` string.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        match body {
            "" => Self::None,
            "*" => Self::Wildcard,
            path => Self::Field(path.to_string()),
        }
    }
}

/// Where the request body is decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BodyBinding<'s> {
    /// No body.
    None,
    /// The body is the whole request message.
    Wildcard {
        /// The request message.
        message: MessageDescriptor<'s>,
    },
    /// The body is decoded into one field of the request message.
    Field {
        /// Type the body JSON is parsed against.
        ///
        /// For a repeated field this is the message *containing* the field,
        /// since the JSON array has no message type of its own. For a singular
        /// message field it is the field's type; `None` for a singular scalar
        /// or enum field, whose body is a bare JSON value.
        message: Option<MessageDescriptor<'s>>,
        /// The resolved body field.
        path: FieldPath<'s>,
        /// Whether the body is a JSON array for a repeated field.
        repeated: bool,
    },
}

impl<'s> BodyBinding<'s> {
    /// Resolve a body selector against the request message.
    ///
    /// # Errors
    ///
    /// Propagates [`FieldPath::resolve`] failures for a field selector.
    pub fn resolve(
        spec: &BodySpec,
        request: MessageDescriptor<'s>,
        max_depth: usize,
    ) -> Result<Self> {
        match spec {
            BodySpec::None => Ok(Self::None),
            BodySpec::Wildcard => Ok(Self::Wildcard { message: request }),
            BodySpec::Field(dotted) => {
                let path = FieldPath::resolve(request, dotted, max_depth)?;
                let leaf = path.leaf();
                let (message, repeated) = if leaf.is_repeated() {
                    (Some(leaf.containing_type()), true)
                } else {
                    (leaf.message_type(), false)
                };
                Ok(Self::Field {
                    message,
                    path,
                    repeated,
                })
            }
        }
    }

    /// The message type the body is parsed against, if any.
    #[must_use]
    pub fn message(&self) -> Option<MessageDescriptor<'s>> {
        match self {
            Self::None => None,
            Self::Wildcard { message } => Some(*message),
            Self::Field { message, .. } => *message,
        }
    }

    /// The body field path, for field selectors.
    #[must_use]
    pub fn field_path(&self) -> Option<&FieldPath<'s>> {
        match self {
            Self::Field { path, .. } => Some(path),
            Self::None | Self::Wildcard { .. } => None,
        }
    }

    /// Whether the body binds a repeated field.
    #[must_use]
    pub fn is_repeated(&self) -> bool {
        matches!(self, Self::Field { repeated: true, .. })
    }

    /// Whether the request has a body at all.
    #[must_use]
    pub fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }
}
