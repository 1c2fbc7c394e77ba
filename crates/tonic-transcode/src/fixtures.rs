//! Descriptor builders shared by unit tests.

use tonic_transcode_core::descriptor::{
    field_label, field_type, DescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    FileDescriptorSet, HttpPattern, HttpRule, MethodDescriptorProto, MethodOptions,
    ServiceDescriptorProto,
};

pub(crate) fn scalar(name: &str, number: i32, type_id: i32) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(field_label::OPTIONAL),
        r#type: Some(type_id),
        type_name: None,
    }
}

pub(crate) fn message_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(field_label::OPTIONAL),
        r#type: Some(field_type::MESSAGE),
        type_name: Some(type_name.to_string()),
    }
}

pub(crate) fn repeated(field: FieldDescriptorProto) -> FieldDescriptorProto {
    FieldDescriptorProto {
        label: Some(field_label::REPEATED),
        ..field
    }
}

pub(crate) fn message(name: &str, field: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field,
        nested_type: vec![],
    }
}

pub(crate) fn get(path: &str) -> HttpRule {
    HttpRule {
        pattern: Some(HttpPattern::Get(path.to_string())),
        ..HttpRule::default()
    }
}

pub(crate) fn post(path: &str, body: &str) -> HttpRule {
    HttpRule {
        pattern: Some(HttpPattern::Post(path.to_string())),
        body: body.to_string(),
        ..HttpRule::default()
    }
}

pub(crate) fn method(
    name: &str,
    input: &str,
    output: &str,
    http: Option<HttpRule>,
) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(input.to_string()),
        output_type: Some(output.to_string()),
        options: Some(MethodOptions { http }),
        client_streaming: None,
        server_streaming: None,
    }
}

pub(crate) fn file(
    package: &str,
    message_type: Vec<DescriptorProto>,
    services: Vec<(&str, Vec<MethodDescriptorProto>)>,
) -> FileDescriptorSet {
    FileDescriptorSet {
        file: vec![FileDescriptorProto {
            name: Some(format!("{}.proto", package.replace('.', "/"))),
            package: Some(package.to_string()),
            message_type,
            service: services
                .into_iter()
                .map(|(name, method)| ServiceDescriptorProto {
                    name: Some(name.to_string()),
                    method,
                })
                .collect(),
        }],
    }
}

/// `User { id: string, address: Address }`, `Address { city, zip }` and
/// `UserService.GetUser` bound to `GET /users/{id}`.
pub(crate) fn user_schema_set() -> FileDescriptorSet {
    file(
        "users.v1",
        vec![
            message(
                "User",
                vec![
                    scalar("id", 1, field_type::STRING),
                    message_field("address", 2, ".users.v1.Address"),
                ],
            ),
            message(
                "Address",
                vec![
                    scalar("city", 1, field_type::STRING),
                    scalar("zip", 2, field_type::STRING),
                ],
            ),
        ],
        vec![(
            "UserService",
            vec![method(
                "GetUser",
                ".users.v1.User",
                ".users.v1.User",
                Some(get("/users/{id}")),
            )],
        )],
    )
}
