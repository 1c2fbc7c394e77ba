//! Runs the `tonic-transcode` binary against descriptor sets written to a
//! temp directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use indoc::indoc;
use pretty_assertions::assert_eq;
use prost::Message as _;

use tonic_transcode::descriptor::{
    field_label, field_type, DescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    FileDescriptorSet, HttpPattern, HttpRule, MethodDescriptorProto, MethodOptions,
    ServiceDescriptorProto,
};

fn field(name: &str, number: i32, type_id: i32, type_name: Option<&str>) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(field_label::OPTIONAL),
        r#type: Some(type_id),
        type_name: type_name.map(str::to_string),
    }
}

fn get(name: &str, input: &str, path: &str) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(input.to_string()),
        output_type: Some(input.to_string()),
        options: Some(MethodOptions {
            http: Some(HttpRule {
                pattern: Some(HttpPattern::Get(path.to_string())),
                ..HttpRule::default()
            }),
        }),
        client_streaming: None,
        server_streaming: None,
    }
}

/// `users.v1.UserService.GetUser` (resolves) and
/// `users.v1.UserService.GetNode` over a recursive `Node` (fails).
fn descriptor_set() -> FileDescriptorSet {
    let mut children = field("children", 2, field_type::MESSAGE, Some(".users.v1.Node"));
    children.label = Some(field_label::REPEATED);

    FileDescriptorSet {
        file: vec![FileDescriptorProto {
            name: Some("users/v1/users.proto".to_string()),
            package: Some("users.v1".to_string()),
            message_type: vec![
                DescriptorProto {
                    name: Some("User".to_string()),
                    field: vec![
                        field("id", 1, field_type::STRING, None),
                        field("address", 2, field_type::MESSAGE, Some(".users.v1.Address")),
                    ],
                    nested_type: vec![],
                },
                DescriptorProto {
                    name: Some("Address".to_string()),
                    field: vec![
                        field("city", 1, field_type::STRING, None),
                        field("zip", 2, field_type::STRING, None),
                    ],
                    nested_type: vec![],
                },
                DescriptorProto {
                    name: Some("Node".to_string()),
                    field: vec![field("name", 1, field_type::STRING, None), children],
                    nested_type: vec![],
                },
            ],
            service: vec![ServiceDescriptorProto {
                name: Some("UserService".to_string()),
                method: vec![
                    get("GetUser", ".users.v1.User", "/users/{id}"),
                    get("GetNode", ".users.v1.Node", "/nodes/{name}"),
                ],
            }],
        }],
    }
}

fn work_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tonic-transcode-cli-{test}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_descriptor(dir: &Path) -> PathBuf {
    let path = dir.join("descriptor.bin");
    std::fs::write(&path, descriptor_set().encode_to_vec()).unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tonic-transcode"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn resolve_single_method_as_yaml() {
    let dir = work_dir("resolve-yaml");
    let descriptor = write_descriptor(&dir);

    let output = run(&[
        "resolve",
        "--descriptor",
        descriptor.to_str().unwrap(),
        "--method",
        "UserService.GetUser",
    ]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        indoc! {"
            services:
            - name: users.v1.UserService
              bindings:
              - method: GetUser
                verb: GET
                path: /users/{id}
                path_params:
                - name: id
                  type: string
                query_params:
                - name: address.city
                  type: string
                - name: address.zip
                  type: string
        "}
    );

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn resolve_writes_json_output_file() {
    let dir = work_dir("resolve-json");
    let descriptor = write_descriptor(&dir);
    let out = dir.join("get_user.json");

    let output = run(&[
        "resolve",
        "--descriptor",
        descriptor.to_str().unwrap(),
        "--method",
        "users.v1.UserService.GetUser",
        "--format",
        "json",
        "--output",
        out.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(report["services"][0]["bindings"][0]["path"], "/users/{id}");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn resolve_all_fails_on_recursive_message() {
    let dir = work_dir("resolve-recursive");
    let descriptor = write_descriptor(&dir);

    let output = run(&["resolve", "--descriptor", descriptor.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("users.v1.UserService.GetNode"), "{stderr}");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn check_reports_failures_and_exit_code() {
    let dir = work_dir("check");
    let descriptor = write_descriptor(&dir);

    let output = run(&["check", "--descriptor", descriptor.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        stderr.contains(
            "error: invalid HTTP binding for method 'users.v1.UserService.GetNode': \
             field path 'children' in 'users.v1.Node' exceeds the recursion limit of 32"
        ),
        "{stderr}"
    );
    assert!(stderr.contains("1 bindings resolved, 1 methods failed"), "{stderr}");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn check_passes_with_package_filter_config() {
    let dir = work_dir("check-config");
    let descriptor = write_descriptor(&dir);
    let config = dir.join("transcode.toml");
    std::fs::write(&config, "packages = [\"other.v1\"]\n").unwrap();

    let output = run(&[
        "check",
        "--descriptor",
        descriptor.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("0 bindings resolved, 0 methods failed"), "{stderr}");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_descriptor_is_reported() {
    let output = run(&["check", "--descriptor", "/nonexistent/descriptor.bin"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        stderr.contains("Failed to read descriptor: /nonexistent/descriptor.bin"),
        "{stderr}"
    );
}
