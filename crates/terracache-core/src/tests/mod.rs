use std::path::{Path, PathBuf};

use serde_json::json;

use crate::state::{
    file::{
        find_terraform_state_file, parse_terraform_state_file,
        parse_terraform_state_file_from_location,
    },
    parse_terraform_state, JsonMap, TerraformBackend, TerraformState, TerraformStateModule,
};
use crate::StateError;

fn fixture(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src/tests/fixtures").join(relative)
}

fn json_map(value: serde_json::Value) -> JsonMap {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

fn module(path: &[&str], outputs: serde_json::Value, resources: serde_json::Value) -> TerraformStateModule {
    TerraformStateModule {
        path: path.iter().map(|p| p.to_string()).collect(),
        outputs: json_map(outputs),
        resources: json_map(resources),
    }
}

fn s3_backend(key: &str) -> TerraformBackend {
    TerraformBackend {
        backend_type: "s3".into(),
        config: json_map(json!({
            "bucket": "bucket",
            "encrypt": true,
            "key": key,
            "region": "us-east-1",
        })),
    }
}

#[test]
fn test_parse_local_state() {
    let state_file = include_str!("./fixtures/local.tfstate");

    let expected = TerraformState {
        version: 1,
        serial: 0,
        backend: None,
        modules: vec![module(&["root"], json!({}), json!({}))],
    };

    let actual = parse_terraform_state(state_file.as_bytes()).unwrap();
    assert_eq!(actual, expected);
    assert!(!actual.is_remote());
}

#[test]
fn test_parse_remote_state() {
    let state_file = include_str!("./fixtures/remote.tfstate");

    let expected = TerraformState {
        version: 5,
        serial: 12,
        backend: Some(s3_backend("experiment-1.tfstate")),
        modules: vec![module(&["root"], json!({}), json!({}))],
    };

    let actual = parse_terraform_state(state_file.as_bytes()).unwrap();
    assert_eq!(actual, expected);
    assert!(actual.is_remote());
}

#[test]
fn test_parse_remote_state_with_nested_resources() {
    let state_file = include_str!("./fixtures/vpc.tfstate");

    let eip = |id: &str, public_ip: &str| {
        json!({
            "type": "aws_eip",
            "depends_on": ["aws_internet_gateway.main"],
            "primary": {
                "id": id,
                "attributes": {
                    "association_id": "",
                    "domain": "vpc",
                    "id": id,
                    "instance": "",
                    "network_interface": "",
                    "private_ip": "",
                    "public_ip": public_ip,
                    "vpc": "true",
                }
            }
        })
    };

    let expected = TerraformState {
        version: 1,
        serial: 51,
        backend: Some(s3_backend("terraform.tfstate")),
        modules: vec![
            module(
                &["root"],
                json!({ "key1": "value1", "key2": "value2", "key3": "value3" }),
                json!({}),
            ),
            module(
                &["root", "module_with_outputs_no_resources"],
                json!({ "key1": "", "key2": "" }),
                json!({}),
            ),
            module(
                &["root", "module_with_resources_no_outputs"],
                json!({}),
                json!({
                    "aws_eip.nat.0": eip("eipalloc-b421becd", "23.20.182.117"),
                    "aws_eip.nat.1": eip("eipalloc-95d846ec", "52.21.82.253"),
                }),
            ),
            module(&["root", "module_level_1", "module_level_2"], json!({}), json!({})),
        ],
    };

    let actual = parse_terraform_state(state_file.as_bytes()).unwrap();
    assert_eq!(actual, expected);
    assert!(actual.is_remote());

    let resources = &actual.module(&["root", "module_with_resources_no_outputs"]).unwrap().resources;
    let nat = &resources["aws_eip.nat.0"];
    assert_eq!(nat["depends_on"], json!(["aws_internet_gateway.main"]));
    assert_eq!(nat["primary"]["attributes"]["public_ip"], json!("23.20.182.117"));
}

#[test]
fn test_parse_empty_state() {
    let actual = parse_terraform_state(b"{}").unwrap();
    assert_eq!(actual, TerraformState::default());
    assert_eq!(actual.version, 0);
    assert_eq!(actual.serial, 0);
    assert!(actual.modules.is_empty());
    assert!(!actual.is_remote());
}

#[test]
fn test_parse_invalid_state() {
    let err = parse_terraform_state(b"not-valid-json").unwrap_err();
    assert!(err.is_syntax());
    assert!(matches!(err, StateError::Syntax { line: 1, .. }));
}

#[test]
fn test_parse_is_deterministic() {
    let state_file = include_bytes!("./fixtures/vpc.tfstate");
    let first = parse_terraform_state(state_file).unwrap();
    let second = parse_terraform_state(state_file).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_parse_state_file_from_disk() {
    let state = parse_terraform_state_file(&fixture("remote.tfstate")).unwrap();
    assert_eq!(state.serial, 12);
    assert!(state.is_remote());
}

#[test]
fn test_parse_missing_state_file() {
    let path = fixture("does-not-exist.tfstate");
    let err = parse_terraform_state_file(&path).unwrap_err();
    match err {
        StateError::Io { path: reported, source } => {
            assert_eq!(reported, path);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_parse_invalid_state_file() {
    let path = fixture("invalid.tfstate");
    let err = parse_terraform_state_file(&path).unwrap_err();
    assert!(err.is_syntax());
    assert!(matches!(err, StateError::InvalidStateFile { .. }));
    assert!(err.to_string().contains("invalid.tfstate"));
}

#[test]
fn test_cached_remote_state_takes_precedence() {
    let working_dir = fixture("workspaces/cached_remote");
    let found = find_terraform_state_file(&working_dir, None).unwrap();
    assert_eq!(found, working_dir.join(".terraform").join("terraform.tfstate"));

    let (path, state) = parse_terraform_state_file_from_location(&working_dir, None)
        .unwrap()
        .unwrap();
    assert_eq!(path, found);
    assert!(state.is_remote());
}

#[test]
fn test_local_state_is_used_without_cached_copy() {
    let working_dir = fixture("workspaces/local_only");
    let (path, state) = parse_terraform_state_file_from_location(&working_dir, None)
        .unwrap()
        .unwrap();
    assert_eq!(path, working_dir.join("terraform.tfstate"));
    assert!(!state.is_remote());
}

#[test]
fn test_missing_state_is_not_an_error() {
    let working_dir = fixture("workspaces/no_state");
    assert!(find_terraform_state_file(&working_dir, None).is_none());
    assert!(parse_terraform_state_file_from_location(&working_dir, None).unwrap().is_none());
}

#[test]
fn test_custom_data_dir() {
    let working_dir = fixture("workspaces/custom_data_dir");
    assert!(find_terraform_state_file(&working_dir, None).is_none());

    let relative = find_terraform_state_file(&working_dir, Some(Path::new("tfdata"))).unwrap();
    assert_eq!(relative, working_dir.join("tfdata").join("terraform.tfstate"));

    let absolute_dir = working_dir.join("tfdata");
    let absolute = find_terraform_state_file(&working_dir, Some(&absolute_dir)).unwrap();
    assert_eq!(absolute, relative);
}
