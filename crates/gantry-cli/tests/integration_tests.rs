//! Integration tests for the `gantry` binary.
//!
//! Every invocation gets its own config file so the developer's real
//! configuration never leaks in. Cluster commands only run with `--dry-run`.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const PETSTORE_V2: &str = r#"
swagger: "2.0"
info:
  title: Petstore
  version: 1.0.5
host: api.example.com
basePath: /v1
schemes: [https]
paths:
  /pets:
    get: {}
"#;

const CONFIG: &str = r#"
environments = ["dev", "prod"]

[cluster]
namespace = "gateway"
replicas = 2
"#;

fn gantry(tmp: &TempDir) -> Command {
    let config = tmp.path().join("config.toml");
    if !config.exists() {
        fs::write(&config, CONFIG).unwrap();
    }
    let mut cmd = cargo_bin_cmd!("gantry");
    cmd.current_dir(tmp.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config);
    cmd
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

// ── help / version ──────────────────────────────────────────────────────────

#[test]
fn help_lists_commands() {
    cargo_bin_cmd!("gantry")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("update"));
}

#[test]
fn version_flag() {
    cargo_bin_cmd!("gantry")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_subcommand_is_usage_error() {
    cargo_bin_cmd!("gantry").assert().code(2);
}

// ── init ────────────────────────────────────────────────────────────────────

#[test]
fn init_creates_default_project() {
    let tmp = TempDir::new().unwrap();

    gantry(&tmp)
        .args(["init", "petstore"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project initialised"));

    let root = tmp.path().join("petstore");
    for dir in ["meta", "docs/file-contents", "sequences/fault-sequence", "interceptors", "libs"] {
        assert!(root.join(dir).is_dir(), "missing directory {dir}");
    }
    assert!(read(&root.join("meta/api.yaml")).contains("status: CREATED"));
    assert!(read(&root.join("meta/swagger.yaml")).contains("swagger"));
    assert!(root.join("README.md").is_file());

    let params = read(&root.join("api_params.yaml"));
    assert!(params.contains("name: dev"));
    assert!(params.contains("name: prod"));
}

#[test]
fn init_from_openapi_with_initial_state() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("petstore.yaml"), PETSTORE_V2).unwrap();

    gantry(&tmp)
        .args([
            "init",
            "petstore",
            "--oas",
            "petstore.yaml",
            "--initial-state",
            "PUBLISHED",
        ])
        .assert()
        .success();

    let api = read(&tmp.path().join("petstore/meta/api.yaml"));
    assert!(api.contains("status: PUBLISHED"));
    assert!(api.contains("context: /v1"));
    assert!(api.contains("https://api.example.com/v1"));
    assert!(read(&tmp.path().join("petstore/meta/swagger.yaml")).contains("/pets"));
}

#[test]
fn init_applies_override_with_variables() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("api.yaml"),
        "productionUrl: https://${GANTRY_IT_HOST}/v2\n",
    )
    .unwrap();

    gantry(&tmp)
        .env("GANTRY_IT_HOST", "gw.internal")
        .args(["init", "petstore", "-d", "api.yaml"])
        .assert()
        .success();

    let api = read(&tmp.path().join("petstore/meta/api.yaml"));
    assert!(api.contains("https://gw.internal/v2"));
}

#[test]
fn init_with_unset_variable_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("api.yaml"),
        "productionUrl: https://${GANTRY_IT_SURELY_UNSET}/v2\n",
    )
    .unwrap();

    gantry(&tmp)
        .env_remove("GANTRY_IT_SURELY_UNSET")
        .args(["init", "petstore", "-d", "api.yaml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("GANTRY_IT_SURELY_UNSET"));

    assert!(!tmp.path().join("petstore").exists());
}

#[test]
fn init_rejects_invalid_initial_state() {
    let tmp = TempDir::new().unwrap();

    gantry(&tmp)
        .args(["init", "petstore", "--initial-state", "RETIRED"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("PROTOTYPED"));

    assert!(!tmp.path().join("petstore").exists());
}

#[test]
fn init_refuses_existing_directory_without_force() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("petstore")).unwrap();

    gantry(&tmp)
        .args(["init", "petstore"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));

    gantry(&tmp)
        .args(["init", "petstore", "--force"])
        .assert()
        .success();
    assert!(tmp.path().join("petstore/meta/api.yaml").is_file());
}

#[test]
fn init_with_missing_openapi_is_not_found() {
    let tmp = TempDir::new().unwrap();

    gantry(&tmp)
        .args(["init", "petstore", "--oas", "absent.yaml"])
        .assert()
        .code(3);

    assert!(!tmp.path().join("petstore").exists());
}

#[test]
fn init_json_summary() {
    let tmp = TempDir::new().unwrap();

    let out = gantry(&tmp)
        .args(["--output-format", "json", "init", "petstore"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summary: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(summary["status"], "CREATED");
    assert!(
        summary["files"]
            .as_array()
            .unwrap()
            .iter()
            .any(|f| f == "meta/api.yaml")
    );
}

// ── add / update ────────────────────────────────────────────────────────────

#[test]
fn add_api_dry_run_prints_manifest() {
    let tmp = TempDir::new().unwrap();
    gantry(&tmp).args(["init", "petstore"]).assert().success();

    gantry(&tmp)
        .args(["add", "api", "-n", "petstore", "-f", "petstore", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("petstore-swagger"))
        .stdout(predicate::str::contains("kind: API"))
        .stdout(predicate::str::contains("namespace 'gateway'"));
}

#[test]
fn update_api_dry_run_json_report() {
    let tmp = TempDir::new().unwrap();
    gantry(&tmp).args(["init", "petstore"]).assert().success();
    fs::write(tmp.path().join("petstore/libs/auth.jar"), b"PK").unwrap();

    let out = gantry(&tmp)
        .args([
            "--output-format",
            "json",
            "update",
            "api",
            "-n",
            "petstore",
            "-f",
            "petstore",
            "--dry-run",
            "--override",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["action"], "update");
    assert_eq!(report["dry_run"], true);
    assert_eq!(report["namespace"], "gateway");
    assert_eq!(
        report["config_objects"],
        serde_json::json!(["petstore-swagger", "petstore-auth.jar"])
    );
    let manifest = report["manifest"].as_str().unwrap();
    assert!(manifest.contains("override: true"));
    assert!(manifest.contains("replicas: 2"));
    assert!(manifest.contains("updateTimeStamp"));
    assert_eq!(report["calls"][0]["mode"], "update");
}

#[test]
fn add_api_with_missing_source_is_not_found() {
    let tmp = TempDir::new().unwrap();

    gantry(&tmp)
        .args(["add", "api", "-n", "petstore", "-f", "absent", "--dry-run"])
        .assert()
        .code(3);
}

#[test]
fn add_api_rejects_invalid_name() {
    let tmp = TempDir::new().unwrap();

    gantry(&tmp)
        .args(["add", "api", "-n", "Pet_Store", "-f", "x"])
        .assert()
        .code(2);
}

// ── config / completions ────────────────────────────────────────────────────

#[test]
fn config_get_reads_file_and_env() {
    let tmp = TempDir::new().unwrap();

    gantry(&tmp)
        .args(["config", "get", "cluster.namespace"])
        .assert()
        .success()
        .stdout(predicate::str::diff("gateway\n"));

    gantry(&tmp)
        .env("GANTRY__CLUSTER__REPLICAS", "5")
        .args(["config", "get", "cluster.replicas"])
        .assert()
        .success()
        .stdout(predicate::str::diff("5\n"));
}

#[test]
fn config_unknown_key_is_configuration_error() {
    let tmp = TempDir::new().unwrap();

    gantry(&tmp)
        .args(["config", "get", "nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn explicit_missing_config_file_is_configuration_error() {
    let tmp = TempDir::new().unwrap();

    cargo_bin_cmd!("gantry")
        .current_dir(tmp.path())
        .args(["--config", "absent.toml", "config", "list"])
        .assert()
        .code(4);
}

#[test]
fn no_color_env_accepts_any_value() {
    let tmp = TempDir::new().unwrap();

    for value in ["1", "yes", "true", "0", ""] {
        gantry(&tmp)
            .env("NO_COLOR", value)
            .args(["config", "get", "cluster.namespace"])
            .assert()
            .success()
            .stdout(predicate::str::diff("gateway\n"));
    }

    gantry(&tmp)
        .args(["--no-color", "config", "path"])
        .assert()
        .success();
}

#[test]
fn add_api_with_colliding_libraries_is_rejected() {
    let tmp = TempDir::new().unwrap();
    gantry(&tmp).args(["init", "petstore"]).assert().success();
    for dir in ["a", "b"] {
        let libs = tmp.path().join("petstore/libs").join(dir);
        fs::create_dir_all(&libs).unwrap();
        fs::write(libs.join("auth.jar"), b"PK").unwrap();
    }

    gantry(&tmp)
        .args(["add", "api", "-n", "petstore", "-f", "petstore", "--dry-run"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("petstore-auth.jar"));
}

#[test]
fn completions_for_bash() {
    cargo_bin_cmd!("gantry")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gantry"));
}
